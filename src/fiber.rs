//! Fiber identity.
//!
//! A [`FiberId`] names the fiber that produced an interruption. It is a pure
//! value: two ids are the same fiber iff both components are equal. The
//! sequence number is what failure reports show (`#12`), the start time
//! disambiguates ids across runtime restarts.

use core::fmt;

/// Identity of a fiber: when it started and which one it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiberId {
    start_time_nanos: i64,
    seq_number: i64,
}

impl FiberId {
    /// Creates a fiber id from its start time (nanoseconds) and sequence
    /// number.
    #[must_use]
    pub const fn new(start_time_nanos: i64, seq_number: i64) -> Self {
        Self {
            start_time_nanos,
            seq_number,
        }
    }

    /// The fiber's start time in nanoseconds.
    #[must_use]
    pub const fn start_time_nanos(&self) -> i64 {
        self.start_time_nanos
    }

    /// The fiber's sequence number, unique within a runtime instance.
    #[must_use]
    pub const fn seq_number(&self) -> i64 {
        self.seq_number
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.seq_number)
    }
}
