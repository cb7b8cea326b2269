//! Defects: unchecked, unexpected failures.
//!
//! A [`Defect`] is the payload of a `Die` cause: a host-level,
//! throwable-like value that was not part of the computation's declared
//! error type. It carries a message and the stack lines captured where it
//! was raised, and compares by value.
//!
//! [`Diagnostic`] is the seam between user error types and the failure
//! report: it provides the stringification the renderer prints and the
//! conversion [`Cause::squash`](crate::Cause::squash) uses to collapse a
//! whole cause into a single defect-like value.

use core::fmt;
use std::any::Any;
use std::collections::BTreeSet;

use crate::fiber::FiberId;

/// An unchecked failure value: what a fiber dies with.
///
/// Equality is structural over the message and the captured stack, so two
/// defects raised at the same place with the same message are the same
/// defect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Defect {
    message: String,
    stack: Vec<String>,
}

impl Defect {
    /// Creates a defect with a message and no captured stack.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: Vec::new(),
        }
    }

    /// Attaches captured stack lines.
    #[must_use]
    pub fn with_stack(mut self, stack: impl IntoIterator<Item = String>) -> Self {
        self.stack = stack.into_iter().collect();
        self
    }

    /// Converts a caught panic payload into a defect.
    ///
    /// Panic payloads are almost always `&str` or `String`; anything else is
    /// reported opaquely.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        if let Some(s) = payload.downcast_ref::<&str>() {
            Self::new(*s)
        } else if let Some(s) = payload.downcast_ref::<String>() {
            Self::new(s.clone())
        } else {
            Self::new("panic payload of unknown type")
        }
    }

    /// The synthetic defect standing in for an interruption when a cause is
    /// squashed into a single value.
    #[must_use]
    pub fn interrupted(interruptors: &BTreeSet<FiberId>) -> Self {
        if interruptors.is_empty() {
            Self::new("interrupted")
        } else {
            let fibers: Vec<String> = interruptors.iter().map(ToString::to_string).collect();
            Self::new(format!("interrupted by {}", fibers.join(", ")))
        }
    }

    /// The defect's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The stack lines captured where the defect was raised.
    #[must_use]
    pub fn stack(&self) -> &[String] {
        &self.stack
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Stringification and stack access for values rendered in failure reports.
///
/// The renderer prints `self.to_string()` split by lines, followed by
/// [`stack_trace`](Diagnostic::stack_trace) unless the enclosing cause is
/// marked stackless. Plain error types leave `stack_trace` at its empty
/// default; throwable-like types override it.
pub trait Diagnostic: fmt::Display {
    /// Stack lines for throwable-like values. Default: none.
    fn stack_trace(&self) -> &[String] {
        &[]
    }

    /// Collapses this value into a defect, preserving any stack.
    fn to_defect(&self) -> Defect {
        Defect::new(self.to_string()).with_stack(self.stack_trace().to_vec())
    }
}

impl Diagnostic for String {}

impl Diagnostic for &str {}

impl Diagnostic for std::io::Error {}

impl Diagnostic for Defect {
    fn stack_trace(&self) -> &[String] {
        &self.stack
    }

    fn to_defect(&self) -> Defect {
        self.clone()
    }
}
