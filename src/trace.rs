//! Execution traces.
//!
//! A [`Trace`] records where a fiber had been when a failure passed through
//! it. The cause algebra treats traces as opaque annotations: they are
//! invisible to equality and hashing and only surface in failure reports,
//! through [`Trace::pretty_print`].

use crate::fiber::FiberId;

/// An execution trace attached to a cause by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    fiber_id: FiberId,
    frames: Vec<String>,
}

impl Trace {
    /// Creates a trace owned by `fiber_id` with the given frames, most
    /// recent first.
    #[must_use]
    pub fn new(fiber_id: FiberId, frames: impl IntoIterator<Item = String>) -> Self {
        Self {
            fiber_id,
            frames: frames.into_iter().collect(),
        }
    }

    /// The fiber this trace belongs to.
    #[must_use]
    pub const fn fiber_id(&self) -> FiberId {
        self.fiber_id
    }

    /// The recorded frames, most recent first.
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Renders the trace for a failure report.
    #[must_use]
    pub fn pretty_print(&self) -> String {
        let mut out = format!("Fiber {} execution trace:", self.fiber_id);
        if self.frames.is_empty() {
            out.push_str("\n  <empty trace>");
        } else {
            for frame in &self.frames {
                out.push_str("\n  at ");
                out.push_str(frame);
            }
        }
        out
    }
}
