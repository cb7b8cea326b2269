//! Structured failure causes for concurrent runtimes.
//!
//! When a fiber fails, one error value is rarely the whole story: a retry
//! loop may have failed several times in sequence, racing branches may have
//! failed concurrently, a sibling may have interrupted the loser, and a bug
//! may have produced a defect nobody declared. [`Cause`] keeps that whole
//! structure as an immutable tree, so a runtime can compose failures
//! losslessly and user code can filter, project, compare, and render them
//! afterwards.
//!
//! # The shape of a cause
//!
//! - **Leaves**: a checked failure of the computation's error type
//!   ([`Cause::fail`]), an unchecked [`Defect`] ([`Cause::die`]), an
//!   interruption by another fiber ([`Cause::interrupt`]), or nothing at all
//!   ([`Cause::empty`]).
//! - **Composition**: sequential with [`Cause::seq`] (operator `+`), where
//!   order is meaningful, and parallel with [`Cause::par`] (operator `&`),
//!   where it is not.
//! - **Annotations**: execution traces ([`Cause::traced`]) and rendering
//!   options ([`Cause::stack`], [`Cause::stackless`]), both invisible to
//!   equality, hashing, and projections.
//!
//! Equality is algebraic: causes compare modulo associativity of both
//! operators, commutativity of the parallel one, distribution of sequencing
//! over parallelism, the empty cause as identity, and annotation
//! transparency, and equal causes hash equal. The law table lives in
//! [`cause`].
//!
//! # Example
//!
//! ```
//! use failtree::{Cause, FiberId};
//!
//! let primary = Cause::fail("connection reset".to_string());
//! let hedge = Cause::fail("request timed out".to_string());
//! let loser = Cause::interrupt(FiberId::new(0, 7));
//!
//! // The primary failed, then the hedged retry and its sibling failed
//! // concurrently.
//! let cause = primary + (hedge & loser);
//!
//! assert!(cause.failed());
//! assert!(cause.interrupted());
//! assert_eq!(cause.failures().len(), 2);
//! assert_eq!(cause.interruptors().len(), 1);
//!
//! // Parallel branches are unordered.
//! let flipped = Cause::fail("connection reset".to_string())
//!     + (Cause::interrupt(FiberId::new(0, 7))
//!         & Cause::fail("request timed out".to_string()));
//! assert_eq!(cause, flipped);
//!
//! println!("{}", cause.pretty_print());
//! ```

pub mod cause;
pub mod defect;
pub mod fiber;
pub mod trace;

mod canonical;
mod render;

pub use cause::{Cause, CauseView, Fold};
pub use defect::{Defect, Diagnostic};
pub use fiber::FiberId;
pub use trace::Trace;
