//! The cause tree: the full structure of why a computation failed.
//!
//! A [`Cause`] records not one error but every failure a concurrent
//! computation produced: checked failures, defects, interruptions, and how
//! they composed: one after another (`seq`, rendered as `+`) or at the same
//! time (`par`, rendered as `&`). Causes are immutable value trees; every
//! operation here is pure and total.
//!
//! # Composition laws
//!
//! Equality on causes is algebraic, not syntactic. It is the smallest
//! equivalence satisfying:
//!
//! | Law | Statement |
//! |-----|-----------|
//! | SEQ-IDENT | `empty + c == c` and `c + empty == c` |
//! | PAR-IDENT | `(empty & c) == c` and `(c & empty) == c` |
//! | SEQ-ASSOC | `(a + b) + c == a + (b + c)` |
//! | PAR-ASSOC | `(a & b) & c == a & (b & c)` |
//! | PAR-COMM | `a & b == b & a` |
//! | DIST-L | `a + (b & c) == (a + b) & (a + c)` |
//! | DIST-R | `(a & b) + c == (a + c) & (b + c)` |
//! | WRAP | `c.traced(t) == c`, `c.stack() == c`, `c.stackless() == c` |
//!
//! `seq` folds the empty cause away eagerly; `par` never does. The identity
//! for parallel composition is handled by equality alone.
//!
//! # Construction discipline
//!
//! Producers build causes only through the smart constructors ([`empty`],
//! [`fail`], [`die`], [`interrupt`], [`seq`], [`par`]) and the annotation
//! constructors ([`traced`], [`stack`], [`stackless`]). The node
//! representation is private; consumers observe structure through
//! [`CauseView`], [`fold`], and the projections.
//!
//! Every traversal in this module drives an explicit work stack, so no
//! operation recurses to the depth of the tree: chains hundreds of thousands
//! of nodes deep fold, project, compare, and drop without exhausting the
//! host stack.
//!
//! [`empty`]: Cause::empty
//! [`fail`]: Cause::fail
//! [`die`]: Cause::die
//! [`interrupt`]: Cause::interrupt
//! [`seq`]: Cause::seq
//! [`par`]: Cause::par
//! [`traced`]: Cause::traced
//! [`stack`]: Cause::stack
//! [`stackless`]: Cause::stackless
//! [`fold`]: Cause::fold

use core::mem;
use core::ops::{Add, BitAnd};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::defect::{Defect, Diagnostic};
use crate::fiber::FiberId;
use crate::trace::Trace;

/// Rendering options carried by an annotation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct MetaData {
    pub(crate) stackless: bool,
}

/// The private node representation. Children are shared `Arc`s so that
/// rebuilding combinators and clones stay cheap.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum Node<E> {
    Empty,
    Fail(E),
    Die(Defect),
    Interrupt(FiberId),
    Then(Arc<Cause<E>>, Arc<Cause<E>>),
    Both(Arc<Cause<E>>, Arc<Cause<E>>),
    Traced(Arc<Cause<E>>, Trace),
    Meta(Arc<Cause<E>>, MetaData),
}

/// An immutable tree describing why a computation failed.
///
/// `E` is the computation's checked error type. Defects and interruptions
/// are untyped: any cause can carry them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cause<E> {
    pub(crate) node: Node<E>,
}

/// A read-only view of the root of a cause, for consumers that need to
/// pattern-match structure (typically through [`Cause::find`] or
/// [`Cause::fold_left`]).
#[derive(Debug)]
pub enum CauseView<'a, E> {
    /// No failure.
    Empty,
    /// A checked, typed failure.
    Fail(&'a E),
    /// An unchecked defect.
    Die(&'a Defect),
    /// Interruption by the given fiber.
    Interrupt(FiberId),
    /// Sequential composition: left happened, then right.
    Then(&'a Cause<E>, &'a Cause<E>),
    /// Parallel composition: left and right happened concurrently.
    Both(&'a Cause<E>, &'a Cause<E>),
    /// An execution trace annotation; transparent to equality.
    Traced(&'a Cause<E>, &'a Trace),
    /// A rendering annotation; the flag is true when stack traces are
    /// suppressed. Transparent to equality.
    Stackless(&'a Cause<E>, bool),
}

/// Leaf dispatch for the rebuilding engine.
enum Leaf<'a, E> {
    Empty,
    Fail(&'a E),
    Die(&'a Defect),
    Interrupt(FiberId),
}

/// The canonical eliminator for causes.
///
/// [`Cause::fold`] walks the tree bottom-up, calling one method per node
/// kind. The `Stackless` annotation is invisible to folds; `traced`
/// defaults to passing the inner result through.
pub trait Fold<E> {
    /// The result type of the fold.
    type Out;

    /// Result for the empty cause.
    fn empty(&mut self) -> Self::Out;
    /// Result for a checked failure.
    fn fail(&mut self, error: &E) -> Self::Out;
    /// Result for a defect.
    fn die(&mut self, defect: &Defect) -> Self::Out;
    /// Result for an interruption.
    fn interrupt(&mut self, fiber: FiberId) -> Self::Out;
    /// Combines the results of a sequential composition.
    fn then(&mut self, left: Self::Out, right: Self::Out) -> Self::Out;
    /// Combines the results of a parallel composition.
    fn both(&mut self, left: Self::Out, right: Self::Out) -> Self::Out;
    /// Observes a trace annotation. Defaults to transparency.
    fn traced(&mut self, inner: Self::Out, trace: &Trace) -> Self::Out {
        let _ = trace;
        inner
    }
}

impl<E> Cause<E> {
    /// The empty cause: identity for both composition operators.
    #[must_use]
    pub const fn empty() -> Self {
        Self { node: Node::Empty }
    }

    /// A checked, domain-level failure.
    #[must_use]
    pub fn fail(error: E) -> Self {
        Self {
            node: Node::Fail(error),
        }
    }

    /// An unchecked defect.
    #[must_use]
    pub fn die(defect: Defect) -> Self {
        Self {
            node: Node::Die(defect),
        }
    }

    /// Interruption by the fiber identified by `fiber`.
    #[must_use]
    pub fn interrupt(fiber: FiberId) -> Self {
        Self {
            node: Node::Interrupt(fiber),
        }
    }

    /// Sequential composition: `self` happened, then `other`.
    ///
    /// The empty cause is folded away eagerly on either side.
    #[must_use]
    pub fn seq(self, other: Cause<E>) -> Cause<E> {
        if matches!(self.node, Node::Empty) {
            return other;
        }
        if matches!(other.node, Node::Empty) {
            return self;
        }
        Self {
            node: Node::Then(Arc::new(self), Arc::new(other)),
        }
    }

    /// Parallel composition: `self` and `other` happened concurrently.
    ///
    /// Always builds a node; the identity law for the empty cause is
    /// resolved by equality, not construction.
    #[must_use]
    pub fn par(self, other: Cause<E>) -> Cause<E> {
        Self {
            node: Node::Both(Arc::new(self), Arc::new(other)),
        }
    }

    /// Attaches an execution trace. Transparent to equality and hashing.
    #[must_use]
    pub fn traced(self, trace: Trace) -> Self {
        Self {
            node: Node::Traced(Arc::new(self), trace),
        }
    }

    /// Marks this cause for full stack-trace rendering.
    #[must_use]
    pub fn stack(self) -> Self {
        Self {
            node: Node::Meta(Arc::new(self), MetaData { stackless: false }),
        }
    }

    /// Suppresses stack traces when this cause is rendered.
    #[must_use]
    pub fn stackless(self) -> Self {
        Self {
            node: Node::Meta(Arc::new(self), MetaData { stackless: true }),
        }
    }

    /// A read-only view of the root node.
    #[must_use]
    pub fn view(&self) -> CauseView<'_, E> {
        match &self.node {
            Node::Empty => CauseView::Empty,
            Node::Fail(e) => CauseView::Fail(e),
            Node::Die(d) => CauseView::Die(d),
            Node::Interrupt(id) => CauseView::Interrupt(*id),
            Node::Then(l, r) => CauseView::Then(l.as_ref(), r.as_ref()),
            Node::Both(l, r) => CauseView::Both(l.as_ref(), r.as_ref()),
            Node::Traced(c, t) => CauseView::Traced(c.as_ref(), t),
            Node::Meta(c, m) => CauseView::Stackless(c.as_ref(), m.stackless),
        }
    }

    /// Folds the tree bottom-up with an explicit work stack.
    pub fn fold<F: Fold<E>>(&self, folder: &mut F) -> F::Out {
        enum Frame<'a, E> {
            Visit(&'a Cause<E>),
            Then,
            Both,
            Traced(&'a Trace),
        }

        let mut work: Vec<Frame<'_, E>> = vec![Frame::Visit(self)];
        let mut done: Vec<F::Out> = Vec::new();
        while let Some(frame) = work.pop() {
            match frame {
                Frame::Visit(cause) => match &cause.node {
                    Node::Empty => done.push(folder.empty()),
                    Node::Fail(e) => done.push(folder.fail(e)),
                    Node::Die(d) => done.push(folder.die(d)),
                    Node::Interrupt(id) => done.push(folder.interrupt(*id)),
                    Node::Then(l, r) => {
                        work.push(Frame::Then);
                        work.push(Frame::Visit(r.as_ref()));
                        work.push(Frame::Visit(l.as_ref()));
                    }
                    Node::Both(l, r) => {
                        work.push(Frame::Both);
                        work.push(Frame::Visit(r.as_ref()));
                        work.push(Frame::Visit(l.as_ref()));
                    }
                    Node::Traced(inner, trace) => {
                        work.push(Frame::Traced(trace));
                        work.push(Frame::Visit(inner.as_ref()));
                    }
                    Node::Meta(inner, _) => work.push(Frame::Visit(inner.as_ref())),
                },
                Frame::Then => {
                    let right = done.pop().expect("then visit pushed a right result");
                    let left = done.pop().expect("then visit pushed a left result");
                    done.push(folder.then(left, right));
                }
                Frame::Both => {
                    let right = done.pop().expect("both visit pushed a right result");
                    let left = done.pop().expect("both visit pushed a left result");
                    done.push(folder.both(left, right));
                }
                Frame::Traced(trace) => {
                    let inner = done.pop().expect("traced visit pushed a result");
                    done.push(folder.traced(inner, trace));
                }
            }
        }
        done.pop().expect("fold produced a result")
    }

    /// Pre-order, left-to-right accumulation over every node of the tree,
    /// annotations included.
    pub fn fold_left<'a, Z>(&'a self, zero: Z, mut f: impl FnMut(Z, &'a Cause<E>) -> Z) -> Z {
        let mut acc = zero;
        let mut work: SmallVec<[&'a Cause<E>; 16]> = SmallVec::new();
        work.push(self);
        while let Some(cause) = work.pop() {
            acc = f(acc, cause);
            match &cause.node {
                Node::Then(l, r) | Node::Both(l, r) => {
                    work.push(r.as_ref());
                    work.push(l.as_ref());
                }
                Node::Traced(inner, _) | Node::Meta(inner, _) => work.push(inner.as_ref()),
                Node::Empty | Node::Fail(_) | Node::Die(_) | Node::Interrupt(_) => {}
            }
        }
        acc
    }

    /// Finds the first node (pre-order, left-to-right) for which `f`
    /// returns a value.
    pub fn find<'a, T>(&'a self, mut f: impl FnMut(&'a Cause<E>) -> Option<T>) -> Option<T> {
        let mut work: SmallVec<[&'a Cause<E>; 16]> = SmallVec::new();
        work.push(self);
        while let Some(cause) = work.pop() {
            if let Some(found) = f(cause) {
                return Some(found);
            }
            match &cause.node {
                Node::Then(l, r) | Node::Both(l, r) => {
                    work.push(r.as_ref());
                    work.push(l.as_ref());
                }
                Node::Traced(inner, _) | Node::Meta(inner, _) => work.push(inner.as_ref()),
                Node::Empty | Node::Fail(_) | Node::Die(_) | Node::Interrupt(_) => {}
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------

    /// Every checked failure, in left-to-right order.
    #[must_use]
    pub fn failures(&self) -> Vec<&E> {
        self.fold_left(Vec::new(), |mut acc, cause| {
            if let CauseView::Fail(e) = cause.view() {
                acc.push(e);
            }
            acc
        })
    }

    /// Every defect, in left-to-right order.
    #[must_use]
    pub fn defects(&self) -> Vec<&Defect> {
        self.fold_left(Vec::new(), |mut acc, cause| {
            if let CauseView::Die(d) = cause.view() {
                acc.push(d);
            }
            acc
        })
    }

    /// The set of fibers that interrupted this computation.
    #[must_use]
    pub fn interruptors(&self) -> BTreeSet<FiberId> {
        self.fold_left(BTreeSet::new(), |mut acc, cause| {
            if let CauseView::Interrupt(id) = cause.view() {
                acc.insert(id);
            }
            acc
        })
    }

    /// Every execution trace, in tree order.
    #[must_use]
    pub fn traces(&self) -> Vec<&Trace> {
        self.fold_left(Vec::new(), |mut acc, cause| {
            if let CauseView::Traced(_, trace) = cause.view() {
                acc.push(trace);
            }
            acc
        })
    }

    /// The first checked failure, if any.
    #[must_use]
    pub fn failure_option(&self) -> Option<&E> {
        self.find(|cause| match cause.view() {
            CauseView::Fail(e) => Some(e),
            _ => None,
        })
    }

    /// The first defect, if any.
    #[must_use]
    pub fn die_option(&self) -> Option<&Defect> {
        self.find(|cause| match cause.view() {
            CauseView::Die(d) => Some(d),
            _ => None,
        })
    }

    /// True if any checked failure is present.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failure_option().is_some()
    }

    /// True if any defect is present.
    #[must_use]
    pub fn died(&self) -> bool {
        self.die_option().is_some()
    }

    /// True if any interruption is present.
    #[must_use]
    pub fn interrupted(&self) -> bool {
        self.find(|cause| match cause.view() {
            CauseView::Interrupt(_) => Some(()),
            _ => None,
        })
        .is_some()
    }

    /// True if the cause carries interruptions and nothing else.
    #[must_use]
    pub fn interrupted_only(&self) -> bool {
        self.interrupted() && !self.failed() && !self.died()
    }

    /// True if no failure, defect, or interruption is present anywhere in
    /// the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.find(|cause| match cause.view() {
            CauseView::Fail(_) | CauseView::Die(_) | CauseView::Interrupt(_) => Some(()),
            _ => None,
        })
        .is_none()
    }

    /// The first checked failure, or the whole cause retyped to witness
    /// that no checked failure remains.
    pub fn failure_or_cause(&self) -> Result<E, Cause<Infallible>>
    where
        E: Clone,
    {
        match self.failure_option() {
            Some(error) => Ok(error.clone()),
            None => Err(self
                .filter_rebuild(
                    |leaf| match leaf {
                        Leaf::Empty => Some(Cause::empty()),
                        Leaf::Fail(_) => None,
                        Leaf::Die(d) => Some(Cause::die(d.clone())),
                        Leaf::Interrupt(id) => Some(Cause::interrupt(id)),
                    },
                    true,
                )
                .unwrap_or_default()),
        }
    }

    /// Keeps only defects, dropping failures and interruptions and
    /// collapsing compositions whose sides vanish. Annotations survive on
    /// the remaining subtree. `None` when no defect is present.
    #[must_use]
    pub fn strip_failures(&self) -> Option<Cause<Infallible>> {
        self.filter_rebuild(
            |leaf| match leaf {
                Leaf::Die(d) => Some(Cause::die(d.clone())),
                Leaf::Empty | Leaf::Fail(_) | Leaf::Interrupt(_) => None,
            },
            true,
        )
    }

    /// Removes every trace annotation, keeping rendering annotations.
    #[must_use]
    pub fn untraced(&self) -> Cause<E>
    where
        E: Clone,
    {
        self.filter_rebuild(
            |leaf| match leaf {
                Leaf::Empty => Some(Cause::empty()),
                Leaf::Fail(e) => Some(Cause::fail(e.clone())),
                Leaf::Die(d) => Some(Cause::die(d.clone())),
                Leaf::Interrupt(id) => Some(Cause::interrupt(id)),
            },
            false,
        )
        .unwrap_or_default()
    }

    /// Rebuilds the tree, mapping every checked failure through `f`.
    #[must_use]
    pub fn map<E2>(&self, mut f: impl FnMut(&E) -> E2) -> Cause<E2> {
        self.flat_map(|error| Cause::fail(f(error)))
    }

    /// Substitutes each checked failure with a whole cause, preserving all
    /// other structure, annotations included.
    #[must_use]
    pub fn flat_map<E2>(&self, mut f: impl FnMut(&E) -> Cause<E2>) -> Cause<E2> {
        self.filter_rebuild(
            |leaf| match leaf {
                Leaf::Empty => Some(Cause::empty()),
                Leaf::Fail(e) => Some(f(e)),
                Leaf::Die(d) => Some(Cause::die(d.clone())),
                Leaf::Interrupt(id) => Some(Cause::interrupt(id)),
            },
            true,
        )
        .unwrap_or_default()
    }

    /// Collapses this cause into a single defect-like value using `f` for
    /// checked failures.
    ///
    /// Priority order: the first checked failure (mapped), else a synthetic
    /// interruption defect when any interruptor exists, else the first
    /// defect, else the synthetic interruption defect.
    #[must_use]
    pub fn squash_with(&self, f: impl FnOnce(&E) -> Defect) -> Defect {
        if let Some(error) = self.failure_option() {
            return f(error);
        }
        let interruptors = self.interruptors();
        if !interruptors.is_empty() {
            return Defect::interrupted(&interruptors);
        }
        if let Some(defect) = self.die_option() {
            return defect.clone();
        }
        Defect::interrupted(&interruptors)
    }

    /// [`squash_with`](Cause::squash_with) using the error's own
    /// [`Diagnostic`] conversion.
    #[must_use]
    pub fn squash(&self) -> Defect
    where
        E: Diagnostic,
    {
        self.squash_with(Diagnostic::to_defect)
    }

    /// True if some subtree of `self` is equal to `other`.
    ///
    /// Equality here is the algebraic equality of causes, so a logically
    /// equal subtree matches even when it is spelled differently.
    #[must_use]
    pub fn contains(&self, other: &Cause<E>) -> bool
    where
        E: PartialEq,
    {
        self.find(|sub| if sub == other { Some(()) } else { None })
            .is_some()
    }

    /// Shared rebuilding engine: post-order reconstruction with per-leaf
    /// replacement and collapse of compositions whose sides vanish.
    fn filter_rebuild<'a, E2>(
        &'a self,
        mut leaf: impl FnMut(Leaf<'a, E>) -> Option<Cause<E2>>,
        keep_traces: bool,
    ) -> Option<Cause<E2>> {
        enum Frame<'a, E> {
            Visit(&'a Cause<E>),
            Then,
            Both,
            Traced(&'a Trace),
            Meta(MetaData),
        }

        let mut work: Vec<Frame<'a, E>> = vec![Frame::Visit(self)];
        let mut done: Vec<Option<Cause<E2>>> = Vec::new();
        while let Some(frame) = work.pop() {
            match frame {
                Frame::Visit(cause) => match &cause.node {
                    Node::Empty => done.push(leaf(Leaf::Empty)),
                    Node::Fail(e) => done.push(leaf(Leaf::Fail(e))),
                    Node::Die(d) => done.push(leaf(Leaf::Die(d))),
                    Node::Interrupt(id) => done.push(leaf(Leaf::Interrupt(*id))),
                    Node::Then(l, r) => {
                        work.push(Frame::Then);
                        work.push(Frame::Visit(r.as_ref()));
                        work.push(Frame::Visit(l.as_ref()));
                    }
                    Node::Both(l, r) => {
                        work.push(Frame::Both);
                        work.push(Frame::Visit(r.as_ref()));
                        work.push(Frame::Visit(l.as_ref()));
                    }
                    Node::Traced(inner, trace) => {
                        if keep_traces {
                            work.push(Frame::Traced(trace));
                        }
                        work.push(Frame::Visit(inner.as_ref()));
                    }
                    Node::Meta(inner, meta) => {
                        work.push(Frame::Meta(*meta));
                        work.push(Frame::Visit(inner.as_ref()));
                    }
                },
                Frame::Then => {
                    let right = done.pop().expect("then visit pushed a right result");
                    let left = done.pop().expect("then visit pushed a left result");
                    done.push(merge(left, right, true));
                }
                Frame::Both => {
                    let right = done.pop().expect("both visit pushed a right result");
                    let left = done.pop().expect("both visit pushed a left result");
                    done.push(merge(left, right, false));
                }
                Frame::Traced(trace) => {
                    let inner = done.pop().expect("traced visit pushed a result");
                    done.push(inner.map(|cause| cause.traced(trace.clone())));
                }
                Frame::Meta(meta) => {
                    let inner = done.pop().expect("meta visit pushed a result");
                    done.push(inner.map(|cause| Cause {
                        node: Node::Meta(Arc::new(cause), meta),
                    }));
                }
            }
        }
        done.pop().flatten()
    }
}

impl<E: Clone> Cause<Cause<E>> {
    /// Flattens one level of nesting: each `Fail(inner)` leaf is replaced
    /// by `inner` itself.
    #[must_use]
    pub fn flatten(&self) -> Cause<E> {
        self.flat_map(Clone::clone)
    }
}

impl<E: Clone> Cause<Option<E>> {
    /// Converts a cause of optional failures into an optional cause:
    /// `Fail(None)` leaves are removed (with the same collapse rule as
    /// [`Cause::strip_failures`]), `Fail(Some(e))` leaves become `Fail(e)`.
    #[must_use]
    pub fn sequence_option(&self) -> Option<Cause<E>> {
        self.filter_rebuild(
            |leaf| match leaf {
                Leaf::Empty => Some(Cause::empty()),
                Leaf::Fail(error) => error.as_ref().map(|e| Cause::fail(e.clone())),
                Leaf::Die(d) => Some(Cause::die(d.clone())),
                Leaf::Interrupt(id) => Some(Cause::interrupt(id)),
            },
            true,
        )
    }
}

/// Combines two rebuilt sides, collapsing when a side vanished.
fn merge<E>(left: Option<Cause<E>>, right: Option<Cause<E>>, sequential: bool) -> Option<Cause<E>> {
    match (left, right) {
        (Some(l), Some(r)) => {
            let node = if sequential {
                Node::Then(Arc::new(l), Arc::new(r))
            } else {
                Node::Both(Arc::new(l), Arc::new(r))
            };
            Some(Cause { node })
        }
        (Some(l), None) => Some(l),
        (None, Some(r)) => Some(r),
        (None, None) => None,
    }
}

impl<E> Add for Cause<E> {
    type Output = Cause<E>;

    /// Sequential composition; see [`Cause::seq`].
    fn add(self, rhs: Cause<E>) -> Cause<E> {
        self.seq(rhs)
    }
}

impl<E> BitAnd for Cause<E> {
    type Output = Cause<E>;

    /// Parallel composition; see [`Cause::par`].
    fn bitand(self, rhs: Cause<E>) -> Cause<E> {
        self.par(rhs)
    }
}

impl<E> Default for Cause<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> From<E> for Cause<E> {
    fn from(error: E) -> Self {
        Cause::fail(error)
    }
}

impl<E> Drop for Cause<E> {
    /// Dismantles the tree iteratively so that dropping a deep chain does
    /// not recurse to its depth.
    fn drop(&mut self) {
        if matches!(
            self.node,
            Node::Empty | Node::Fail(_) | Node::Die(_) | Node::Interrupt(_)
        ) {
            return;
        }
        let mut work: Vec<Arc<Cause<E>>> = Vec::new();
        push_children(mem::replace(&mut self.node, Node::Empty), &mut work);
        while let Some(child) = work.pop() {
            if let Some(mut owned) = Arc::into_inner(child) {
                push_children(mem::replace(&mut owned.node, Node::Empty), &mut work);
            }
        }
    }
}

fn push_children<E>(node: Node<E>, work: &mut Vec<Arc<Cause<E>>>) {
    match node {
        Node::Then(l, r) | Node::Both(l, r) => {
            work.push(l);
            work.push(r);
        }
        Node::Traced(inner, _) | Node::Meta(inner, _) => work.push(inner),
        Node::Empty | Node::Fail(_) | Node::Die(_) | Node::Interrupt(_) => {}
    }
}
