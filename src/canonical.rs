//! Canonical forms: algebraic equality and hashing for causes.
//!
//! Two causes are equal when one can be rewritten into the other using the
//! composition laws (see the law table in [`crate::cause`]). Deciding that
//! relation law-by-law does not close over transitive chains, so this module
//! normalizes instead: every cause reduces to a **multiset of words**, where
//! a word is a sequence of failure atoms. Each law corresponds to one
//! feature of the representation:
//!
//! - sequential composition is word concatenation, so `Then` associativity
//!   is free;
//! - parallel composition is multiset union, so `Both` associativity and
//!   commutativity are free (a multiset rather than a set, so `a & a`
//!   stays distinct from `a`);
//! - sequencing distributes over the union as the word product, realizing
//!   both distributivity directions;
//! - the empty cause is the empty word, normalized away unless it is the
//!   whole value, realizing the identity laws;
//! - trace and rendering annotations are skipped entirely.
//!
//! Hashes are computed from the same form, combining word hashes with an
//! order-insensitive sum, so equal causes hash equal by construction. Word
//! hashing uses a fixed-seed hasher, keeping canonical hashes reproducible
//! run to run.
//!
//! Normalization is bottom-up over an explicit work stack, and word
//! concatenation always drains the shorter side, so deep chains in either
//! association normalize without deep recursion and without quadratic
//! copying. Distribution can still duplicate work for adversarial
//! sequences of parallel groups; that cost is inherent to the quotient.

use core::hash::{Hash, Hasher};
use std::collections::VecDeque;

use crate::cause::{Cause, Node};
use crate::defect::Defect;
use crate::fiber::FiberId;

/// A single failure atom: the leaves that survive normalization.
#[derive(Debug, PartialEq)]
enum Atom<'a, E> {
    Fail(&'a E),
    Die(&'a Defect),
    Interrupt(FiberId),
}

impl<E> Clone for Atom<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Atom<'_, E> {}

impl<E: Hash> Hash for Atom<'_, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Atom::Fail(e) => {
                state.write_u8(1);
                e.hash(state);
            }
            Atom::Die(d) => {
                state.write_u8(2);
                d.hash(state);
            }
            Atom::Interrupt(id) => {
                state.write_u8(3);
                id.hash(state);
            }
        }
    }
}

/// A sequential run of atoms. Double-ended so concatenation can extend
/// whichever side is cheaper.
type Word<'a, E> = VecDeque<Atom<'a, E>>;

/// The normal form of a cause: an unordered collection of words.
///
/// Invariant: either exactly one empty word (the empty cause), or every
/// word is non-empty.
struct Canonical<'a, E> {
    words: Vec<Word<'a, E>>,
}

impl<'a, E> Canonical<'a, E> {
    /// The empty cause.
    fn one() -> Self {
        Self {
            words: vec![VecDeque::new()],
        }
    }

    fn atom(atom: Atom<'a, E>) -> Self {
        Self {
            words: vec![VecDeque::from([atom])],
        }
    }

    fn is_one(&self) -> bool {
        self.words.len() == 1 && self.words[0].is_empty()
    }

    /// Sequential composition: the word product.
    fn seq(mut self, mut other: Self) -> Self {
        if self.is_one() {
            return other;
        }
        if other.is_one() {
            return self;
        }
        if self.words.len() == 1 && other.words.len() == 1 {
            // The dominant shape: two plain chains.
            let right = other.words.pop().expect("single-word canonical");
            let left = self.words.pop().expect("single-word canonical");
            return Self {
                words: vec![concat(left, right)],
            };
        }
        let mut words = Vec::with_capacity(self.words.len() * other.words.len());
        for left in &self.words {
            for right in &other.words {
                let mut word = left.clone();
                word.extend(right.iter().copied());
                words.push(word);
            }
        }
        Self { words }
    }

    /// Parallel composition: multiset union, with the empty word absorbed
    /// by anything non-empty.
    fn par(mut self, mut other: Self) -> Self {
        if self.is_one() {
            return other;
        }
        if other.is_one() {
            return self;
        }
        if self.words.len() < other.words.len() {
            core::mem::swap(&mut self.words, &mut other.words);
        }
        self.words.append(&mut other.words);
        self
    }
}

impl<E: PartialEq> Canonical<'_, E> {
    /// Multiset equality by pairwise matching. Word order carries no
    /// meaning, so each word of `self` claims one unclaimed equal word of
    /// `other`.
    fn matches(&self, other: &Self) -> bool {
        if self.words.len() != other.words.len() {
            return false;
        }
        let mut claimed = vec![false; other.words.len()];
        'words: for word in &self.words {
            for (i, candidate) in other.words.iter().enumerate() {
                if !claimed[i] && word == candidate {
                    claimed[i] = true;
                    continue 'words;
                }
            }
            return false;
        }
        true
    }
}

/// Concatenates two words, draining the shorter into the longer.
fn concat<'a, E>(mut left: Word<'a, E>, mut right: Word<'a, E>) -> Word<'a, E> {
    if left.len() >= right.len() {
        for atom in right {
            left.push_back(atom);
        }
        left
    } else {
        while let Some(atom) = left.pop_back() {
            right.push_front(atom);
        }
        right
    }
}

/// Normalizes a cause bottom-up with an explicit work stack.
fn canonical<E>(cause: &Cause<E>) -> Canonical<'_, E> {
    enum Frame<'a, E> {
        Visit(&'a Cause<E>),
        Seq,
        Par,
    }

    let mut work: Vec<Frame<'_, E>> = vec![Frame::Visit(cause)];
    let mut done: Vec<Canonical<'_, E>> = Vec::new();
    while let Some(frame) = work.pop() {
        match frame {
            Frame::Visit(current) => match &current.node {
                Node::Empty => done.push(Canonical::one()),
                Node::Fail(e) => done.push(Canonical::atom(Atom::Fail(e))),
                Node::Die(d) => done.push(Canonical::atom(Atom::Die(d))),
                Node::Interrupt(id) => done.push(Canonical::atom(Atom::Interrupt(*id))),
                Node::Then(l, r) => {
                    work.push(Frame::Seq);
                    work.push(Frame::Visit(r.as_ref()));
                    work.push(Frame::Visit(l.as_ref()));
                }
                Node::Both(l, r) => {
                    work.push(Frame::Par);
                    work.push(Frame::Visit(r.as_ref()));
                    work.push(Frame::Visit(l.as_ref()));
                }
                Node::Traced(inner, _) | Node::Meta(inner, _) => {
                    work.push(Frame::Visit(inner.as_ref()));
                }
            },
            Frame::Seq => {
                let right = done.pop().expect("visit pushed a right form");
                let left = done.pop().expect("visit pushed a left form");
                done.push(left.seq(right));
            }
            Frame::Par => {
                let right = done.pop().expect("visit pushed a right form");
                let left = done.pop().expect("visit pushed a left form");
                done.push(left.par(right));
            }
        }
    }
    done.pop().expect("normalization produced a form")
}

/// Syntactic equality, used as a fast path before normalizing. Never
/// reports equality the algebra would deny: identical trees are equal by
/// reflexivity.
fn structural_eq<E: PartialEq>(a: &Cause<E>, b: &Cause<E>) -> bool {
    let mut work: Vec<(&Cause<E>, &Cause<E>)> = vec![(a, b)];
    while let Some((x, y)) = work.pop() {
        if core::ptr::eq(x, y) {
            continue;
        }
        match (&x.node, &y.node) {
            (Node::Empty, Node::Empty) => {}
            (Node::Fail(e1), Node::Fail(e2)) if e1 == e2 => {}
            (Node::Die(d1), Node::Die(d2)) if d1 == d2 => {}
            (Node::Interrupt(i1), Node::Interrupt(i2)) if i1 == i2 => {}
            (Node::Then(l1, r1), Node::Then(l2, r2))
            | (Node::Both(l1, r1), Node::Both(l2, r2)) => {
                work.push((r1.as_ref(), r2.as_ref()));
                work.push((l1.as_ref(), l2.as_ref()));
            }
            (Node::Traced(c1, t1), Node::Traced(c2, t2)) if t1 == t2 => {
                work.push((c1.as_ref(), c2.as_ref()));
            }
            (Node::Meta(c1, m1), Node::Meta(c2, m2)) if m1 == m2 => {
                work.push((c1.as_ref(), c2.as_ref()));
            }
            _ => return false,
        }
    }
    true
}

impl<E: PartialEq> PartialEq for Cause<E> {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other) || canonical(self).matches(&canonical(other))
    }
}

impl<E: Eq> Eq for Cause<E> {}

impl<E: Hash> Hash for Cause<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let form = canonical(self);
        if form.is_one() {
            state.write_u8(0);
            return;
        }
        let mut combined: u64 = 0;
        for word in &form.words {
            let mut hasher = WordHasher::default();
            for atom in word {
                atom.hash(&mut hasher);
            }
            combined = combined.wrapping_add(hasher.finish());
        }
        state.write_u8(1);
        state.write_usize(form.words.len());
        state.write_u64(combined);
    }
}

/// Fixed-seed FNV-1a hasher for words, so canonical hashes do not depend
/// on process-level hasher seeding.
struct WordHasher {
    state: u64,
}

impl WordHasher {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
}

impl Default for WordHasher {
    fn default() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for WordHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }

    fn write_u64(&mut self, value: u64) {
        self.write(&value.to_le_bytes());
    }

    fn write_usize(&mut self, value: usize) {
        // Width-independent: usize always hashes as eight bytes.
        self.write_u64(value as u64);
    }

    fn finish(&self) -> u64 {
        // Final avalanche so short words spread across the output range.
        let mut h = self.state;
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h
    }
}
