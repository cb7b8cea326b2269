//! Property-based tests for the cause algebra.
//!
//! Verifies the composition laws (identity, associativity, commutativity,
//! distributivity, annotation transparency), hash agreement, and the
//! functor/monad laws of `map`/`flat_map` using proptest.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use failtree::{Cause, Defect, FiberId, Trace};
use proptest::prelude::*;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_fiber_id() -> impl Strategy<Value = FiberId> {
    (0i64..3, 0i64..6).prop_map(|(start, seq)| FiberId::new(start, seq))
}

fn arb_defect() -> impl Strategy<Value = Defect> {
    "[a-c]{1,3}".prop_map(Defect::new)
}

fn arb_trace() -> impl Strategy<Value = Trace> {
    (
        arb_fiber_id(),
        proptest::collection::vec("[a-z]{1,4}", 0..3),
    )
        .prop_map(|(id, frames)| Trace::new(id, frames))
}

fn arb_cause() -> impl Strategy<Value = Cause<u8>> {
    let leaf = prop_oneof![
        1 => Just(Cause::empty()),
        3 => (0u8..5).prop_map(Cause::fail),
        2 => arb_defect().prop_map(Cause::die),
        2 => arb_fiber_id().prop_map(Cause::interrupt),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            3 => (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            3 => (inner.clone(), inner.clone()).prop_map(|(a, b)| a & b),
            1 => (inner.clone(), arb_trace()).prop_map(|(c, t)| c.traced(t)),
            1 => inner.clone().prop_map(Cause::stackless),
            1 => inner.prop_map(Cause::stack),
        ]
    })
}

fn hash_of(cause: &Cause<u8>) -> u64 {
    let mut hasher = DefaultHasher::new();
    cause.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Identity, associativity, commutativity, distributivity
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// empty + c == c and c + empty == c.
    #[test]
    fn empty_is_sequential_identity(c in arb_cause()) {
        prop_assert_eq!(Cause::empty() + c.clone(), c.clone());
        prop_assert_eq!(c.clone() + Cause::empty(), c);
    }

    /// (empty & c) == c and (c & empty) == c.
    #[test]
    fn empty_is_parallel_identity(c in arb_cause()) {
        prop_assert_eq!(Cause::empty() & c.clone(), c.clone());
        prop_assert_eq!(c.clone() & Cause::empty(), c);
    }

    /// ((a + b) + c) == (a + (b + c)).
    #[test]
    fn sequential_composition_is_associative(
        a in arb_cause(),
        b in arb_cause(),
        c in arb_cause(),
    ) {
        let lhs = (a.clone() + b.clone()) + c.clone();
        let rhs = a + (b + c);
        prop_assert_eq!(&lhs, &rhs);
        prop_assert_eq!(hash_of(&lhs), hash_of(&rhs));
    }

    /// ((a & b) & c) == (a & (b & c)).
    #[test]
    fn parallel_composition_is_associative(
        a in arb_cause(),
        b in arb_cause(),
        c in arb_cause(),
    ) {
        let lhs = (a.clone() & b.clone()) & c.clone();
        let rhs = a & (b & c);
        prop_assert_eq!(&lhs, &rhs);
        prop_assert_eq!(hash_of(&lhs), hash_of(&rhs));
    }

    /// (a & b) == (b & a).
    #[test]
    fn parallel_composition_commutes(a in arb_cause(), b in arb_cause()) {
        let lhs = a.clone() & b.clone();
        let rhs = b & a;
        prop_assert_eq!(&lhs, &rhs);
        prop_assert_eq!(hash_of(&lhs), hash_of(&rhs));
    }

    /// (a + (b & c)) == ((a + b) & (a + c)).
    #[test]
    fn sequencing_distributes_from_the_left(
        a in arb_cause(),
        b in arb_cause(),
        c in arb_cause(),
    ) {
        let lhs = a.clone() + (b.clone() & c.clone());
        let rhs = (a.clone() + b) & (a + c);
        prop_assert_eq!(&lhs, &rhs);
        prop_assert_eq!(hash_of(&lhs), hash_of(&rhs));
    }

    /// ((a & b) + c) == ((a + c) & (b + c)).
    #[test]
    fn sequencing_distributes_from_the_right(
        a in arb_cause(),
        b in arb_cause(),
        c in arb_cause(),
    ) {
        let lhs = (a.clone() & b.clone()) + c.clone();
        let rhs = (a + c.clone()) & (b + c);
        prop_assert_eq!(&lhs, &rhs);
        prop_assert_eq!(hash_of(&lhs), hash_of(&rhs));
    }

    /// Annotations never affect equality or hashing.
    #[test]
    fn annotations_are_transparent(c in arb_cause(), t in arb_trace()) {
        let traced = c.clone().traced(t);
        prop_assert_eq!(&traced, &c);
        prop_assert_eq!(&c, &traced);
        prop_assert_eq!(hash_of(&traced), hash_of(&c));

        let stackless = c.clone().stackless();
        prop_assert_eq!(&stackless, &c);
        prop_assert_eq!(hash_of(&stackless), hash_of(&c));

        let stack = c.clone().stack();
        prop_assert_eq!(&stack, &c);
        prop_assert_eq!(hash_of(&stack), hash_of(&c));
    }

    /// Equality is reflexive and symmetric across clones.
    #[test]
    fn equality_is_reflexive(c in arb_cause()) {
        prop_assert_eq!(&c, &c.clone());
    }

    /// Equal causes hash equal, sampled over random pairs as well.
    #[test]
    fn equal_causes_hash_equal(a in arb_cause(), b in arb_cause()) {
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }
}

// ============================================================================
// Functor and monad laws
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// map(id) == id.
    #[test]
    fn map_identity(c in arb_cause()) {
        prop_assert_eq!(c.map(|e| *e), c);
    }

    /// map(f).map(g) == map(g ∘ f).
    #[test]
    fn map_composes(c in arb_cause()) {
        let lhs = c.map(|e| e.wrapping_mul(3)).map(|e| e.wrapping_add(7));
        let rhs = c.map(|e| e.wrapping_mul(3).wrapping_add(7));
        prop_assert_eq!(lhs, rhs);
    }

    /// fail(e).flat_map(f) == f(e).
    #[test]
    fn flat_map_left_identity(e in any::<u8>()) {
        let f = |n: &u8| Cause::fail(n.wrapping_add(1)) & Cause::die(Defect::new("boom"));
        prop_assert_eq!(Cause::fail(e).flat_map(f), f(&e));
    }

    /// c.flat_map(fail) == c.
    #[test]
    fn flat_map_right_identity(c in arb_cause()) {
        prop_assert_eq!(c.flat_map(|e| Cause::fail(*e)), c);
    }

    /// c.flat_map(f).flat_map(g) == c.flat_map(|e| f(e).flat_map(g)).
    #[test]
    fn flat_map_is_associative(c in arb_cause()) {
        let f = |n: &u8| Cause::fail(n.wrapping_add(1)) + Cause::fail(n.wrapping_mul(2));
        let g = |n: &u8| Cause::fail(n.wrapping_sub(3)) & Cause::fail(*n);
        let lhs = c.flat_map(f).flat_map(g);
        let rhs = c.flat_map(|e| f(e).flat_map(g));
        prop_assert_eq!(lhs, rhs);
    }
}

// ============================================================================
// Projection contracts over generated causes
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// A cause is empty exactly when it has no failure, defect, or
    /// interruptor.
    #[test]
    fn emptiness_agrees_with_projections(c in arb_cause()) {
        let expected = c.failures().is_empty()
            && c.defects().is_empty()
            && c.interruptors().is_empty();
        prop_assert_eq!(c.is_empty(), expected);
    }

    /// The first failure is the head of the failure list.
    #[test]
    fn failure_option_heads_the_failure_list(c in arb_cause()) {
        prop_assert_eq!(c.failure_option(), c.failures().first().copied());
    }

    /// The first defect is the head of the defect list.
    #[test]
    fn die_option_heads_the_defect_list(c in arb_cause()) {
        prop_assert_eq!(c.die_option(), c.defects().first().copied());
    }

    /// Untracing never changes the cause's identity, only its annotations.
    #[test]
    fn untraced_preserves_equality(c in arb_cause()) {
        let untraced = c.untraced();
        prop_assert!(untraced.traces().is_empty());
        prop_assert_eq!(untraced, c);
    }

    /// A stripped cause contains exactly the defects of the original.
    #[test]
    fn strip_failures_keeps_defect_multiset(c in arb_cause()) {
        let original: Vec<Defect> = c.defects().into_iter().cloned().collect();
        match c.strip_failures() {
            Some(stripped) => {
                let kept: Vec<Defect> = stripped.defects().into_iter().cloned().collect();
                prop_assert_eq!(kept, original);
                prop_assert!(!stripped.failed());
                prop_assert!(!stripped.interrupted());
            }
            None => prop_assert!(original.is_empty()),
        }
    }

    /// Every cause contains itself, however it is respelled.
    #[test]
    fn contains_is_reflexive_modulo_laws(a in arb_cause(), b in arb_cause()) {
        let c = a.clone() & b.clone();
        prop_assert!(c.contains(&(b & a)));
    }
}
