//! End-to-end scenarios: composition, projection, and report rendering
//! working together the way a runtime consumes them.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use failtree::{Cause, Defect, FiberId, Trace};

fn hash_of<E: Hash>(cause: &Cause<E>) -> u64 {
    let mut hasher = DefaultHasher::new();
    cause.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn sequencing_with_empty_is_invisible_everywhere() {
    let cause = Cause::fail("x".to_string()) + Cause::empty();
    assert_eq!(cause, Cause::fail("x".to_string()));
    assert_eq!(
        cause.pretty_print(),
        "Fiber failed.\n─ A checked error was not handled.\nx"
    );
}

#[test]
fn concurrent_failures_commute_and_fork_the_report() {
    let ab = Cause::fail("a".to_string()) & Cause::fail("b".to_string());
    let ba = Cause::fail("b".to_string()) & Cause::fail("a".to_string());
    assert_eq!(ab, ba);
    assert_eq!(hash_of(&ab), hash_of(&ba));

    for report in [ab.pretty_print(), ba.pretty_print()] {
        assert!(report.starts_with("Fiber failed.\n╥\n"), "{report}");
        assert!(report.contains("══╦══╗"), "{report}");
    }
}

#[test]
fn sequencing_distributes_over_concurrency() {
    let direct = Cause::fail("a".to_string())
        + (Cause::fail("b".to_string()) & Cause::fail("c".to_string()));
    let distributed = (Cause::fail("a".to_string()) + Cause::fail("b".to_string()))
        & (Cause::fail("a".to_string()) + Cause::fail("c".to_string()));
    assert_eq!(direct, distributed);
    assert_eq!(hash_of(&direct), hash_of(&distributed));
}

#[test]
fn interruption_report_names_the_interrupting_fiber() {
    let report = Cause::<String>::interrupt(FiberId::new(0, 42)).pretty_print();
    assert!(
        report.contains("An interrupt was produced by #42."),
        "{report}"
    );
}

#[test]
fn flat_map_substitution_behaves_like_rebinding() {
    let cause = Cause::fail("x".to_string()).flat_map(|s| Cause::fail(format!("{s}{s}")));
    assert_eq!(cause, Cause::fail("xx".to_string()));
}

#[test]
fn chained_failures_project_in_order() {
    let cause = (Cause::fail("a") + Cause::fail("b")) + Cause::fail("c");
    assert_eq!(cause.failures(), vec![&"a", &"b", &"c"]);
    assert_eq!(cause.failure_option(), Some(&"a"));
    assert!(!cause.is_empty());
    assert_eq!(cause, Cause::fail("a") + (Cause::fail("b") + Cause::fail("c")));
}

#[test]
fn a_realistic_mixed_failure_renders_every_part() {
    let trace = Trace::new(FiberId::new(0, 3), vec!["fetch_page".to_string()]);
    let defect = Defect::new("slice index out of range").with_stack(vec![
        "at render".to_string(),
        "at main".to_string(),
    ]);
    let cause = Cause::fail("upstream unavailable".to_string()).traced(trace)
        + (Cause::die(defect) & Cause::interrupt(FiberId::new(0, 9)));

    let report = cause.pretty_print();
    assert!(report.starts_with("Fiber failed.\n╥\n"), "{report}");
    assert!(report.contains("A checked error was not handled."), "{report}");
    assert!(report.contains("upstream unavailable"), "{report}");
    assert!(report.contains("Fiber #3 execution trace:"), "{report}");
    assert!(report.contains("An unchecked error was produced."), "{report}");
    assert!(report.contains("slice index out of range"), "{report}");
    assert!(report.contains("at render"), "{report}");
    assert!(report.contains("An interrupt was produced by #9."), "{report}");
    assert!(report.contains("══╦══╗"), "{report}");

    // The same cause, squashed for an API that wants one value.
    assert_eq!(
        cause.squash(),
        Defect::new("upstream unavailable")
    );
}

#[test]
fn stackless_report_stays_quiet_about_defect_stacks() {
    let defect = Defect::new("boom").with_stack(vec!["at run".to_string()]);
    let loud = Cause::<String>::die(defect.clone()).pretty_print();
    let quiet = Cause::<String>::die(defect).stackless().pretty_print();
    assert!(loud.contains("at run"), "{loud}");
    assert!(!quiet.contains("at run"), "{quiet}");
}

#[test]
fn squash_priorities_follow_the_failure_kinds() {
    let interruptor = FiberId::new(0, 5);

    let failed: Cause<&str> = Cause::fail("worst") & Cause::interrupt(interruptor);
    assert_eq!(failed.squash(), Defect::new("worst"));

    let interrupted: Cause<&str> = Cause::die(Defect::new("boom")) & Cause::interrupt(interruptor);
    assert_eq!(interrupted.squash(), Defect::new("interrupted by #5"));

    let died: Cause<&str> = Cause::die(Defect::new("boom")) + Cause::die(Defect::new("again"));
    assert_eq!(died.squash(), Defect::new("boom"));

    let empty: Cause<&str> = Cause::empty();
    assert_eq!(empty.squash(), Defect::new("interrupted"));
}

#[test]
fn failure_free_causes_retype_without_loss() {
    let cause: Cause<&str> =
        Cause::die(Defect::new("boom")) + Cause::interrupt(FiberId::new(0, 2));
    let retyped = cause.failure_or_cause().expect_err("no checked failure");
    assert_eq!(retyped.defects().len(), 1);
    assert_eq!(retyped.interruptors().len(), 1);

    let with_failure = cause + Cause::fail("late");
    assert_eq!(with_failure.failure_or_cause(), Ok("late"));
}

#[test]
fn option_causes_sequence_into_plain_causes() {
    let recovered: Cause<Option<&str>> = Cause::fail(None) + Cause::die(Defect::new("boom"));
    assert_eq!(
        recovered.sequence_option(),
        Some(Cause::die(Defect::new("boom")))
    );

    let still_failing: Cause<Option<&str>> = Cause::fail(Some("x")) & Cause::fail(None);
    assert_eq!(still_failing.sequence_option(), Some(Cause::fail("x")));

    let nothing_left: Cause<Option<&str>> = Cause::fail(None);
    assert_eq!(nothing_left.sequence_option(), None);
}
