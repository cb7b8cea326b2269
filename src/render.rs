//! Failure reports.
//!
//! [`Cause::pretty_print`] renders a cause as a box-drawing report. The
//! tree is first normalized into a sequence of steps (a run of consecutive
//! sequential compositions becomes one `Sequential`, a run of consecutive
//! parallel compositions one `Parallel` of branches), then laid out on a
//! `╠`/`║` rail terminated by `▼`, with parallel forks opened by a
//! `══╦…══╗` header. A report for one failure happening before a pair of
//! concurrent failures looks like:
//!
//! ```text
//! Fiber failed.
//! ╥
//! ║
//! ╠─ A checked error was not handled.
//! ║  request timed out
//! ║
//! ╠══╦══╗
//! ║  ║  ║
//! ║  ║  ╠─ A checked error was not handled.
//! ║  ║  ║  replica lagging
//! ║  ║  ▼
//! ║  ║
//! ║  ╠─ An unchecked error was produced.
//! ║  ║  index out of bounds
//! ║  ▼
//! ▼
//! ```
//!
//! Trace annotations attach their execution trace to the leaf they directly
//! enclose; around anything larger they emit a rethrown-trace header above
//! the subtree. Rendering annotations toggle whether stack lines of defects
//! and throwable-like failures appear.
//!
//! When the whole cause is a single failure block the rails are skipped and
//! the block follows `Fiber failed.` directly.

use core::fmt;

use crate::cause::{Cause, Node};
use crate::defect::{Defect, Diagnostic};
use crate::fiber::FiberId;
use crate::trace::Trace;

/// One element of a sequential run.
enum Step {
    /// Rendered lines describing a single leaf failure.
    Failure(Vec<String>),
    /// Concurrent branches, each a sequential run of its own.
    Parallel(Vec<Sequential>),
}

/// A sequential run of steps.
struct Sequential {
    steps: Vec<Step>,
}

impl<E: Diagnostic> Cause<E> {
    /// Renders this cause as a human-readable failure report.
    #[must_use]
    pub fn pretty_print(&self) -> String {
        let sequential = to_sequential(self, false);
        let mut out = vec!["Fiber failed.".to_string()];
        if let [Step::Failure(lines)] = sequential.steps.as_slice() {
            if let Some((first, rest)) = lines.split_first() {
                out.push(format!("─ {first}"));
                out.extend(rest.iter().cloned());
            }
            return out.join("\n");
        }
        out.push("╥".to_string());
        out.extend(format_sequential(&sequential));
        out.join("\n")
    }
}

impl<E: Diagnostic> fmt::Display for Cause<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print())
    }
}

/// Normalizes a cause into one sequential run.
fn to_sequential<E: Diagnostic>(cause: &Cause<E>, stackless: bool) -> Sequential {
    Sequential {
        steps: linear_steps(cause, stackless),
    }
}

/// Flattens nested sequential compositions into a flat step list, walking
/// the spine with an explicit stack so chain depth never becomes recursion
/// depth.
fn linear_steps<E: Diagnostic>(cause: &Cause<E>, stackless: bool) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut work: Vec<(&Cause<E>, bool)> = vec![(cause, stackless)];
    while let Some((current, sl)) = work.pop() {
        match &current.node {
            Node::Then(l, r) => {
                work.push((r.as_ref(), sl));
                work.push((l.as_ref(), sl));
            }
            Node::Meta(inner, meta) => work.push((inner.as_ref(), meta.stackless)),
            Node::Both(..) => steps.push(Step::Parallel(parallel_branches(current, sl))),
            Node::Traced(inner, trace) => {
                // Render annotations between the trace and its leaf still
                // apply to that leaf, so peel them before deciding whether
                // the trace encloses a leaf directly.
                let mut leaf = inner.as_ref();
                let mut leaf_sl = sl;
                while let Node::Meta(next, meta) = &leaf.node {
                    leaf_sl = meta.stackless;
                    leaf = next.as_ref();
                }
                match &leaf.node {
                    Node::Fail(e) => {
                        steps.push(Step::Failure(render_fail(e, leaf_sl, Some(trace))));
                    }
                    Node::Die(d) => {
                        steps.push(Step::Failure(render_die(d, leaf_sl, Some(trace))));
                    }
                    Node::Interrupt(id) => {
                        steps.push(Step::Failure(render_interrupt(*id, Some(trace))));
                    }
                    _ => {
                        steps.push(Step::Failure(render_rethrown(trace)));
                        work.push((inner.as_ref(), sl));
                    }
                }
            }
            Node::Empty => {}
            Node::Fail(e) => steps.push(Step::Failure(render_fail(e, sl, None))),
            Node::Die(d) => steps.push(Step::Failure(render_die(d, sl, None))),
            Node::Interrupt(id) => steps.push(Step::Failure(render_interrupt(*id, None))),
        }
    }
    steps
}

/// Flattens nested parallel compositions into branches, again iteratively
/// over the spine.
fn parallel_branches<E: Diagnostic>(cause: &Cause<E>, stackless: bool) -> Vec<Sequential> {
    let mut branches = Vec::new();
    let mut work: Vec<(&Cause<E>, bool)> = vec![(cause, stackless)];
    while let Some((current, sl)) = work.pop() {
        match &current.node {
            Node::Both(l, r) => {
                work.push((r.as_ref(), sl));
                work.push((l.as_ref(), sl));
            }
            Node::Meta(inner, meta) => work.push((inner.as_ref(), meta.stackless)),
            _ => branches.push(to_sequential(current, sl)),
        }
    }
    branches
}

// ---------------------------------------------------------------------
// Leaf rendering
// ---------------------------------------------------------------------

fn render_fail<E: Diagnostic>(error: &E, stackless: bool, trace: Option<&Trace>) -> Vec<String> {
    let mut lines = vec!["A checked error was not handled.".to_string()];
    push_display_lines(&mut lines, &error.to_string());
    if !stackless {
        lines.extend(error.stack_trace().iter().cloned());
    }
    push_trace(&mut lines, trace);
    lines
}

fn render_die(defect: &Defect, stackless: bool, trace: Option<&Trace>) -> Vec<String> {
    let mut lines = vec!["An unchecked error was produced.".to_string()];
    push_display_lines(&mut lines, defect.message());
    if !stackless {
        lines.extend(defect.stack().iter().cloned());
    }
    push_trace(&mut lines, trace);
    lines
}

fn render_interrupt(fiber: FiberId, trace: Option<&Trace>) -> Vec<String> {
    let mut lines = vec![format!("An interrupt was produced by {fiber}.")];
    push_trace(&mut lines, trace);
    lines
}

fn render_rethrown(trace: &Trace) -> Vec<String> {
    let mut lines = vec!["An error was rethrown with a new trace.".to_string()];
    push_trace(&mut lines, Some(trace));
    lines
}

fn push_display_lines(out: &mut Vec<String>, text: &str) {
    for line in text.lines() {
        out.push(line.to_string());
    }
}

fn push_trace(out: &mut Vec<String>, trace: Option<&Trace>) {
    if let Some(trace) = trace {
        out.push(String::new());
        push_display_lines(out, &trace.pretty_print());
    }
}

// ---------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------

fn prefix_block(lines: Vec<String>, first: &str, rest: &str) -> Vec<String> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{first}{line}")
            } else {
                format!("{rest}{line}")
            }
        })
        .collect()
}

/// Lays a sequential run onto the rail: each step hangs off a `╠` junction
/// with `║` continuing past it, and the run ends with `▼`.
fn format_sequential(sequential: &Sequential) -> Vec<String> {
    let mut out = Vec::new();
    for step in &sequential.steps {
        out.push("║".to_string());
        out.extend(prefix_block(format_step(step), "╠", "║"));
    }
    out.push("▼".to_string());
    out
}

fn format_step(step: &Step) -> Vec<String> {
    match step {
        Step::Failure(lines) => prefix_block(lines.clone(), "─ ", "  "),
        Step::Parallel(branches) => {
            let mut out = vec![format!(
                "{}══╗",
                "══╦".repeat(branches.len().saturating_sub(1))
            )];
            // Branches accumulate right to left: each earlier branch pushes
            // the later ones behind its own rail.
            let mut acc: Vec<String> = Vec::new();
            for branch in branches.iter().rev() {
                let mut next = prefix_block(acc, "  ║", "  ║");
                next.extend(prefix_block(format_sequential(branch), "  ", "  "));
                acc = next;
            }
            out.extend(acc);
            out
        }
    }
}
