//! Algoscope Trace Model
//!
//! The shared vocabulary between the structure engines, the animation
//! scheduler and whatever renders the result.
//!
//! # Architecture
//!
//! - **Steps**: an engine operation mutates its structure once and returns an
//!   ordered [`Trace`] narrating how it got there
//! - **Outcomes**: every operation reports `ok`, a message and its steps as a
//!   value; expected failures are [`Rejection`]s, never panics
//! - **Highlights**: transient per-entity action labels a renderer applies
//!   while a trace is replayed
//! - **Cursor**: manual step-through of a trace (step mode)
//!
//! # Usage
//!
//! ```ignore
//! let outcome = bst.insert(42.0);
//! let mut highlights = Highlights::new();
//! for step in &outcome.steps {
//!     highlights.apply(step);
//! }
//! ```

mod action;
mod cursor;
mod error;
mod highlight;
mod ids;
mod outcome;
mod step;

pub use action::{
    ActionKind, BstAction, GraphAction, HashAction, HighlightScope, ListAction, MapAction,
    QueueAction, StackAction,
};
pub use cursor::{CursorState, CursorStatus, TraceCursor};
pub use error::{Error, Rejection, Result};
pub use highlight::Highlights;
pub use ids::IdSequence;
pub use outcome::Outcome;
pub use step::{Trace, TraceStep};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_steps_feed_highlights() {
        let steps = vec![
            TraceStep::on("bst_0", BstAction::Compare, "Comparing 5 with 8"),
            TraceStep::on("bst_0", BstAction::GoLeft, "5 < 8, going left"),
            TraceStep::on("bst_1", BstAction::Insert, "Inserted 5 as left child of 8"),
        ];
        let outcome: Outcome<BstAction> = Outcome::success("Inserted 5", steps);

        let mut highlights = Highlights::new();
        for step in &outcome.steps {
            highlights.apply(step);
        }

        assert_eq!(highlights.node_state("bst_0"), Some(BstAction::GoLeft));
        assert_eq!(highlights.node_state("bst_1"), Some(BstAction::Insert));
    }

    #[test]
    fn cursor_walks_outcome_trace() {
        let outcome: Outcome<StackAction> = Outcome::success(
            "Pushed 1",
            vec![TraceStep::on("stk_0", StackAction::Push, "Pushing 1")],
        );
        let mut cursor = TraceCursor::new(outcome.steps);

        assert!(cursor.step_forward().is_some());
        assert_eq!(cursor.state(), CursorState::Finished);
    }
}
