//! Manual step-through of a trace.

use serde::{Deserialize, Serialize};

use crate::step::TraceStep;

/// Where the cursor stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorState {
    /// At the beginning, nothing shown yet
    Stopped,
    /// Somewhere in the middle
    Stepping,
    /// Every step has been shown
    Finished,
}

/// Step-mode controller over a finished trace.
///
/// Unlike the scheduler this has no clock: the caller decides when to
/// advance. Useful when the user wants to click through an operation.
#[derive(Debug, Clone)]
pub struct TraceCursor<A> {
    steps: Vec<TraceStep<A>>,
    position: usize,
    state: CursorState,
}

impl<A> TraceCursor<A> {
    pub fn new(steps: Vec<TraceStep<A>>) -> Self {
        Self {
            steps,
            position: 0,
            state: CursorState::Stopped,
        }
    }

    /// Number of steps already shown.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Jump to a position, clamped to the trace length.
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.steps.len());
        self.state = if self.position == self.steps.len() && !self.steps.is_empty() {
            CursorState::Finished
        } else if self.position == 0 {
            CursorState::Stopped
        } else {
            CursorState::Stepping
        };
    }

    /// Show the next step.
    pub fn step_forward(&mut self) -> Option<&TraceStep<A>> {
        let step = self.steps.get(self.position)?;
        self.position += 1;
        self.state = if self.position >= self.steps.len() {
            CursorState::Finished
        } else {
            CursorState::Stepping
        };
        Some(step)
    }

    /// Un-show the last step.
    pub fn step_backward(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.state = if self.position == 0 {
                CursorState::Stopped
            } else {
                CursorState::Stepping
            };
        }
    }

    /// Back to the beginning.
    pub fn reset(&mut self) {
        self.position = 0;
        self.state = CursorState::Stopped;
    }

    /// Steps shown so far, for rebuilding highlight state after a seek.
    pub fn steps_to_current(&self) -> &[TraceStep<A>] {
        &self.steps[..self.position]
    }

    /// The most recently shown step.
    pub fn current_step(&self) -> Option<&TraceStep<A>> {
        self.position.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Fraction shown, 0.0 - 1.0.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.position as f64 / self.steps.len() as f64
        }
    }
}

/// Cursor status for a progress display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorStatus {
    pub position: usize,
    pub total_steps: usize,
    pub state: CursorState,
    pub progress: f64,
}

impl<A> From<&TraceCursor<A>> for CursorStatus {
    fn from(cursor: &TraceCursor<A>) -> Self {
        Self {
            position: cursor.position,
            total_steps: cursor.total_steps(),
            state: cursor.state,
            progress: cursor.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ListAction;

    fn make_steps(count: usize) -> Vec<TraceStep<ListAction>> {
        (0..count)
            .map(|i| TraceStep::on(format!("ll_{i}"), ListAction::Traverse, format!("At index {i}")))
            .collect()
    }

    #[test]
    fn cursor_starts_at_zero() {
        let cursor = TraceCursor::new(make_steps(4));
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.state(), CursorState::Stopped);
        assert!(cursor.current_step().is_none());
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut cursor = TraceCursor::new(make_steps(10));

        cursor.seek(5);
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.state(), CursorState::Stepping);

        cursor.seek(100);
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.state(), CursorState::Finished);

        cursor.seek(0);
        assert_eq!(cursor.state(), CursorState::Stopped);
    }

    #[test]
    fn step_forward_stops_at_end() {
        let mut cursor = TraceCursor::new(make_steps(2));

        assert_eq!(cursor.step_forward().map(|s| s.message.as_str()), Some("At index 0"));
        assert_eq!(cursor.state(), CursorState::Stepping);
        cursor.step_forward();
        assert_eq!(cursor.state(), CursorState::Finished);
        assert!(cursor.step_forward().is_none());
        assert_eq!(cursor.current_step().map(|s| s.message.as_str()), Some("At index 1"));
    }

    #[test]
    fn step_backward_rewinds() {
        let mut cursor = TraceCursor::new(make_steps(3));
        cursor.seek(2);
        cursor.step_backward();
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.steps_to_current().len(), 1);

        cursor.step_backward();
        cursor.step_backward();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.state(), CursorState::Stopped);
    }

    #[test]
    fn progress_and_status() {
        let mut cursor = TraceCursor::new(make_steps(4));
        assert_eq!(cursor.progress(), 0.0);

        cursor.seek(2);
        let status = CursorStatus::from(&cursor);
        assert_eq!(status.position, 2);
        assert_eq!(status.total_steps, 4);
        assert_eq!(status.progress, 0.5);

        let empty: TraceCursor<ListAction> = TraceCursor::new(Vec::new());
        assert_eq!(empty.progress(), 0.0);
    }
}
