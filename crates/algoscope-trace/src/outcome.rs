//! Operation results.

use serde::Serialize;

use crate::error::Rejection;
use crate::step::TraceStep;

/// The result of one engine operation.
///
/// The structure has already been mutated (or left untouched, if rejected)
/// by the time this is returned. `steps` narrates what happened and may be
/// partial when the operation was rejected mid-search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<A, V = ()> {
    /// `true` unless the operation was rejected.
    pub ok: bool,
    /// Human-readable summary.
    pub message: String,
    /// Ordered narration, possibly empty.
    pub steps: Vec<TraceStep<A>>,
    /// Operation-specific payload (popped value, traversal order, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,
    /// Typed failure reason when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl<A, V> Outcome<A, V> {
    /// A successful operation.
    pub fn success(message: impl Into<String>, steps: Vec<TraceStep<A>>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            steps,
            value: None,
            rejection: None,
        }
    }

    /// A rejected operation. The message is the rejection's text.
    pub fn rejected(rejection: Rejection, steps: Vec<TraceStep<A>>) -> Self {
        Self {
            ok: false,
            message: rejection.to_string(),
            steps,
            value: None,
            rejection: Some(rejection),
        }
    }

    /// Attach the operation's payload.
    #[must_use]
    pub fn with_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// Whether the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Number of steps in the narration.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Hand the trace off, e.g. to the scheduler.
    pub fn into_steps(self) -> Vec<TraceStep<A>> {
        self.steps
    }
}
