//! The atomic unit of animation.

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;

/// An ordered, single-use narration of one operation.
pub type Trace<A> = Vec<TraceStep<A>>;

/// One step of an operation's narration.
///
/// Steps are plain data. `message` is always populated; the optional fields
/// say which entity the step concerns so a renderer can highlight it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep<A> {
    /// Node, item or entry id. Absent for structure-wide steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Bucket involved (hash structures only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_index: Option<usize>,
    /// Canonical edge id `from__to` (graph edge steps only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<String>,
    /// The opposite orientation `to__from`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_edge_id: Option<String>,
    pub action: A,
    pub message: String,
}

impl<A: ActionKind> TraceStep<A> {
    /// A structure-wide step with no target.
    pub fn new(action: A, message: impl Into<String>) -> Self {
        Self {
            target_id: None,
            bucket_index: None,
            edge_id: None,
            reverse_edge_id: None,
            action,
            message: message.into(),
        }
    }

    /// A step concerning a single entity.
    pub fn on(target_id: impl Into<String>, action: A, message: impl Into<String>) -> Self {
        Self {
            target_id: Some(target_id.into()),
            ..Self::new(action, message)
        }
    }

    /// An edge traversal step. Both orientations are carried.
    pub fn edge(from: &str, to: &str, action: A, message: impl Into<String>) -> Self {
        Self {
            edge_id: Some(format!("{from}__{to}")),
            reverse_edge_id: Some(format!("{to}__{from}")),
            ..Self::new(action, message)
        }
    }

    /// Tag the step with a hash bucket.
    #[must_use]
    pub fn in_bucket(mut self, bucket: usize) -> Self {
        self.bucket_index = Some(bucket);
        self
    }

    /// Whether this step concerns an edge.
    pub fn is_edge(&self) -> bool {
        self.edge_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{GraphAction, HashAction};

    #[test]
    fn edge_step_carries_both_orientations() {
        let step = TraceStep::edge("g_0", "g_1", GraphAction::EdgeVisit, "Exploring edge");
        assert_eq!(step.edge_id.as_deref(), Some("g_0__g_1"));
        assert_eq!(step.reverse_edge_id.as_deref(), Some("g_1__g_0"));
        assert!(step.target_id.is_none());
        assert!(step.is_edge());
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let step = TraceStep::new(HashAction::Hash, "hash(\"a\") -> bucket 1").in_bucket(1);
        let json = serde_json::to_string(&step).unwrap();

        assert!(json.contains("\"bucket_index\":1"));
        assert!(json.contains("\"action\":\"hash\""));
        assert!(!json.contains("target_id"));
        assert!(!json.contains("edge_id"));

        let parsed: TraceStep<HashAction> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, step);
    }
}
