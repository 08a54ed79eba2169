//! Transient highlight state.
//!
//! The renderer owns the meaning of these labels; this module only routes a
//! step to the right map. Nothing here is read back by the engines.

use std::collections::HashMap;

use serde::Serialize;

use crate::action::{ActionKind, HighlightScope};
use crate::step::TraceStep;

/// Current action label per entity id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights<A> {
    pub node_states: HashMap<String, A>,
    pub edge_states: HashMap<String, A>,
    pub item_states: HashMap<String, A>,
}

impl<A> Default for Highlights<A> {
    fn default() -> Self {
        Self {
            node_states: HashMap::new(),
            edge_states: HashMap::new(),
            item_states: HashMap::new(),
        }
    }
}

impl<A: ActionKind> Highlights<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key used for bucket-level highlights in `item_states`.
    pub fn bucket_key(bucket: usize) -> String {
        format!("bucket-{bucket}")
    }

    /// Record the step's action against whatever it targets.
    ///
    /// Edge steps mark both orientations. Targeted steps go to nodes or
    /// items depending on the vocabulary. Bucket-only steps mark the bucket.
    pub fn apply(&mut self, step: &TraceStep<A>) {
        if let Some(edge) = &step.edge_id {
            self.edge_states.insert(edge.clone(), step.action);
        }
        if let Some(edge) = &step.reverse_edge_id {
            self.edge_states.insert(edge.clone(), step.action);
        }

        match (&step.target_id, step.bucket_index) {
            (Some(id), _) => {
                let map = match A::SCOPE {
                    HighlightScope::Nodes => &mut self.node_states,
                    HighlightScope::Items => &mut self.item_states,
                };
                map.insert(id.clone(), step.action);
            }
            (None, Some(bucket)) => {
                self.item_states.insert(Self::bucket_key(bucket), step.action);
            }
            (None, None) => {}
        }
    }

    pub fn set_node(&mut self, id: impl Into<String>, action: A) {
        self.node_states.insert(id.into(), action);
    }

    pub fn set_edge(&mut self, id: impl Into<String>, action: A) {
        self.edge_states.insert(id.into(), action);
    }

    pub fn set_item(&mut self, id: impl Into<String>, action: A) {
        self.item_states.insert(id.into(), action);
    }

    pub fn node_state(&self, id: &str) -> Option<A> {
        self.node_states.get(id).copied()
    }

    pub fn edge_state(&self, id: &str) -> Option<A> {
        self.edge_states.get(id).copied()
    }

    pub fn item_state(&self, id: &str) -> Option<A> {
        self.item_states.get(id).copied()
    }

    /// Reset after an animation completes or is cancelled.
    pub fn clear(&mut self) {
        self.node_states.clear();
        self.edge_states.clear();
        self.item_states.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.node_states.is_empty() && self.edge_states.is_empty() && self.item_states.is_empty()
    }
}
