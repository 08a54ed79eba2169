//! Algoscope Structure Engines
//!
//! Classic data structures whose operations narrate themselves. Every
//! mutating or searching operation changes the structure synchronously and
//! returns an [`Outcome`](algoscope_trace::Outcome) carrying the ordered
//! trace of steps that explain what happened.
//!
//! # Design
//!
//! The structure is already in its final state by the time the first step
//! is handed to anyone. A caller that ignores the trace still ends up with a
//! correctly mutated structure; pacing belongs to the animator.
//!
//! Engines are independent of each other. Ids are per engine and
//! deterministic (`bst_0`, `ll_3`, `g_2`, `hs_5`, `stk_1`, `q_4`, `hm_0`).
//!
//! # Hashing
//!
//! The hash set and hash map share [`bucket_for`], a polynomial string hash
//! over the value's `Display` text.

mod bst;
mod config;
mod graph;
mod hash_map;
mod hash_set;
mod hashing;
mod linked_list;
mod queue;
mod stack;

pub use bst::{Bst, BstMetrics, BstNodeView, BstSnapshot, TraversalKind};
pub use config::{CapacityConfig, EngineConfig, HashConfig};
pub use graph::{Graph, GraphEdge, GraphMetrics, GraphNode, GraphSnapshot};
pub use hash_map::{HashMap, HashMapMetrics, HashMapSnapshot, MapEntry};
pub use hash_set::{HashEntry, HashSet, HashSetMetrics, HashSetSnapshot};
pub use hashing::bucket_for;
pub use linked_list::{LinkedList, ListMetrics, ListNodeView, ListSnapshot};
pub use queue::{Queue, QueueMetrics, QueueSnapshot};
pub use stack::{Item, Stack, StackMetrics, StackSnapshot};
