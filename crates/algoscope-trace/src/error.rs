//! Error types for algoscope.

use serde::Serialize;
use thiserror::Error;

/// Result type for configuration and setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors outside the data structure domain.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why an operation was rejected.
///
/// These are expected domain outcomes, reported as values inside an
/// [`Outcome`](crate::Outcome). The `Display` text is the outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// Input does not parse as a finite number.
    #[error("\"{input}\" is not a valid number")]
    InvalidNumber { input: String },

    /// Blank label or value.
    #[error("{what} cannot be empty")]
    EmptyInput { what: &'static str },

    /// Value already present in a unique-valued structure.
    #[error("{value} already exists in the {container}")]
    Duplicate {
        value: String,
        container: &'static str,
    },

    /// Value absent.
    #[error("{value} not found in the {container}")]
    NotFound {
        value: String,
        container: &'static str,
    },

    /// Operation needs at least one element.
    #[error("{container} is empty")]
    Empty { container: &'static str },

    /// Removal from an empty stack or queue.
    #[error("{container} underflow: {container} is empty")]
    Underflow { container: &'static str },

    /// Insertion beyond the configured capacity.
    #[error("{container} overflow: maximum size is {capacity}")]
    Overflow {
        container: &'static str,
        capacity: usize,
    },

    /// Index below zero.
    #[error("index must be >= 0, got {index}")]
    NegativeIndex { index: i64 },

    /// Index past the end.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Too few elements for the operation to mean anything.
    #[error("{container} needs at least {min} nodes")]
    TooShort {
        container: &'static str,
        min: usize,
    },

    /// Traversal discipline not recognised.
    #[error("unknown traversal \"{kind}\", expected inorder, preorder, postorder or levelorder")]
    UnknownTraversal { kind: String },

    /// Edge from a node to itself.
    #[error("self-loops are not allowed")]
    SelfLoop,

    /// Edge endpoint not supplied.
    #[error("select both endpoints")]
    MissingEndpoint,

    /// Referenced node id does not exist.
    #[error("node {id} not found")]
    UnknownNode { id: String },

    /// Edge already present.
    #[error("edge already exists between {from} and {to}")]
    EdgeExists { from: String, to: String },

    /// Edge absent.
    #[error("no edge between {from} and {to}")]
    EdgeMissing { from: String, to: String },
}
