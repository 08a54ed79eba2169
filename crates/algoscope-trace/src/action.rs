//! Per-structure action vocabularies.
//!
//! Each structure gets its own closed enum so a BST trace can never carry a
//! graph `backtrack`. Labels are the kebab-case names the renderer keys its
//! highlight classes on.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Which highlight map a structure's targeted steps land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightScope {
    /// Linked nodes (tree, list, graph vertices).
    Nodes,
    /// Flat items (stack/queue cells, hash entries).
    Items,
}

/// A closed vocabulary of trace actions.
pub trait ActionKind:
    Copy + Eq + Hash + fmt::Debug + Serialize + Send + Sync + 'static
{
    /// Highlight map that targeted steps of this vocabulary update.
    const SCOPE: HighlightScope;

    /// Kebab-case label, e.g. `go-left`.
    fn label(self) -> &'static str;
}

macro_rules! action_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $scope:ident {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl ActionKind for $name {
            const SCOPE: HighlightScope = HighlightScope::$scope;

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

action_vocabulary! {
    /// Binary search tree actions.
    BstAction, Nodes {
        /// Value compared against a node
        Compare => "compare",
        /// Descent into the left subtree
        GoLeft => "go-left",
        /// Descent into the right subtree
        GoRight => "go-right",
        /// New node linked in
        Insert => "insert",
        /// Node structurally removed
        Delete => "delete",
        /// Search hit
        Found => "found",
        /// Deletion target located
        FoundDelete => "found-delete",
        /// In-order successor chosen for a two-child delete
        Successor => "successor",
        /// Search fell off the tree
        NotFound => "not-found",
        /// Traversal visit
        Visit => "visit",
    }
}

action_vocabulary! {
    /// Singly linked list actions.
    ListAction, Nodes {
        /// Walking past a node
        Traverse => "traverse",
        /// New node linked in
        Insert => "insert",
        /// Node unlinked
        Delete => "delete",
        /// Value compared, or pointer about to flip during reversal
        Compare => "compare",
        /// Match located, or pointer flipped during reversal
        Found => "found",
        /// End of list reached without a match
        NotFound => "not-found",
        /// Reversal finished; names the new head
        NewHead => "new-head",
    }
}

action_vocabulary! {
    /// Undirected graph traversal actions.
    GraphAction, Nodes {
        /// Traversal origin
        Start => "start",
        /// Node visited
        Visit => "visit",
        /// Node discovered and queued (BFS)
        Discover => "discover",
        /// Recursion returned to a node (DFS)
        Backtrack => "backtrack",
        /// Edge followed to an undiscovered neighbour
        EdgeVisit => "edge-visit",
        /// Structure-wide note, e.g. unreachable nodes
        Info => "info",
    }
}

action_vocabulary! {
    /// Hash set actions.
    HashAction, Items {
        /// Bucket index computed (or collision noted)
        Hash => "hash",
        /// Bucket entry compared
        Compare => "compare",
        /// Entry chained into its bucket
        Insert => "insert",
        /// Value already present
        Duplicate => "duplicate",
        /// Entry removed
        Delete => "delete",
        /// Membership hit
        Found => "found",
        /// Bucket exhausted without a match
        NotFound => "not-found",
    }
}

action_vocabulary! {
    /// Hash map actions.
    MapAction, Items {
        /// Bucket index computed
        Hash => "hash",
        /// Bucket entry compared
        Compare => "compare",
        /// New entry into an empty bucket
        Insert => "insert",
        /// New entry chained behind existing ones
        Collision => "collision",
        /// Existing key overwritten
        Update => "update",
        /// Key located
        Found => "found",
        /// Entry removed
        Delete => "delete",
        /// Key absent
        NotFound => "not-found",
    }
}

action_vocabulary! {
    /// Stack actions.
    StackAction, Items {
        /// Element pushed on top
        Push => "push",
        /// Element popped off the top
        Pop => "pop",
        /// Top inspected
        Peek => "peek",
        /// Element compared during search
        Compare => "compare",
        /// Search hit
        Found => "found",
    }
}

action_vocabulary! {
    /// Queue actions.
    QueueAction, Items {
        /// Element appended at the rear
        Enqueue => "enqueue",
        /// Element removed from the front
        Dequeue => "dequeue",
        /// Front inspected
        Peek => "peek",
        /// Element compared during search
        Compare => "compare",
        /// Search hit
        Found => "found",
    }
}
