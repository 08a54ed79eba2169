//! Binary search tree engine.
//!
//! Nodes own their children outright; there are no parent pointers. Deletion
//! is a recursive descent that hands each (possibly replaced) subtree back to
//! its parent slot.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use algoscope_trace::{BstAction, IdSequence, Outcome, Rejection, TraceStep};
use serde::{Deserialize, Serialize};
use tracing::debug;

type Step = TraceStep<BstAction>;
type Link = Option<Box<Node>>;

const CONTAINER: &str = "tree";

#[derive(Debug, Clone)]
struct Node {
    id: String,
    value: f64,
    left: Link,
    right: Link,
}

impl Node {
    fn new(id: String, value: f64) -> Self {
        Self {
            id,
            value,
            left: None,
            right: None,
        }
    }
}

/// Traversal discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalKind {
    Inorder,
    Preorder,
    Postorder,
    Levelorder,
}

impl TraversalKind {
    pub const ALL: [Self; 4] = [
        Self::Inorder,
        Self::Preorder,
        Self::Postorder,
        Self::Levelorder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Inorder => "inorder",
            Self::Preorder => "preorder",
            Self::Postorder => "postorder",
            Self::Levelorder => "levelorder",
        }
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraversalKind {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Rejection::UnknownTraversal { kind: s.to_string() })
    }
}

/// Derived tree properties. No trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BstMetrics {
    pub height: usize,
    pub node_count: usize,
    pub is_balanced: bool,
    /// `height(left) - height(right)` at the root.
    pub balance_factor: i64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub is_empty: bool,
}

/// A node as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BstNodeView {
    pub id: String,
    pub value: f64,
    pub depth: usize,
    pub left_id: Option<String>,
    pub right_id: Option<String>,
}

/// Pre-order listing of the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BstSnapshot {
    pub root_id: Option<String>,
    pub nodes: Vec<BstNodeView>,
}

/// Binary search tree over unique finite numbers.
#[derive(Debug, Clone)]
pub struct Bst {
    root: Link,
    ids: IdSequence,
}

impl Default for Bst {
    fn default() -> Self {
        Self::new()
    }
}

impl Bst {
    pub fn new() -> Self {
        Self {
            root: None,
            ids: IdSequence::new("bst"),
        }
    }

    /// Parse user input as a tree value.
    pub fn parse_value(input: &str) -> Result<f64, Rejection> {
        input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Rejection::InvalidNumber {
                input: input.to_string(),
            })
    }

    fn check_finite(value: f64) -> Result<(), Rejection> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Rejection::InvalidNumber {
                input: value.to_string(),
            })
        }
    }

    /// Non-tracing membership test.
    pub fn contains(&self, value: f64) -> bool {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            if value == n.value {
                return true;
            }
            node = if value < n.value {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
        }
        false
    }

    /// Insert a value, narrating the descent.
    ///
    /// Duplicates are rejected up front. The descent itself sends equal
    /// values right, so a duplicate that slipped past would still land in
    /// a valid position.
    pub fn insert(&mut self, value: f64) -> Outcome<BstAction> {
        if let Err(rejection) = Self::check_finite(value) {
            return Outcome::rejected(rejection, Vec::new());
        }
        if self.contains(value) {
            debug!(value, "BST insert rejected: duplicate");
            return Outcome::rejected(
                Rejection::Duplicate {
                    value: value.to_string(),
                    container: CONTAINER,
                },
                Vec::new(),
            );
        }

        let id = self.ids.next_id();

        if self.root.is_none() {
            let steps = vec![Step::on(
                id.clone(),
                BstAction::Insert,
                format!("{value} inserted as root"),
            )];
            self.root = Some(Box::new(Node::new(id, value)));
            debug!(value, "BST root inserted");
            return Outcome::success(format!("Inserted {value} as root"), steps);
        }

        let mut steps = Vec::new();
        let mut parent = (0.0, false);
        let mut link = &mut self.root;
        while let Some(node) = link {
            steps.push(Step::on(
                node.id.clone(),
                BstAction::Compare,
                format!("Comparing {value} with {}", node.value),
            ));
            if value < node.value {
                steps.push(Step::on(
                    node.id.clone(),
                    BstAction::GoLeft,
                    format!("{value} < {}, going left", node.value),
                ));
                parent = (node.value, true);
                link = &mut node.left;
            } else {
                steps.push(Step::on(
                    node.id.clone(),
                    BstAction::GoRight,
                    format!("{value} > {}, going right", node.value),
                ));
                parent = (node.value, false);
                link = &mut node.right;
            }
        }

        let (parent_value, is_left) = parent;
        let side = if is_left { "left" } else { "right" };
        steps.push(Step::on(
            id.clone(),
            BstAction::Insert,
            format!("Inserted {value} as {side} child of {parent_value}"),
        ));
        *link = Some(Box::new(Node::new(id, value)));

        debug!(value, steps = steps.len(), "BST insert");
        Outcome::success(format!("Inserted {value}"), steps)
    }

    /// Remove a value, splicing the tree back together.
    pub fn remove(&mut self, value: f64) -> Outcome<BstAction> {
        if self.root.is_none() {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        }
        if let Err(rejection) = Self::check_finite(value) {
            return Outcome::rejected(rejection, Vec::new());
        }

        let mut steps = Vec::new();
        let mut found = false;
        self.root = remove_from(self.root.take(), value, &mut steps, &mut found);

        debug!(value, found, steps = steps.len(), "BST remove");
        if found {
            Outcome::success(format!("Deleted {value}"), steps)
        } else {
            Outcome::rejected(
                Rejection::NotFound {
                    value: value.to_string(),
                    container: CONTAINER,
                },
                steps,
            )
        }
    }

    /// Search for a value, reporting its depth on success.
    pub fn search(&self, value: f64) -> Outcome<BstAction> {
        if let Err(rejection) = Self::check_finite(value) {
            return Outcome::rejected(rejection, Vec::new());
        }

        let mut steps = Vec::new();
        let mut depth = 0;
        let mut node = self.root.as_deref();

        while let Some(n) = node {
            steps.push(Step::on(
                n.id.clone(),
                BstAction::Compare,
                format!("Comparing {value} with {}", n.value),
            ));
            if value == n.value {
                steps.push(Step::on(
                    n.id.clone(),
                    BstAction::Found,
                    format!("Found {value} at depth {depth}"),
                ));
                return Outcome::success(format!("Found {value} at depth {depth}"), steps);
            }
            if value < n.value {
                steps.push(Step::on(
                    n.id.clone(),
                    BstAction::GoLeft,
                    format!("{value} < {}, going left", n.value),
                ));
                node = n.left.as_deref();
            } else {
                steps.push(Step::on(
                    n.id.clone(),
                    BstAction::GoRight,
                    format!("{value} > {}, going right", n.value),
                ));
                node = n.right.as_deref();
            }
            depth += 1;
        }

        steps.push(Step::new(
            BstAction::NotFound,
            format!("{value} is not in the tree"),
        ));
        Outcome::rejected(
            Rejection::NotFound {
                value: value.to_string(),
                container: CONTAINER,
            },
            steps,
        )
    }

    /// Visit every node once in the given order.
    ///
    /// The outcome's value is the visited sequence.
    pub fn traverse(&self, kind: TraversalKind) -> Outcome<BstAction, Vec<f64>> {
        let Some(root) = self.root.as_deref() else {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        };

        let mut visits: Vec<&Node> = Vec::new();
        match kind {
            TraversalKind::Inorder => inorder(root, &mut visits),
            TraversalKind::Preorder => preorder(root, &mut visits),
            TraversalKind::Postorder => postorder(root, &mut visits),
            TraversalKind::Levelorder => {
                let mut queue = VecDeque::from([root]);
                while let Some(node) = queue.pop_front() {
                    visits.push(node);
                    queue.extend(node.left.as_deref());
                    queue.extend(node.right.as_deref());
                }
            }
        }

        let steps = visits
            .iter()
            .map(|n| Step::on(n.id.clone(), BstAction::Visit, format!("Visit {}", n.value)))
            .collect();
        let result: Vec<f64> = visits.iter().map(|n| n.value).collect();
        let listing = result
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        Outcome::success(format!("{kind} traversal: {listing}"), steps).with_value(result)
    }

    /// Drop the whole tree.
    pub fn clear(&mut self) {
        self.root = None;
    }

    pub fn len(&self) -> usize {
        count(self.root.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        height(self.root.as_deref())
    }

    /// `|height(left) - height(right)| <= 1` at every node.
    pub fn is_balanced(&self) -> bool {
        balanced(self.root.as_deref())
    }

    pub fn min(&self) -> Option<f64> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(node.value)
    }

    pub fn max(&self) -> Option<f64> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(node.value)
    }

    pub fn metrics(&self) -> BstMetrics {
        let balance_factor = self.root.as_deref().map_or(0, |r| {
            height(r.left.as_deref()) as i64 - height(r.right.as_deref()) as i64
        });
        BstMetrics {
            height: self.height(),
            node_count: self.len(),
            is_balanced: self.is_balanced(),
            balance_factor,
            min: self.min(),
            max: self.max(),
            is_empty: self.is_empty(),
        }
    }

    pub fn snapshot(&self) -> BstSnapshot {
        fn walk(node: Option<&Node>, depth: usize, out: &mut Vec<BstNodeView>) {
            let Some(n) = node else { return };
            out.push(BstNodeView {
                id: n.id.clone(),
                value: n.value,
                depth,
                left_id: n.left.as_ref().map(|c| c.id.clone()),
                right_id: n.right.as_ref().map(|c| c.id.clone()),
            });
            walk(n.left.as_deref(), depth + 1, out);
            walk(n.right.as_deref(), depth + 1, out);
        }

        let mut nodes = Vec::new();
        walk(self.root.as_deref(), 0, &mut nodes);
        BstSnapshot {
            root_id: self.root.as_ref().map(|r| r.id.clone()),
            nodes,
        }
    }
}

fn remove_from(link: Link, value: f64, steps: &mut Vec<Step>, found: &mut bool) -> Link {
    let mut node = link?;
    steps.push(Step::on(
        node.id.clone(),
        BstAction::Compare,
        format!("Checking node {}", node.value),
    ));

    if value < node.value {
        steps.push(Step::on(
            node.id.clone(),
            BstAction::GoLeft,
            format!("{value} < {}, searching left", node.value),
        ));
        node.left = remove_from(node.left.take(), value, steps, found);
        return Some(node);
    }
    if value > node.value {
        steps.push(Step::on(
            node.id.clone(),
            BstAction::GoRight,
            format!("{value} > {}, searching right", node.value),
        ));
        node.right = remove_from(node.right.take(), value, steps, found);
        return Some(node);
    }

    *found = true;
    steps.push(Step::on(
        node.id.clone(),
        BstAction::FoundDelete,
        format!("Found {value}, removing"),
    ));

    match (node.left.take(), node.right.take()) {
        (None, None) => {
            steps.push(Step::on(
                node.id.clone(),
                BstAction::Delete,
                format!("{value} is a leaf, removed"),
            ));
            None
        }
        (None, Some(right)) => {
            steps.push(Step::on(
                node.id.clone(),
                BstAction::Delete,
                format!("{value} has only a right child, replacing"),
            ));
            Some(right)
        }
        (Some(left), None) => {
            steps.push(Step::on(
                node.id.clone(),
                BstAction::Delete,
                format!("{value} has only a left child, replacing"),
            ));
            Some(left)
        }
        (Some(left), Some(right)) => {
            let (successor_id, successor_value) = leftmost(&right);
            steps.push(Step::on(
                successor_id,
                BstAction::Successor,
                format!("In-order successor is {successor_value}"),
            ));
            node.value = successor_value;
            node.left = Some(left);
            node.right = remove_from(Some(right), successor_value, steps, found);
            Some(node)
        }
    }
}

fn leftmost(node: &Node) -> (String, f64) {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    (current.id.clone(), current.value)
}

fn inorder<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    if let Some(left) = node.left.as_deref() {
        inorder(left, out);
    }
    out.push(node);
    if let Some(right) = node.right.as_deref() {
        inorder(right, out);
    }
}

fn preorder<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    out.push(node);
    if let Some(left) = node.left.as_deref() {
        preorder(left, out);
    }
    if let Some(right) = node.right.as_deref() {
        preorder(right, out);
    }
}

fn postorder<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    if let Some(left) = node.left.as_deref() {
        postorder(left, out);
    }
    if let Some(right) = node.right.as_deref() {
        postorder(right, out);
    }
    out.push(node);
}

fn height(node: Option<&Node>) -> usize {
    node.map_or(0, |n| {
        1 + height(n.left.as_deref()).max(height(n.right.as_deref()))
    })
}

fn count(node: Option<&Node>) -> usize {
    node.map_or(0, |n| {
        1 + count(n.left.as_deref()) + count(n.right.as_deref())
    })
}

fn balanced(node: Option<&Node>) -> bool {
    node.map_or(true, |n| {
        let diff = height(n.left.as_deref()).abs_diff(height(n.right.as_deref()));
        diff <= 1 && balanced(n.left.as_deref()) && balanced(n.right.as_deref())
    })
}
