//! Undirected graph engine.
//!
//! Connectivity lives in `adjacency`, which is kept symmetric. The edge list
//! exists for display and always holds one record per connected pair.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::f64::consts::TAU;

use algoscope_trace::{GraphAction, IdSequence, Outcome, Rejection, TraceStep};
use serde::Serialize;
use tracing::debug;

type Step = TraceStep<GraphAction>;

/// Centre of the drawing area, where the first node goes.
const CENTER: (f64, f64) = (350.0, 210.0);
/// Nodes per placement ring.
const RING_SIZE: usize = 6;
const MIN_SPACING: f64 = 65.0;
const MAX_NUDGES: usize = 20;
const NUDGE_DISTANCE: f64 = 20.0;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
/// Placement bounds `(min_x, max_x, min_y, max_y)`.
const PLACE_BOUNDS: (f64, f64, f64, f64) = (40.0, 660.0, 40.0, 400.0);
/// Bounds for user-dragged positions.
const MOVE_BOUNDS: (f64, f64, f64, f64) = (30.0, 670.0, 30.0, 410.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Canonical `from__to`, in the orientation the edge was added.
    pub id: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// `edges / (n * (n - 1) / 2)`, 0 with fewer than two nodes.
    pub density: f64,
    pub components: usize,
    pub avg_degree: f64,
    pub is_empty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Undirected graph without self-loops or parallel edges.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    adjacency: BTreeMap<String, BTreeSet<String>>,
    edges: Vec<GraphEdge>,
    ids: IdSequence,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            adjacency: BTreeMap::new(),
            edges: Vec::new(),
            ids: IdSequence::new("g"),
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Id of the node with this label, compared case-insensitively.
    pub fn find_by_label(&self, label: &str) -> Option<&str> {
        let wanted = label.trim().to_lowercase();
        self.nodes
            .iter()
            .find(|n| n.label.to_lowercase() == wanted)
            .map(|n| n.id.as_str())
    }

    /// Label for display, falling back to the id.
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.node(id).map_or(id, |n| n.label.as_str())
    }

    /// Sorted neighbour ids.
    pub fn neighbors(&self, id: &str) -> Option<impl Iterator<Item = &str>> {
        self.adjacency.get(id).map(|set| set.iter().map(String::as_str))
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.adjacency.get(from).is_some_and(|set| set.contains(to))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add a labelled node. The outcome's value is the new id.
    pub fn add_node(&mut self, label: &str) -> Outcome<GraphAction, String> {
        let label = label.trim();
        if label.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "node label" }, Vec::new());
        }
        if self.find_by_label(label).is_some() {
            return Outcome::rejected(
                Rejection::Duplicate {
                    value: format!("node \"{label}\""),
                    container: "graph",
                },
                Vec::new(),
            );
        }

        let id = self.ids.next_id();
        let (x, y) = place(&self.nodes);
        self.adjacency.insert(id.clone(), BTreeSet::new());
        self.nodes.push(GraphNode {
            id: id.clone(),
            label: label.to_string(),
            x,
            y,
        });

        debug!(%id, label, x, y, "Graph node added");
        Outcome::success(format!("Added node \"{label}\""), Vec::new()).with_value(id)
    }

    /// Connect two existing, distinct, not yet adjacent nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Outcome<GraphAction> {
        if from.is_empty() || to.is_empty() {
            return Outcome::rejected(Rejection::MissingEndpoint, Vec::new());
        }
        if from == to {
            return Outcome::rejected(Rejection::SelfLoop, Vec::new());
        }
        if let Err(rejection) = self.require(from).and_then(|_| self.require(to)) {
            return Outcome::rejected(rejection, Vec::new());
        }
        if self.has_edge(from, to) {
            return Outcome::rejected(
                Rejection::EdgeExists {
                    from: self.label_of(from).to_string(),
                    to: self.label_of(to).to_string(),
                },
                Vec::new(),
            );
        }

        self.link(from, to);
        self.link(to, from);
        self.edges.push(GraphEdge {
            id: format!("{from}__{to}"),
            from: from.to_string(),
            to: to.to_string(),
        });
        debug_assert!(self.is_symmetric());

        let message = format!("Connected {} <-> {}", self.label_of(from), self.label_of(to));
        debug!(from, to, "Graph edge added");
        Outcome::success(message, Vec::new())
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Outcome<GraphAction> {
        let Some(neighbors) = self.adjacency.remove(id) else {
            return Outcome::rejected(Rejection::UnknownNode { id: id.to_string() }, Vec::new());
        };
        for neighbor in &neighbors {
            if let Some(set) = self.adjacency.get_mut(neighbor) {
                set.remove(id);
            }
        }
        self.edges.retain(|e| e.from != id && e.to != id);

        let label = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .map(|i| self.nodes.remove(i).label)
            .unwrap_or_else(|| id.to_string());

        debug!(id, removed_edges = neighbors.len(), "Graph node removed");
        Outcome::success(format!("Removed node \"{label}\" and its edges"), Vec::new())
    }

    /// Remove the edge between two nodes, whichever way it was added.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> Outcome<GraphAction> {
        if let Err(rejection) = self.require(from).and_then(|_| self.require(to)) {
            return Outcome::rejected(rejection, Vec::new());
        }
        if !self.has_edge(from, to) {
            return Outcome::rejected(
                Rejection::EdgeMissing {
                    from: self.label_of(from).to_string(),
                    to: self.label_of(to).to_string(),
                },
                Vec::new(),
            );
        }

        if let Some(set) = self.adjacency.get_mut(from) {
            set.remove(to);
        }
        if let Some(set) = self.adjacency.get_mut(to) {
            set.remove(from);
        }
        self.edges
            .retain(|e| !(e.from == from && e.to == to) && !(e.from == to && e.to == from));

        Outcome::success("Edge removed", Vec::new())
    }

    /// Reposition a node, clamped into the drawing area.
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Outcome<GraphAction> {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return Outcome::rejected(Rejection::UnknownNode { id: id.to_string() }, Vec::new());
        };
        let (min_x, max_x, min_y, max_y) = MOVE_BOUNDS;
        node.x = x.clamp(min_x, max_x);
        node.y = y.clamp(min_y, max_y);
        Outcome::success(format!("Moved \"{}\"", node.label), Vec::new())
    }

    /// Breadth-first traversal. The outcome's value is the visit order (ids).
    pub fn bfs(&self, start: &str) -> Outcome<GraphAction, Vec<String>> {
        if let Err(rejection) = self.require(start) {
            return Outcome::rejected(rejection, Vec::new());
        }

        let start_label = self.label_of(start);
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut steps = vec![Step::on(
            start,
            GraphAction::Start,
            format!("Starting BFS from \"{start_label}\""),
        )];
        let mut order = Vec::new();

        while let Some(id) = queue.pop_front() {
            let label = self.label_of(id);
            steps.push(Step::on(
                id,
                GraphAction::Visit,
                format!("Dequeue and visit \"{label}\""),
            ));
            order.push(id.to_string());

            for neighbor in self.adjacency.get(id).into_iter().flatten() {
                if visited.insert(neighbor.as_str()) {
                    let neighbor_label = self.label_of(neighbor);
                    steps.push(Step::edge(
                        id,
                        neighbor,
                        GraphAction::EdgeVisit,
                        format!("Exploring edge \"{label}\" -> \"{neighbor_label}\""),
                    ));
                    steps.push(Step::on(
                        neighbor.as_str(),
                        GraphAction::Discover,
                        format!("Discovered \"{neighbor_label}\", adding to queue"),
                    ));
                    queue.push_back(neighbor.as_str());
                }
            }
        }

        self.note_unreachable(&visited, start_label, &mut steps);
        debug!(start, visited = order.len(), steps = steps.len(), "BFS");
        let message = format!("BFS order: {}", self.labels(&order));
        Outcome::success(message, steps).with_value(order)
    }

    /// Depth-first traversal with explicit backtrack steps.
    pub fn dfs(&self, start: &str) -> Outcome<GraphAction, Vec<String>> {
        if let Err(rejection) = self.require(start) {
            return Outcome::rejected(rejection, Vec::new());
        }

        let start_label = self.label_of(start);
        let mut visited = HashSet::new();
        let mut steps = vec![Step::on(
            start,
            GraphAction::Start,
            format!("Starting DFS from \"{start_label}\""),
        )];
        let mut order = Vec::new();

        self.dfs_visit(start, 0, &mut visited, &mut steps, &mut order);

        self.note_unreachable(&visited, start_label, &mut steps);
        debug!(start, visited = order.len(), steps = steps.len(), "DFS");
        let message = format!("DFS order: {}", self.labels(&order));
        Outcome::success(message, steps).with_value(order)
    }

    fn dfs_visit<'a>(
        &'a self,
        id: &'a str,
        depth: usize,
        visited: &mut HashSet<&'a str>,
        steps: &mut Vec<Step>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let indent = "  ".repeat(depth);
        let label = self.label_of(id);
        steps.push(Step::on(
            id,
            GraphAction::Visit,
            format!("{indent}Visit \"{label}\" (depth {depth})"),
        ));
        order.push(id.to_string());

        for neighbor in self.adjacency.get(id).into_iter().flatten() {
            if visited.contains(neighbor.as_str()) {
                continue;
            }
            steps.push(Step::edge(
                id,
                neighbor,
                GraphAction::EdgeVisit,
                format!("{indent}Traversing edge -> \"{}\"", self.label_of(neighbor)),
            ));
            self.dfs_visit(neighbor, depth + 1, visited, steps, order);
            steps.push(Step::on(
                id,
                GraphAction::Backtrack,
                format!("{indent}Backtrack to \"{label}\""),
            ));
        }
    }

    pub fn metrics(&self) -> GraphMetrics {
        let node_count = self.node_count();
        let edge_count = self.edge_count();
        let max_edges = if node_count > 1 {
            node_count * (node_count - 1) / 2
        } else {
            0
        };
        let density = if max_edges > 0 {
            edge_count as f64 / max_edges as f64
        } else {
            0.0
        };
        let total_degree: usize = self.adjacency.values().map(BTreeSet::len).sum();
        let avg_degree = if node_count > 0 {
            total_degree as f64 / node_count as f64
        } else {
            0.0
        };

        GraphMetrics {
            node_count,
            edge_count,
            density,
            components: self.components(),
            avg_degree,
            is_empty: node_count == 0,
        }
    }

    /// Connected components by repeated stack-based flood fill.
    pub fn components(&self) -> usize {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut components = 0;

        for id in self.adjacency.keys() {
            if seen.contains(id.as_str()) {
                continue;
            }
            components += 1;
            let mut stack = vec![id.as_str()];
            while let Some(current) = stack.pop() {
                if !seen.insert(current) {
                    continue;
                }
                stack.extend(
                    self.adjacency
                        .get(current)
                        .into_iter()
                        .flatten()
                        .map(String::as_str)
                        .filter(|n| !seen.contains(n)),
                );
            }
        }
        components
    }

    /// `b ∈ adj[a] ⇔ a ∈ adj[b]` for every pair.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency
            .iter()
            .all(|(a, set)| set.iter().all(|b| self.has_edge(b, a)))
    }

    /// Reset nodes, adjacency and edges together.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adjacency.clear();
        self.edges.clear();
        self.ids.reset();
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    fn require(&self, id: &str) -> Result<(), Rejection> {
        if self.adjacency.contains_key(id) {
            Ok(())
        } else {
            Err(Rejection::UnknownNode { id: id.to_string() })
        }
    }

    fn link(&mut self, from: &str, to: &str) {
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    fn labels(&self, ids: &[String]) -> String {
        ids.iter()
            .map(|id| self.label_of(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn note_unreachable(&self, visited: &HashSet<&str>, start_label: &str, steps: &mut Vec<Step>) {
        let unreachable = self
            .nodes
            .iter()
            .filter(|n| !visited.contains(n.id.as_str()))
            .count();
        if unreachable > 0 {
            steps.push(Step::new(
                GraphAction::Info,
                format!("{unreachable} node(s) unreachable from \"{start_label}\""),
            ));
        }
    }
}

/// Ring placement around the centre, nudged away from crowded spots.
fn place(existing: &[GraphNode]) -> (f64, f64) {
    let count = existing.len();
    if count == 0 {
        return CENTER;
    }

    let ring = count / RING_SIZE;
    let slot = count % RING_SIZE;
    let radius = 100.0 + ring as f64 * 80.0;
    let angle = slot as f64 / RING_SIZE as f64 * TAU + ring as f64 * 0.5;
    let mut x = CENTER.0 + angle.cos() * radius;
    let mut y = CENTER.1 + angle.sin() * radius;

    for attempt in 0..MAX_NUDGES {
        let crowded = existing
            .iter()
            .any(|n| (n.x - x).hypot(n.y - y) < MIN_SPACING);
        if !crowded {
            break;
        }
        let theta = attempt as f64 * GOLDEN_ANGLE;
        x += theta.cos() * NUDGE_DISTANCE;
        y += theta.sin() * NUDGE_DISTANCE;
    }

    let (min_x, max_x, min_y, max_y) = PLACE_BOUNDS;
    (x.clamp(min_x, max_x), y.clamp(min_y, max_y))
}
