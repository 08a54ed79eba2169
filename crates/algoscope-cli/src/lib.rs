//! Terminal replay of engine traces.
//!
//! Builds one structure from command-line values, collects the traces of
//! every operation, then plays them through an [`Animator`] so each step is
//! printed at the configured pace.

use std::future::ready;
use std::str::FromStr;
use std::time::Duration;

use algoscope_animator::{Animator, AnimatorConfig, PlaybackOutcome};
use algoscope_engines::{
    Bst, Graph, HashMap, HashSet, LinkedList, Queue, Stack, TraversalKind,
};
use algoscope_trace::{
    ActionKind, BstAction, GraphAction, HashAction, ListAction, MapAction, Outcome, QueueAction,
    StackAction, TraceStep,
};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

/// Delay used when `--delay-ms` is not given.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

pub const USAGE: &str = "usage: algoscope-replay <bst|list|graph|stack|queue|hashset|hashmap> [values...] [--json] [--delay-ms N]";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing structure name")]
    MissingStructure,

    #[error("unknown structure \"{0}\"")]
    UnknownStructure(String),

    #[error("--delay-ms expects whole milliseconds, got \"{0}\"")]
    InvalidDelay(String),

    #[error("--delay-ms needs a value")]
    MissingDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Bst,
    List,
    Graph,
    Stack,
    Queue,
    HashSet,
    HashMap,
}

impl FromStr for Structure {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bst" | "tree" => Ok(Self::Bst),
            "list" | "linked-list" => Ok(Self::List),
            "graph" => Ok(Self::Graph),
            "stack" => Ok(Self::Stack),
            "queue" => Ok(Self::Queue),
            "hashset" | "set" => Ok(Self::HashSet),
            "hashmap" | "map" => Ok(Self::HashMap),
            _ => Err(ArgsError::UnknownStructure(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    pub structure: Structure,
    pub values: Vec<String>,
    /// One JSON object per step instead of aligned text.
    pub json: bool,
    pub step_delay: Duration,
}

impl ReplayArgs {
    /// Parse arguments, program name excluded.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut structure: Option<Structure> = None;
        let mut values = Vec::new();
        let mut json = false;
        let mut step_delay = DEFAULT_DELAY;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--delay-ms" => {
                    let raw = args.next().ok_or(ArgsError::MissingDelay)?;
                    let ms: u64 = raw.parse().map_err(|_| ArgsError::InvalidDelay(raw.clone()))?;
                    step_delay = Duration::from_millis(ms);
                }
                _ if structure.is_none() => structure = Some(arg.parse()?),
                _ => values.push(arg),
            }
        }

        Ok(Self {
            structure: structure.ok_or(ArgsError::MissingStructure)?,
            values,
            json,
            step_delay,
        })
    }
}

/// Steps and summary messages collected from a series of operations.
#[derive(Debug, Clone)]
pub struct Script<A> {
    pub steps: Vec<TraceStep<A>>,
    pub messages: Vec<String>,
}

impl<A> Default for Script<A> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl<A> Script<A> {
    fn record<V>(&mut self, outcome: Outcome<A, V>) {
        if !outcome.ok {
            warn!(message = %outcome.message, "Operation rejected");
        }
        self.messages.push(outcome.message);
        self.steps.extend(outcome.steps);
    }
}

/// Insert every number, then walk the tree in order.
pub fn bst_script(values: &[String]) -> Script<BstAction> {
    let mut script = Script::default();
    let mut bst = Bst::new();
    for raw in values {
        match Bst::parse_value(raw) {
            Ok(value) => script.record(bst.insert(value)),
            Err(rejection) => {
                warn!(input = %raw, "Skipping value");
                script.messages.push(rejection.to_string());
            }
        }
    }
    script.record(bst.traverse(TraversalKind::Inorder));
    script
}

/// Append every value, then reverse.
pub fn list_script(values: &[String]) -> Script<ListAction> {
    let mut script = Script::default();
    let mut list = LinkedList::new();
    for value in values {
        script.record(list.append(value.clone()));
    }
    if list.len() >= 2 {
        script.record(list.reverse());
    }
    script
}

/// `A` adds a node, `A-B` adds an edge (creating endpoints as needed).
/// Finishes with BFS and DFS from the first node.
pub fn graph_script(values: &[String]) -> Script<GraphAction> {
    let mut script = Script::default();
    let mut graph = Graph::new();

    for token in values {
        match token.split_once('-') {
            Some((from, to)) => {
                let from = ensure_node(&mut graph, from, &mut script);
                let to = ensure_node(&mut graph, to, &mut script);
                if let (Some(from), Some(to)) = (from, to) {
                    script.record(graph.add_edge(&from, &to));
                }
            }
            None => {
                ensure_node(&mut graph, token, &mut script);
            }
        }
    }

    if let Some(start) = graph.nodes().first().map(|n| n.id.clone()) {
        script.record(graph.bfs(&start));
        script.record(graph.dfs(&start));
    }
    script
}

fn ensure_node(graph: &mut Graph, label: &str, script: &mut Script<GraphAction>) -> Option<String> {
    if let Some(id) = graph.find_by_label(label) {
        return Some(id.to_string());
    }
    let outcome = graph.add_node(label);
    let id = outcome.value.clone();
    script.record(outcome);
    id
}

/// Push every value, then pop once.
pub fn stack_script(values: &[String]) -> Script<StackAction> {
    let mut script = Script::default();
    let mut stack = Stack::unbounded();
    for value in values {
        script.record(stack.push(value.clone()));
    }
    script.record(stack.pop());
    script
}

/// Enqueue every value, then dequeue once.
pub fn queue_script(values: &[String]) -> Script<QueueAction> {
    let mut script = Script::default();
    let mut queue = Queue::unbounded();
    for value in values {
        script.record(queue.enqueue(value.clone()));
    }
    script.record(queue.dequeue());
    script
}

pub fn hash_set_script(values: &[String]) -> Script<HashAction> {
    let mut script = Script::default();
    let mut set: HashSet = HashSet::new();
    for value in values {
        script.record(set.add(value.clone()));
    }
    script
}

/// `k=v` puts, a bare `k` looks the key up.
pub fn hash_map_script(values: &[String]) -> Script<MapAction> {
    let mut script = Script::default();
    let mut map: HashMap = HashMap::new();
    for token in values {
        match token.split_once('=') {
            Some((key, value)) => script.record(map.put(key.to_string(), value.to_string())),
            None => script.record(map.get(token)),
        }
    }
    script
}

/// One printed line for a step.
pub fn render_step<A: ActionKind>(step: &TraceStep<A>, index: usize, total: usize, json: bool) -> String {
    if json {
        return json!({ "index": index, "total": total, "step": step }).to_string();
    }

    let mut line = format!(
        "[{:>width$}/{total}] {:<12} {}",
        index + 1,
        step.action.label(),
        step.message,
        width = total.to_string().len(),
    );
    if let Some(target) = &step.target_id {
        line.push_str(&format!("  ({target})"));
    } else if let Some(edge) = &step.edge_id {
        line.push_str(&format!("  ({edge})"));
    }
    line
}

/// Play a script, printing each step as it is handed out.
pub async fn play<A: ActionKind>(animator: &Animator, script: Script<A>, json: bool) -> PlaybackOutcome {
    if !json {
        for message in &script.messages {
            println!("> {message}");
        }
        println!();
    }

    animator
        .animate(script.steps, move |step, index, total| {
            println!("{}", render_step(&step, index, total, json));
            ready(())
        })
        .await
}

pub async fn run(args: ReplayArgs) -> PlaybackOutcome {
    let animator = Animator::new(AnimatorConfig::default().with_step_delay(args.step_delay));
    info!(structure = ?args.structure, values = args.values.len(), "Replaying");

    let values = &args.values;
    match args.structure {
        Structure::Bst => play(&animator, bst_script(values), args.json).await,
        Structure::List => play(&animator, list_script(values), args.json).await,
        Structure::Graph => play(&animator, graph_script(values), args.json).await,
        Structure::Stack => play(&animator, stack_script(values), args.json).await,
        Structure::Queue => play(&animator, queue_script(values), args.json).await,
        Structure::HashSet => play(&animator, hash_set_script(values), args.json).await,
        Structure::HashMap => play(&animator, hash_map_script(values), args.json).await,
    }
}
