//! LIFO stack engine.

use std::fmt::Display;

use algoscope_trace::{IdSequence, Outcome, Rejection, Result, StackAction, TraceStep};
use serde::Serialize;
use tracing::debug;

use crate::config::CapacityConfig;

type Step = TraceStep<StackAction>;

const CONTAINER: &str = "stack";

/// An element with its render id. Shared with the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item<T> {
    pub id: String,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackMetrics<T> {
    pub size: usize,
    pub top: Option<T>,
    pub bottom: Option<T>,
    pub is_empty: bool,
    pub capacity: Option<usize>,
    /// Percentage of capacity in use, when bounded.
    pub utilization: Option<f64>,
}

/// Items bottom to top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackSnapshot<T> {
    pub items: Vec<Item<T>>,
}

#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<Item<T>>,
    capacity: Option<usize>,
    ids: IdSequence,
}

impl<T: Clone + PartialEq + Display> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + Display> Stack<T> {
    /// Stack bounded at the default capacity.
    pub fn new() -> Self {
        Self::bounded_by(CapacityConfig::STACK_DEFAULT.capacity)
    }

    pub fn unbounded() -> Self {
        Self::bounded_by(None)
    }

    pub fn with_config(config: CapacityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::bounded_by(config.capacity))
    }

    fn bounded_by(capacity: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            ids: IdSequence::new("stk"),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Values bottom to top.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|i| &i.value)
    }

    pub fn push(&mut self, value: T) -> Outcome<StackAction> {
        if let Some(capacity) = self.capacity.filter(|&c| self.items.len() >= c) {
            debug!(capacity, "Stack push rejected: overflow");
            return Outcome::rejected(
                Rejection::Overflow {
                    container: CONTAINER,
                    capacity,
                },
                Vec::new(),
            );
        }

        let id = self.ids.next_id();
        let steps = vec![Step::on(
            &id,
            StackAction::Push,
            format!(
                "Pushing {value} onto top of stack (new size: {})",
                self.items.len() + 1
            ),
        )];
        let message = format!("Pushed {value}");
        self.items.push(Item { id, value });

        debug!(size = self.items.len(), "Stack push");
        Outcome::success(message, steps)
    }

    /// Remove the top. The outcome's value is the popped value.
    pub fn pop(&mut self) -> Outcome<StackAction, T> {
        let Some(top) = self.items.pop() else {
            return Outcome::rejected(Rejection::Underflow { container: CONTAINER }, Vec::new());
        };

        let steps = vec![Step::on(
            top.id,
            StackAction::Pop,
            format!("Popping {} from top (remaining: {})", top.value, self.items.len()),
        )];

        debug!(size = self.items.len(), "Stack pop");
        Outcome::success(format!("Popped {}", top.value), steps).with_value(top.value)
    }

    pub fn peek(&self) -> Outcome<StackAction, T> {
        let Some(top) = self.items.last() else {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        };

        let steps = vec![Step::on(
            &top.id,
            StackAction::Peek,
            format!("Top element is {} (stack size: {})", top.value, self.items.len()),
        )];
        Outcome::success(format!("Top: {}", top.value), steps).with_value(top.value.clone())
    }

    /// Scan top to bottom. The outcome's value is the depth (0 = top).
    pub fn search_stack(&self, value: &T) -> Outcome<StackAction, usize> {
        if self.items.is_empty() {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        }

        let mut steps = Vec::new();
        for (depth, item) in self.items.iter().rev().enumerate() {
            steps.push(Step::on(
                &item.id,
                StackAction::Compare,
                format!("Depth {depth}: checking {}", item.value),
            ));
            if item.value == *value {
                let index = self.items.len() - 1 - depth;
                steps.push(Step::on(
                    &item.id,
                    StackAction::Found,
                    format!("Found {value} at depth {depth} (index {index})"),
                ));
                return Outcome::success(format!("Found {value} at depth {depth}"), steps)
                    .with_value(depth);
            }
        }

        Outcome::rejected(
            Rejection::NotFound {
                value: value.to_string(),
                container: CONTAINER,
            },
            steps,
        )
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn metrics(&self) -> StackMetrics<T> {
        StackMetrics {
            size: self.items.len(),
            top: self.items.last().map(|i| i.value.clone()),
            bottom: self.items.first().map(|i| i.value.clone()),
            is_empty: self.items.is_empty(),
            capacity: self.capacity,
            utilization: utilization(self.items.len(), self.capacity),
        }
    }

    pub fn snapshot(&self) -> StackSnapshot<T> {
        StackSnapshot {
            items: self.items.clone(),
        }
    }
}

pub(crate) fn utilization(size: usize, capacity: Option<usize>) -> Option<f64> {
    capacity
        .filter(|&c| c > 0)
        .map(|c| (size as f64 / c as f64 * 100.0).round())
}
