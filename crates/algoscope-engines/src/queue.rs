//! FIFO queue engine.

use std::collections::VecDeque;
use std::fmt::Display;

use algoscope_trace::{IdSequence, Outcome, QueueAction, Rejection, Result, TraceStep};
use serde::Serialize;
use tracing::debug;

use crate::config::CapacityConfig;
use crate::stack::{utilization, Item};

type Step = TraceStep<QueueAction>;

const CONTAINER: &str = "queue";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueMetrics<T> {
    pub size: usize,
    pub front: Option<T>,
    pub rear: Option<T>,
    pub is_empty: bool,
    pub capacity: Option<usize>,
    pub utilization: Option<f64>,
}

/// Items front to rear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSnapshot<T> {
    pub items: Vec<Item<T>>,
}

#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<Item<T>>,
    capacity: Option<usize>,
    ids: IdSequence,
}

impl<T: Clone + PartialEq + Display> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + Display> Queue<T> {
    /// Queue bounded at the default capacity.
    pub fn new() -> Self {
        Self::bounded_by(CapacityConfig::QUEUE_DEFAULT.capacity)
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
            items: VecDeque::new(),
            capacity,
            ids: IdSequence::new("q"),
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

    /// Values front to rear.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|i| &i.value)
    }

    pub fn enqueue(&mut self, value: T) -> Outcome<QueueAction> {
        if let Some(capacity) = self.capacity.filter(|&c| self.items.len() >= c) {
            debug!(capacity, "Enqueue rejected: overflow");
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
            QueueAction::Enqueue,
            format!(
                "Enqueueing {value} at rear (new size: {})",
                self.items.len() + 1
            ),
        )];
        let message = format!("Enqueued {value}");
        self.items.push_back(Item { id, value });

        debug!(size = self.items.len(), "Enqueue");
        Outcome::success(message, steps)
    }

    /// Remove the front. The outcome's value is the dequeued value.
    pub fn dequeue(&mut self) -> Outcome<QueueAction, T> {
        let Some(front) = self.items.pop_front() else {
            return Outcome::rejected(Rejection::Underflow { container: CONTAINER }, Vec::new());
        };

        let steps = vec![Step::on(
            front.id,
            QueueAction::Dequeue,
            format!(
                "Dequeueing {} from front (remaining: {})",
                front.value,
                self.items.len()
            ),
        )];

        debug!(size = self.items.len(), "Dequeue");
        Outcome::success(format!("Dequeued {}", front.value), steps).with_value(front.value)
    }

    pub fn peek_queue(&self) -> Outcome<QueueAction, T> {
        let Some(front) = self.items.front() else {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        };

        let steps = vec![Step::on(
            &front.id,
            QueueAction::Peek,
            format!("Front element is {} (queue size: {})", front.value, self.items.len()),
        )];
        Outcome::success(format!("Front: {}", front.value), steps).with_value(front.value.clone())
    }

    /// Scan front to rear. The outcome's value is the position (0 = front).
    pub fn search_queue(&self, value: &T) -> Outcome<QueueAction, usize> {
        if self.items.is_empty() {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        }

        let mut steps = Vec::new();
        for (position, item) in self.items.iter().enumerate() {
            steps.push(Step::on(
                &item.id,
                QueueAction::Compare,
                format!("Position {position}: checking {}", item.value),
            ));
            if item.value == *value {
                steps.push(Step::on(
                    &item.id,
                    QueueAction::Found,
                    format!("Found {value} at position {position}"),
                ));
                return Outcome::success(format!("Found {value} at position {position}"), steps)
                    .with_value(position);
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

    pub fn metrics(&self) -> QueueMetrics<T> {
        QueueMetrics {
            size: self.items.len(),
            front: self.items.front().map(|i| i.value.clone()),
            rear: self.items.back().map(|i| i.value.clone()),
            is_empty: self.items.is_empty(),
            capacity: self.capacity,
            utilization: utilization(self.items.len(), self.capacity),
        }
    }

    pub fn snapshot(&self) -> QueueSnapshot<T> {
        QueueSnapshot {
            items: self.items.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_fifo_order() {
        let mut queue = Queue::new();
        for v in [1, 2, 3] {
            assert!(queue.enqueue(v).ok);
        }

        let dequeued: Vec<_> = (0..3).filter_map(|_| queue.dequeue().value).collect();
        assert_eq!(dequeued, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn each_mutation_is_one_step() {
        let mut queue = Queue::new();
        let enq = queue.enqueue("a");
        assert_eq!(enq.steps.len(), 1);
        assert_eq!(enq.steps[0].target_id.as_deref(), Some("q_0"));

        let deq = queue.dequeue();
        assert_eq!(deq.steps.len(), 1);
        assert_eq!(deq.steps[0].action, QueueAction::Dequeue);
    }

    #[test]
    fn empty_rejections() {
        let mut queue: Queue<i32> = Queue::new();
        assert!(queue.dequeue().message.contains("underflow"));
        assert_eq!(queue.peek_queue().message, "queue is empty");
        assert!(!queue.search_queue(&1).ok);
    }

    #[test]
    fn overflow_at_default_capacity() {
        let mut queue = Queue::new();
        for v in 0..15 {
            assert!(queue.enqueue(v).ok);
        }
        let outcome = queue.enqueue(15);
        assert!(!outcome.ok);
        assert_eq!(outcome.message, "queue overflow: maximum size is 15");
        assert_eq!(queue.metrics().utilization, Some(100.0));
    }

    #[test]
    fn search_reports_position() {
        let mut queue = Queue::unbounded();
        for v in [5, 6, 7] {
            queue.enqueue(v);
        }
        let outcome = queue.search_queue(&6);
        assert_eq!(outcome.value, Some(1));
        assert_eq!(outcome.steps.len(), 3);
        assert_eq!(queue.peek_queue().value, Some(5));
    }

    #[test]
    fn metrics() {
        let mut queue = Queue::with_config(CapacityConfig::bounded(4)).unwrap();
        queue.enqueue('x');
        queue.enqueue('y');
        let metrics = queue.metrics();
        assert_eq!(metrics.front, Some('x'));
        assert_eq!(metrics.rear, Some('y'));
        assert_eq!(metrics.utilization, Some(50.0));
        assert_eq!(queue.snapshot().items.len(), 2);
    }
}
