//! Singly linked list engine.
//!
//! The list holds only a head link. The tail is found by walking, every time.

use std::fmt;
use std::iter;

use algoscope_trace::{IdSequence, ListAction, Outcome, Rejection, TraceStep};
use serde::Serialize;
use tracing::debug;

type Step = TraceStep<ListAction>;
type Link<T> = Option<Box<ListNode<T>>>;

const CONTAINER: &str = "list";

#[derive(Debug, Clone)]
struct ListNode<T> {
    id: String,
    value: T,
    next: Link<T>,
}

/// Length, endpoints and emptiness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListMetrics<T> {
    pub length: usize,
    pub head: Option<T>,
    pub tail: Option<T>,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListNodeView<T> {
    pub id: String,
    pub value: T,
}

/// Nodes in list order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot<T> {
    pub nodes: Vec<ListNodeView<T>>,
}

/// Singly linked list.
#[derive(Debug, Clone)]
pub struct LinkedList<T> {
    head: Link<T>,
    ids: IdSequence,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self {
            head: None,
            ids: IdSequence::new("ll"),
        }
    }
}

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        drop_chain(self.head.take());
    }
}

impl<T> LinkedList<T>
where
    T: Clone + PartialEq + fmt::Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn iter(&self) -> impl Iterator<Item = &ListNode<T>> {
        iter::successors(self.head.as_deref(), |node| node.next.as_deref())
    }

    /// The link at `position` (0 is the head link), `None` past the tail link.
    fn link_at(&mut self, position: usize) -> Option<&mut Link<T>> {
        let mut link = &mut self.head;
        for _ in 0..position {
            link = &mut link.as_mut()?.next;
        }
        Some(link)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn values(&self) -> Vec<T> {
        self.iter().map(|n| n.value.clone()).collect()
    }

    /// Walk to the tail and link a new node after it.
    pub fn append(&mut self, value: T) -> Outcome<ListAction> {
        let id = self.ids.next_id();

        if self.head.is_none() {
            let steps = vec![Step::on(
                id.clone(),
                ListAction::Insert,
                format!("{value} added as head"),
            )];
            let message = format!("Appended {value} as head");
            self.head = Some(Box::new(ListNode { id, value, next: None }));
            return Outcome::success(message, steps);
        }

        let mut steps: Vec<Step> = self
            .iter()
            .map(|node| {
                let message = if node.next.is_some() {
                    format!("Traversing past {}", node.value)
                } else {
                    format!("Reached tail: {}", node.value)
                };
                Step::on(node.id.clone(), ListAction::Traverse, message)
            })
            .collect();
        let tail = self.iter().last().map(|n| n.value.to_string()).unwrap_or_default();
        steps.push(Step::on(
            id.clone(),
            ListAction::Insert,
            format!("{value} appended after {tail}"),
        ));

        let message = format!("Appended {value}");
        let mut link = &mut self.head;
        while let Some(node) = link {
            link = &mut node.next;
        }
        *link = Some(Box::new(ListNode { id, value, next: None }));
        debug!(steps = steps.len(), "List append");
        Outcome::success(message, steps)
    }

    /// New head in O(1).
    pub fn prepend(&mut self, value: T) -> Outcome<ListAction> {
        let id = self.ids.next_id();
        let steps = vec![Step::on(
            id.clone(),
            ListAction::Insert,
            format!("{value} is the new head"),
        )];
        let message = format!("Prepended {value} as new head");
        let next = self.head.take();
        self.head = Some(Box::new(ListNode { id, value, next }));
        Outcome::success(message, steps)
    }

    /// Insert so the new node ends up at `index`.
    ///
    /// `index == len` appends. Negative or larger indices are rejected
    /// before anything is touched.
    pub fn insert_at(&mut self, value: T, index: i64) -> Outcome<ListAction> {
        let Ok(index) = usize::try_from(index) else {
            return Outcome::rejected(Rejection::NegativeIndex { index }, Vec::new());
        };
        if index == 0 {
            return self.prepend(value);
        }
        let len = self.len();
        if index > len {
            return Outcome::rejected(Rejection::IndexOutOfBounds { index, len }, Vec::new());
        }

        let id = self.ids.next_id();
        let mut steps: Vec<Step> = self
            .iter()
            .take(index)
            .enumerate()
            .map(|(i, node)| {
                let message = if i + 1 == index {
                    format!("Inserting after index {i} ({})", node.value)
                } else {
                    format!("At index {i}: {}", node.value)
                };
                Step::on(node.id.clone(), ListAction::Traverse, message)
            })
            .collect();
        steps.push(Step::on(
            id.clone(),
            ListAction::Insert,
            format!("{value} inserted at index {index}"),
        ));

        let message = format!("Inserted {value} at index {index}");
        let slot = self.link_at(index);
        debug_assert!(slot.is_some(), "index {index} checked against length {len}");
        let Some(slot) = slot else {
            return Outcome::rejected(Rejection::IndexOutOfBounds { index, len }, steps);
        };
        let next = slot.take();
        *slot = Some(Box::new(ListNode { id, value, next }));
        debug!(index, steps = steps.len(), "List insert_at");
        Outcome::success(message, steps)
    }

    /// Unlink the first node holding `value`.
    pub fn delete_node(&mut self, value: &T) -> Outcome<ListAction> {
        let Some(head) = self.head.as_deref() else {
            return Outcome::rejected(Rejection::Empty { container: CONTAINER }, Vec::new());
        };

        if head.value == *value {
            let steps = vec![
                Step::on(head.id.clone(), ListAction::Found, format!("Found {value} at the head")),
                Step::on(head.id.clone(), ListAction::Delete, format!("Deleting head: {value}")),
            ];
            if let Some(old) = self.head.take() {
                self.head = old.next;
            }
            return Outcome::success(format!("Deleted {value} (was head)"), steps);
        }

        let mut steps = Vec::new();
        let mut predecessor = None;
        for (i, node) in self.iter().enumerate() {
            let Some(next) = node.next.as_deref() else {
                steps.push(Step::on(
                    node.id.clone(),
                    ListAction::NotFound,
                    format!("Reached the tail, {value} is not in the list"),
                ));
                break;
            };
            steps.push(Step::on(
                node.id.clone(),
                ListAction::Traverse,
                format!("Checking next of {}", node.value),
            ));
            if next.value == *value {
                steps.push(Step::on(next.id.clone(), ListAction::Found, format!("Found {value}")));
                steps.push(Step::on(next.id.clone(), ListAction::Delete, format!("Deleting {value}")));
                predecessor = Some(i);
                break;
            }
        }

        let Some(position) = predecessor else {
            return Outcome::rejected(
                Rejection::NotFound {
                    value: value.to_string(),
                    container: CONTAINER,
                },
                steps,
            );
        };

        // The scan above saw a node at `position + 1`.
        let removed = self.link_at(position + 1).and_then(|slot| {
            let mut removed = slot.take()?;
            *slot = removed.next.take();
            Some(removed)
        });
        debug_assert!(removed.is_some(), "matched node vanished before splice");
        if removed.is_none() {
            return Outcome::rejected(
                Rejection::NotFound {
                    value: value.to_string(),
                    container: CONTAINER,
                },
                steps,
            );
        }
        debug!(position = position + 1, steps = steps.len(), "List delete");
        Outcome::success(format!("Deleted {value}"), steps)
    }

    /// Linear scan reporting the index of the first match.
    pub fn search_node(&self, value: &T) -> Outcome<ListAction, usize> {
        let mut steps = Vec::new();
        for (i, node) in self.iter().enumerate() {
            steps.push(Step::on(
                node.id.clone(),
                ListAction::Compare,
                format!("Index {i}: comparing with {}", node.value),
            ));
            if node.value == *value {
                steps.push(Step::on(
                    node.id.clone(),
                    ListAction::Found,
                    format!("Found {value} at index {i}"),
                ));
                return Outcome::success(format!("Found {value} at index {i}"), steps).with_value(i);
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

    /// Reverse every link in place.
    pub fn reverse(&mut self) -> Outcome<ListAction> {
        if self.head.as_ref().map_or(true, |h| h.next.is_none()) {
            return Outcome::rejected(
                Rejection::TooShort {
                    container: CONTAINER,
                    min: 2,
                },
                Vec::new(),
            );
        }

        let mut steps = Vec::new();
        let mut previous: Link<T> = None;
        let mut current = self.head.take();

        while let Some(mut node) = current {
            let next = node.next.take();
            let target = previous
                .as_ref()
                .map_or_else(|| "null".to_string(), |p| p.value.to_string());
            steps.push(Step::on(
                node.id.clone(),
                ListAction::Compare,
                format!("Reversing pointer at {}", node.value),
            ));
            steps.push(Step::on(
                node.id.clone(),
                ListAction::Found,
                format!("{} now points to {target}", node.value),
            ));
            node.next = previous;
            previous = Some(node);
            current = next;
        }
        self.head = previous;

        if let Some(head) = self.head.as_deref() {
            steps.push(Step::on(
                head.id.clone(),
                ListAction::NewHead,
                format!("{} is the new head", head.value),
            ));
        }
        debug!(steps = steps.len(), "List reversed");
        Outcome::success("List reversed", steps)
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        drop_chain(self.head.take());
    }

    pub fn metrics(&self) -> ListMetrics<T> {
        ListMetrics {
            length: self.len(),
            head: self.head.as_ref().map(|h| h.value.clone()),
            tail: self.iter().last().map(|t| t.value.clone()),
            is_empty: self.is_empty(),
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            nodes: self
                .iter()
                .map(|n| ListNodeView {
                    id: n.id.clone(),
                    value: n.value.clone(),
                })
                .collect(),
        }
    }
}

/// Unlink iteratively so long chains don't recurse on drop.
fn drop_chain<T>(mut link: Link<T>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}
