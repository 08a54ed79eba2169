//! Chained hash set engine.

use std::fmt::Display;

use algoscope_trace::{HashAction, IdSequence, Outcome, Rejection, Result, TraceStep};
use serde::Serialize;
use tracing::debug;

use crate::config::HashConfig;
use crate::hashing::bucket_for;

type Step = TraceStep<HashAction>;

const CONTAINER: &str = "set";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashEntry<T> {
    pub id: String,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashSetMetrics {
    pub size: usize,
    pub bucket_count: usize,
    pub load_factor: f64,
    /// Length of the longest chain.
    pub max_chain_depth: usize,
    pub occupied_buckets: usize,
    /// Adds that landed in a non-empty bucket since the last clear.
    pub collisions: usize,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashSetSnapshot<T> {
    pub buckets: Vec<Vec<HashEntry<T>>>,
}

/// Fixed bucket array with per-bucket chaining. Values are unique.
#[derive(Debug, Clone)]
pub struct HashSet<T = String> {
    buckets: Vec<Vec<HashEntry<T>>>,
    len: usize,
    collisions: usize,
    ids: IdSequence,
}

impl<T: Clone + PartialEq + Display> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + Display> HashSet<T> {
    pub fn new() -> Self {
        Self::with_bucket_count(HashConfig::SET_DEFAULT.bucket_count)
    }

    pub fn with_config(config: HashConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_bucket_count(config.bucket_count))
    }

    fn with_bucket_count(bucket_count: usize) -> Self {
        Self {
            buckets: (0..bucket_count).map(|_| Vec::new()).collect(),
            len: 0,
            collisions: 0,
            ids: IdSequence::new("hs"),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, index: usize) -> Option<&[HashEntry<T>]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    /// Bucket a value hashes to.
    pub fn bucket_of(&self, value: &T) -> usize {
        bucket_for(&value.to_string(), self.buckets.len())
    }

    pub fn contains(&self, value: &T) -> bool {
        self.buckets[self.bucket_of(value)]
            .iter()
            .any(|e| e.value == *value)
    }

    /// Values in bucket order, then chain order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.buckets.iter().flatten().map(|e| &e.value)
    }

    pub fn add(&mut self, value: T) -> Outcome<HashAction> {
        let key = value.to_string();
        if key.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "value" }, Vec::new());
        }

        let index = bucket_for(&key, self.buckets.len());
        let mut steps = vec![hash_step(&key, index)];

        let bucket = &self.buckets[index];
        for entry in bucket {
            steps.push(
                Step::on(
                    &entry.id,
                    HashAction::Compare,
                    format!("Comparing with \"{}\" in bucket {index}", entry.value),
                )
                .in_bucket(index),
            );
            if entry.value == value {
                steps.push(
                    Step::on(
                        &entry.id,
                        HashAction::Duplicate,
                        format!("\"{key}\" already exists, sets contain unique values only"),
                    )
                    .in_bucket(index),
                );
                debug!(value = %key, bucket = index, "Hash set add rejected: duplicate");
                return Outcome::rejected(
                    Rejection::Duplicate {
                        value: format!("\"{key}\""),
                        container: CONTAINER,
                    },
                    steps,
                );
            }
        }

        let chain_len = bucket.len();
        let collision = chain_len > 0;
        if collision {
            self.collisions += 1;
            steps.push(
                Step::new(
                    HashAction::Hash,
                    format!(
                        "Collision in bucket {index}! Chaining \"{key}\" after {chain_len} existing item(s)"
                    ),
                )
                .in_bucket(index),
            );
        }

        let id = self.ids.next_id();
        let suffix = if collision {
            " (collision resolved by chaining)"
        } else {
            ""
        };
        steps.push(
            Step::on(
                &id,
                HashAction::Insert,
                format!("Added \"{key}\" to bucket {index}{suffix}"),
            )
            .in_bucket(index),
        );
        self.buckets[index].push(HashEntry { id, value });
        self.len += 1;

        debug!(value = %key, bucket = index, collision, steps = steps.len(), "Hash set add");
        Outcome::success(format!("Added \"{key}\" -> bucket {index}"), steps)
    }

    pub fn remove(&mut self, value: &T) -> Outcome<HashAction> {
        let key = value.to_string();
        if key.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "value" }, Vec::new());
        }

        let index = bucket_for(&key, self.buckets.len());
        let mut steps = vec![hash_step(&key, index)];

        let bucket = &mut self.buckets[index];
        let mut found = None;
        for (position, entry) in bucket.iter().enumerate() {
            steps.push(
                Step::on(
                    &entry.id,
                    HashAction::Compare,
                    format!("Checking \"{}\"", entry.value),
                )
                .in_bucket(index),
            );
            if entry.value == *value {
                steps.push(
                    Step::on(
                        &entry.id,
                        HashAction::Delete,
                        format!("Found and removing \"{key}\" from bucket {index}"),
                    )
                    .in_bucket(index),
                );
                found = Some(position);
                break;
            }
        }

        if let Some(position) = found {
            bucket.remove(position);
            self.len -= 1;
            debug!(value = %key, bucket = index, steps = steps.len(), "Hash set remove");
            return Outcome::success(format!("Removed \"{key}\""), steps);
        }

        steps.push(
            Step::new(
                HashAction::NotFound,
                format!("\"{key}\" not found in bucket {index}"),
            )
            .in_bucket(index),
        );
        Outcome::rejected(not_found(&key), steps)
    }

    /// Membership check with a trace. Does not mutate.
    pub fn has(&self, value: &T) -> Outcome<HashAction> {
        let key = value.to_string();
        if key.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "value" }, Vec::new());
        }

        let index = bucket_for(&key, self.buckets.len());
        let mut steps = vec![hash_step(&key, index)];

        for (position, entry) in self.buckets[index].iter().enumerate() {
            steps.push(
                Step::on(
                    &entry.id,
                    HashAction::Compare,
                    format!("Comparing with \"{}\"", entry.value),
                )
                .in_bucket(index),
            );
            if entry.value == *value {
                steps.push(
                    Step::on(
                        &entry.id,
                        HashAction::Found,
                        format!("\"{key}\" exists in the set (bucket {index}, position {position})"),
                    )
                    .in_bucket(index),
                );
                return Outcome::success(format!("\"{key}\" found in set"), steps);
            }
        }

        steps.push(
            Step::new(HashAction::NotFound, format!("\"{key}\" is not in the set")).in_bucket(index),
        );
        Outcome::rejected(not_found(&key), steps)
    }

    /// Empty every bucket and reset the collision count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
        self.collisions = 0;
    }

    pub fn metrics(&self) -> HashSetMetrics {
        let bucket_count = self.buckets.len();
        HashSetMetrics {
            size: self.len,
            bucket_count,
            load_factor: self.len as f64 / bucket_count as f64,
            max_chain_depth: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            occupied_buckets: self.buckets.iter().filter(|b| !b.is_empty()).count(),
            collisions: self.collisions,
            is_empty: self.len == 0,
        }
    }

    pub fn snapshot(&self) -> HashSetSnapshot<T> {
        HashSetSnapshot {
            buckets: self.buckets.clone(),
        }
    }
}

fn hash_step(key: &str, index: usize) -> Step {
    Step::new(HashAction::Hash, format!("hash(\"{key}\") -> bucket {index}")).in_bucket(index)
}

fn not_found(key: &str) -> Rejection {
    Rejection::NotFound {
        value: format!("\"{key}\""),
        container: CONTAINER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(outcome: &Outcome<HashAction>) -> Vec<HashAction> {
        outcome.steps.iter().map(|s| s.action).collect()
    }

    #[test]
    fn scenario_collision_chains() {
        let mut set = HashSet::new();
        assert_eq!(set.bucket_of(&"grape".to_string()), 3);
        assert_eq!(set.bucket_of(&"lemon".to_string()), 3);

        let first = set.add("grape".to_string());
        assert!(first.ok);
        assert_eq!(actions(&first), vec![HashAction::Hash, HashAction::Insert]);

        let second = set.add("lemon".to_string());
        assert!(second.ok);
        assert_eq!(
            actions(&second),
            vec![
                HashAction::Hash,
                HashAction::Compare,
                HashAction::Hash,
                HashAction::Insert
            ]
        );
        assert!(second.steps[3].message.contains("collision resolved by chaining"));

        let bucket: Vec<_> = set.bucket(3).unwrap().iter().map(|e| e.value.as_str()).collect();
        assert_eq!(bucket, ["grape", "lemon"]);
        assert_eq!(set.metrics().collisions, 1);
    }

    #[test]
    fn duplicate_rejected_with_trace() {
        let mut set = HashSet::new();
        set.add("kiwi".to_string());

        let dup = set.add("kiwi".to_string());
        assert!(!dup.ok);
        assert_eq!(dup.message, "\"kiwi\" already exists in the set");
        assert_eq!(dup.steps.last().map(|s| s.action), Some(HashAction::Duplicate));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_value_rejected() {
        let mut set = HashSet::new();
        let outcome = set.add(String::new());
        assert!(!outcome.ok);
        assert!(outcome.steps.is_empty());
    }

    #[test]
    fn every_step_carries_bucket() {
        let mut set = HashSet::new();
        set.add("grape".to_string());
        let outcome = set.add("lemon".to_string());
        assert!(outcome.steps.iter().all(|s| s.bucket_index == Some(3)));
    }

    #[test]
    fn remove_and_has() {
        let mut set: HashSet<i64> = HashSet::new();
        for v in [1, 9, 17] {
            assert!(set.add(v).ok);
        }

        let has = set.has(&17);
        assert!(has.ok);
        assert_eq!(has.steps.last().map(|s| s.action), Some(HashAction::Found));

        let removed = set.remove(&9);
        assert!(removed.ok);
        assert_eq!(removed.steps.last().map(|s| s.action), Some(HashAction::Delete));
        assert!(!set.contains(&9));
        assert_eq!(set.len(), 2);

        let missing = set.remove(&9);
        assert!(!missing.ok);
        assert_eq!(missing.steps.last().map(|s| s.action), Some(HashAction::NotFound));
        assert!(!set.has(&4).ok);
    }

    #[test]
    fn metrics_and_clear() {
        let mut set: HashSet<i64> = HashSet::new();
        for v in [1, 9, 2] {
            set.add(v);
        }
        let metrics = set.metrics();
        assert_eq!(metrics.size, 3);
        assert_eq!(metrics.bucket_count, 8);
        assert_eq!(metrics.max_chain_depth, 2);
        assert_eq!(metrics.occupied_buckets, 2);
        assert_eq!(metrics.collisions, 1);
        assert!((metrics.load_factor - 0.375).abs() < 1e-9);

        set.clear();
        let cleared = set.metrics();
        assert!(cleared.is_empty);
        assert_eq!(cleared.collisions, 0);
        assert_eq!(cleared.bucket_count, 8);
    }

    #[test]
    fn custom_bucket_count() {
        let set: HashSet = HashSet::with_config(HashConfig::default().with_bucket_count(3)).unwrap();
        assert_eq!(set.bucket_count(), 3);
        assert!(HashSet::<String>::with_config(HashConfig { bucket_count: 0 }).is_err());
    }
}
