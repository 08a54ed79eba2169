//! Chained hash map engine.
//!
//! Same bucket layout and hash as [`HashSet`](crate::HashSet), but entries
//! carry a value and `put` on an existing key updates it in place.

use std::fmt::Display;

use algoscope_trace::{IdSequence, MapAction, Outcome, Rejection, Result, TraceStep};
use serde::Serialize;
use tracing::debug;

use crate::config::HashConfig;
use crate::hashing::bucket_for;

type Step = TraceStep<MapAction>;

const CONTAINER: &str = "map";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry<K, V> {
    pub id: String,
    pub key: K,
    pub value: V,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashMapMetrics {
    pub entries: usize,
    pub occupied_buckets: usize,
    pub bucket_count: usize,
    pub max_chain: usize,
    pub load_factor: f64,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashMapSnapshot<K, V> {
    pub buckets: Vec<Vec<MapEntry<K, V>>>,
}

#[derive(Debug, Clone)]
pub struct HashMap<K = String, V = String> {
    buckets: Vec<Vec<MapEntry<K, V>>>,
    len: usize,
    ids: IdSequence,
}

impl<K, V> Default for HashMap<K, V>
where
    K: Clone + PartialEq + Display,
    V: Clone + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashMap<K, V>
where
    K: Clone + PartialEq + Display,
    V: Clone + Display,
{
    pub fn new() -> Self {
        Self::with_bucket_count(HashConfig::MAP_DEFAULT.bucket_count)
    }

    pub fn with_config(config: HashConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_bucket_count(config.bucket_count))
    }

    fn with_bucket_count(bucket_count: usize) -> Self {
        Self {
            buckets: (0..bucket_count).map(|_| Vec::new()).collect(),
            len: 0,
            ids: IdSequence::new("hm"),
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

    pub fn bucket(&self, index: usize) -> Option<&[MapEntry<K, V>]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    /// Non-tracing lookup.
    pub fn lookup(&self, key: &K) -> Option<&V> {
        let index = bucket_for(&key.to_string(), self.buckets.len());
        self.buckets[index]
            .iter()
            .find(|e| e.key == *key)
            .map(|e| &e.value)
    }

    /// Insert, or update in place keeping the entry id.
    pub fn put(&mut self, key: K, value: V) -> Outcome<MapAction> {
        let name = key.to_string();
        if name.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "key" }, Vec::new());
        }

        let index = bucket_for(&name, self.buckets.len());
        let mut steps = vec![hash_step(&name, index)];

        let bucket = &mut self.buckets[index];
        let existing = scan(bucket, &key, index, &mut steps);
        let message = format!("Set \"{name}\" = {value} (bucket {index})");

        match existing {
            Some(position) => {
                let entry = &mut bucket[position];
                steps.push(
                    Step::on(
                        &entry.id,
                        MapAction::Update,
                        format!("Updated \"{name}\": {} -> {value}", entry.value),
                    )
                    .in_bucket(index),
                );
                entry.value = value;
            }
            None => {
                let id = self.ids.next_id();
                let step = if bucket.is_empty() {
                    Step::on(
                        &id,
                        MapAction::Insert,
                        format!("Inserted \"{name}\" into bucket {index}"),
                    )
                } else {
                    Step::on(
                        &id,
                        MapAction::Collision,
                        format!(
                            "Collision in bucket {index}: chaining \"{name}\" after {} entry(ies)",
                            bucket.len()
                        ),
                    )
                };
                steps.push(step.in_bucket(index));
                bucket.push(MapEntry { id, key, value });
                self.len += 1;
            }
        }

        debug!(key = %name, bucket = index, steps = steps.len(), "Hash map put");
        Outcome::success(message, steps)
    }

    /// Look a key up with a trace. The outcome's value is the stored value.
    pub fn get(&self, key: &K) -> Outcome<MapAction, V> {
        let name = key.to_string();
        if name.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "key" }, Vec::new());
        }
        let index = bucket_for(&name, self.buckets.len());
        let mut steps = vec![hash_step(&name, index)];

        let bucket = &self.buckets[index];
        match scan(bucket, key, index, &mut steps) {
            Some(position) => {
                let entry = &bucket[position];
                steps.push(
                    Step::on(
                        &entry.id,
                        MapAction::Found,
                        format!("Found \"{name}\" = {}", entry.value),
                    )
                    .in_bucket(index),
                );
                Outcome::success(format!("\"{name}\" = {}", entry.value), steps)
                    .with_value(entry.value.clone())
            }
            None => {
                steps.push(not_found_step(&name, index));
                Outcome::rejected(not_found(&name), steps)
            }
        }
    }

    /// Remove a key. The outcome's value is the removed value.
    pub fn remove(&mut self, key: &K) -> Outcome<MapAction, V> {
        let name = key.to_string();
        if name.is_empty() {
            return Outcome::rejected(Rejection::EmptyInput { what: "key" }, Vec::new());
        }
        let index = bucket_for(&name, self.buckets.len());
        let mut steps = vec![hash_step(&name, index)];

        let bucket = &mut self.buckets[index];
        match scan(bucket, key, index, &mut steps) {
            Some(position) => {
                let entry = bucket.remove(position);
                self.len -= 1;
                steps.push(
                    Step::on(
                        entry.id,
                        MapAction::Delete,
                        format!("Removed \"{name}\" from bucket {index}"),
                    )
                    .in_bucket(index),
                );
                debug!(key = %name, bucket = index, "Hash map remove");
                Outcome::success(format!("Removed \"{name}\""), steps).with_value(entry.value)
            }
            None => {
                steps.push(not_found_step(&name, index));
                Outcome::rejected(not_found(&name), steps)
            }
        }
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    pub fn metrics(&self) -> HashMapMetrics {
        let bucket_count = self.buckets.len();
        HashMapMetrics {
            entries: self.len,
            occupied_buckets: self.buckets.iter().filter(|b| !b.is_empty()).count(),
            bucket_count,
            max_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load_factor: self.len as f64 / bucket_count as f64,
            is_empty: self.len == 0,
        }
    }

    pub fn snapshot(&self) -> HashMapSnapshot<K, V> {
        HashMapSnapshot {
            buckets: self.buckets.clone(),
        }
    }
}

/// Emit a compare step per entry until `key` matches. Returns its position.
fn scan<K: PartialEq + Display, V>(
    bucket: &[MapEntry<K, V>],
    key: &K,
    index: usize,
    steps: &mut Vec<Step>,
) -> Option<usize> {
    for (position, entry) in bucket.iter().enumerate() {
        steps.push(
            Step::on(
                &entry.id,
                MapAction::Compare,
                format!("Comparing key \"{}\"", entry.key),
            )
            .in_bucket(index),
        );
        if entry.key == *key {
            return Some(position);
        }
    }
    None
}

fn hash_step(name: &str, index: usize) -> Step {
    Step::new(MapAction::Hash, format!("hash(\"{name}\") -> bucket {index}")).in_bucket(index)
}

fn not_found_step(name: &str, index: usize) -> Step {
    Step::new(
        MapAction::NotFound,
        format!("Key \"{name}\" not in bucket {index}"),
    )
    .in_bucket(index)
}

fn not_found(name: &str) -> Rejection {
    Rejection::NotFound {
        value: format!("key \"{name}\""),
        container: CONTAINER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> HashMap {
        HashMap::new()
    }

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn put_then_get() {
        let mut m = map();
        let put = m.put(s("kiwi"), s("green"));
        assert!(put.ok);
        assert_eq!(put.message, "Set \"kiwi\" = green (bucket 0)");
        assert_eq!(put.steps[1].action, MapAction::Insert);

        let got = m.get(&s("kiwi"));
        assert_eq!(got.value.as_deref(), Some("green"));
        assert_eq!(got.steps.last().map(|s| s.action), Some(MapAction::Found));
    }

    #[test]
    fn put_existing_updates_in_place() {
        let mut m = map();
        m.put(s("kiwi"), s("green"));
        let id = m.bucket(0).unwrap()[0].id.clone();

        let outcome = m.put(s("kiwi"), s("brown"));
        let actions: Vec<_> = outcome.steps.iter().map(|s| s.action).collect();
        assert_eq!(actions, vec![MapAction::Hash, MapAction::Compare, MapAction::Update]);

        assert_eq!(m.len(), 1);
        assert_eq!(m.bucket(0).unwrap()[0].id, id);
        assert_eq!(m.lookup(&s("kiwi")).map(String::as_str), Some("brown"));
    }

    #[test]
    fn collision_step_on_occupied_bucket() {
        let mut m = map();
        assert_eq!(bucket_for("lemon", 16), 3);
        assert_eq!(bucket_for("3", 16), 3);

        m.put(s("3"), s("three"));
        let outcome = m.put(s("lemon"), s("yellow"));
        assert_eq!(outcome.steps.last().map(|s| s.action), Some(MapAction::Collision));
        assert_eq!(m.metrics().max_chain, 2);
    }

    #[test]
    fn missing_key() {
        let mut m = map();
        let got = m.get(&s("fig"));
        assert!(!got.ok);
        assert_eq!(got.message, "key \"fig\" not found in the map");
        assert_eq!(got.steps.last().map(|s| s.action), Some(MapAction::NotFound));

        assert!(!m.remove(&s("fig")).ok);
        assert!(!m.put(s(""), s("x")).ok);
    }

    #[test]
    fn empty_key_rejected_everywhere() {
        let mut m = map();
        m.put(s("kiwi"), s("green"));

        let put = m.put(s(""), s("x"));
        let got = m.get(&s(""));
        let removed = m.remove(&s(""));
        for outcome in [&put.rejection, &got.rejection, &removed.rejection] {
            assert_eq!(outcome, &Some(Rejection::EmptyInput { what: "key" }));
        }
        assert!(got.steps.is_empty());
        assert!(removed.steps.is_empty());
        assert_eq!(removed.message, "key cannot be empty");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn remove_returns_value() {
        let mut m = map();
        m.put(s("kiwi"), s("green"));
        let removed = m.remove(&s("kiwi"));
        assert_eq!(removed.value.as_deref(), Some("green"));
        assert!(m.is_empty());
    }

    #[test]
    fn metrics_and_clear() {
        let mut m: HashMap<i64, i64> = HashMap::new();
        for k in 0..20 {
            m.put(k, k * k);
        }
        let metrics = m.metrics();
        assert_eq!(metrics.entries, 20);
        assert_eq!(metrics.bucket_count, 16);
        assert!((metrics.load_factor - 1.25).abs() < 1e-9);
        assert!(metrics.max_chain >= 2);

        m.clear();
        assert!(m.metrics().is_empty);
        assert_eq!(m.metrics().occupied_buckets, 0);
    }
}
