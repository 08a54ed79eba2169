//! Engine configuration.

use algoscope_trace::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bucket layout for a chained hash structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    /// Number of buckets. Fixed for the structure's lifetime.
    pub bucket_count: usize,
}

impl HashConfig {
    /// Default layout for the hash set.
    pub const SET_DEFAULT: Self = Self { bucket_count: 8 };

    /// Default layout for the hash map.
    pub const MAP_DEFAULT: Self = Self { bucket_count: 16 };

    #[must_use]
    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(Error::InvalidConfig("bucket_count must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self::SET_DEFAULT
    }
}

/// Optional size bound for a stack or queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Maximum element count, `None` for unbounded.
    pub capacity: Option<usize>,
}

impl CapacityConfig {
    pub const STACK_DEFAULT: Self = Self { capacity: Some(20) };
    pub const QUEUE_DEFAULT: Self = Self { capacity: Some(15) };

    #[must_use]
    pub fn unbounded() -> Self {
        Self { capacity: None }
    }

    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(Error::InvalidConfig("capacity must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Configuration for every engine, as supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hash_set: HashConfig,
    pub hash_map: HashConfig,
    pub stack: CapacityConfig,
    pub queue: CapacityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_set: HashConfig::SET_DEFAULT,
            hash_map: HashConfig::MAP_DEFAULT,
            stack: CapacityConfig::STACK_DEFAULT,
            queue: CapacityConfig::QUEUE_DEFAULT,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON. Missing sections fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.hash_set.validate()?;
        self.hash_map.validate()?;
        self.stack.validate()?;
        self.queue.validate()
    }

    #[must_use]
    pub fn with_hash_set(mut self, config: HashConfig) -> Self {
        self.hash_set = config;
        self
    }

    #[must_use]
    pub fn with_hash_map(mut self, config: HashConfig) -> Self {
        self.hash_map = config;
        self
    }

    #[must_use]
    pub fn with_stack(mut self, config: CapacityConfig) -> Self {
        self.stack = config;
        self
    }

    #[must_use]
    pub fn with_queue(mut self, config: CapacityConfig) -> Self {
        self.queue = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.hash_set.bucket_count, 8);
        assert_eq!(config.hash_map.bucket_count, 16);
        assert_eq!(config.stack.capacity, Some(20));
        assert_eq!(config.queue.capacity, Some(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_missing_sections() {
        let config =
            EngineConfig::from_json(r#"{ "hash_set": { "bucket_count": 4 }, "stack": { "capacity": null } }"#)
                .unwrap();
        assert_eq!(config.hash_set.bucket_count, 4);
        assert_eq!(config.stack.capacity, None);
        assert_eq!(config.queue.capacity, Some(15));
    }

    #[test]
    fn zero_buckets_rejected() {
        let err = EngineConfig::from_json(r#"{ "hash_map": { "bucket_count": 0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn builders() {
        let config = EngineConfig::default()
            .with_stack(CapacityConfig::bounded(3))
            .with_queue(CapacityConfig::unbounded())
            .with_hash_set(HashConfig::default().with_bucket_count(2));
        assert_eq!(config.stack.capacity, Some(3));
        assert_eq!(config.queue.capacity, None);
        assert_eq!(config.hash_set.bucket_count, 2);
        assert!(CapacityConfig::bounded(0).validate().is_err());
    }
}
