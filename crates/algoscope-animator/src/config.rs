//! Animator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for an [`Animator`](crate::Animator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Pause between consecutive steps. Zero plays as fast as callbacks allow.
    #[serde(rename = "step_delay_ms", with = "millis_serde")]
    pub step_delay: Duration,
}

impl AnimatorConfig {
    pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1500);

    #[must_use]
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// No delay at all, for tests and batch replay.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            step_delay: Duration::ZERO,
        }
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            step_delay: Self::DEFAULT_STEP_DELAY,
        }
    }
}

/// Durations as whole milliseconds.
pub mod millis_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay() {
        assert_eq!(AnimatorConfig::default().step_delay, Duration::from_millis(1500));
        assert_eq!(AnimatorConfig::instant().step_delay, Duration::ZERO);
    }

    #[test]
    fn serde_uses_milliseconds() {
        let config = AnimatorConfig::default().with_step_delay(Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"step_delay_ms":250}"#);

        let parsed: AnimatorConfig = serde_json::from_str(r#"{"step_delay_ms":40}"#).unwrap();
        assert_eq!(parsed.step_delay, Duration::from_millis(40));

        let defaulted: AnimatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, AnimatorConfig::default());
    }
}
