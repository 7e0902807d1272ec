//! Generator tuning knobs.

use serde::Serialize;
use std::time::Duration;

/// Number of workers used when none (or a non-positive count) is supplied.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Upper bound on workers per run; larger requests are clamped to it.
pub const MAX_CONCURRENCY: usize = 256;

/// Pacing interval in milliseconds used when none (or a non-positive one) is supplied.
pub const DEFAULT_WAIT_MS: u64 = 500;

/// Concurrency and pacing of a generator run.
///
/// Both values are always positive; construction from raw integers falls
/// back to [`DEFAULT_CONCURRENCY`] / [`DEFAULT_WAIT_MS`] and never exceeds
/// [`MAX_CONCURRENCY`] workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneratorSettings {
    concurrency: usize,
    #[serde(rename = "wait_ms", serialize_with = "serialize_millis")]
    wait: Duration,
}

impl GeneratorSettings {
    /// Builds settings from raw values, substituting defaults for
    /// non-positive ones and clamping concurrency to [`MAX_CONCURRENCY`].
    pub fn from_raw(concurrency: i64, wait_ms: i64) -> Self {
        let concurrency = if concurrency > 0 {
            concurrency.min(MAX_CONCURRENCY as i64) as usize
        } else {
            DEFAULT_CONCURRENCY
        };
        let wait_ms = if wait_ms > 0 {
            wait_ms as u64
        } else {
            DEFAULT_WAIT_MS
        };
        Self {
            concurrency,
            wait: Duration::from_millis(wait_ms),
        }
    }

    /// Returns a copy with only the supplied values replaced.
    pub fn merge(&self, concurrency: Option<i64>, wait_ms: Option<i64>) -> Self {
        Self::from_raw(
            concurrency.unwrap_or(self.concurrency as i64),
            wait_ms.unwrap_or(self.wait.as_millis() as i64),
        )
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Delay between two records produced by the same worker.
    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from_raw(0, 0)
    }
}

fn serialize_millis<S: serde::Serializer>(wait: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(wait.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_are_used_as_given() {
        let settings = GeneratorSettings::from_raw(8, 120);
        assert_eq!(settings.concurrency(), 8);
        assert_eq!(settings.wait(), Duration::from_millis(120));
    }

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        let settings = GeneratorSettings::from_raw(0, -5);
        assert_eq!(settings.concurrency(), DEFAULT_CONCURRENCY);
        assert_eq!(settings.wait(), Duration::from_millis(DEFAULT_WAIT_MS));

        let settings = GeneratorSettings::from_raw(-1, 10);
        assert_eq!(settings.concurrency(), DEFAULT_CONCURRENCY);
        assert_eq!(settings.wait(), Duration::from_millis(10));
    }

    #[test]
    fn oversized_concurrency_is_clamped() {
        let settings = GeneratorSettings::from_raw(i64::MAX, 1);
        assert_eq!(settings.concurrency(), MAX_CONCURRENCY);

        let settings = GeneratorSettings::default().merge(Some(2_000_000), None);
        assert_eq!(settings.concurrency(), MAX_CONCURRENCY);
    }

    #[test]
    fn merge_keeps_unspecified_values() {
        let settings = GeneratorSettings::from_raw(4, 250).merge(Some(6), None);
        assert_eq!(settings.concurrency(), 6);
        assert_eq!(settings.wait(), Duration::from_millis(250));
    }

    #[test]
    fn serializes_wait_as_millis() {
        let json = serde_json::to_value(GeneratorSettings::from_raw(3, 750)).unwrap();
        assert_eq!(json, serde_json::json!({"concurrency": 3, "wait_ms": 750}));
    }
}
