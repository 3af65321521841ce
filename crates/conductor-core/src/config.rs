//! Engine configuration.
//!
//! Hosts pass configuration as loosely typed strings (the stdio envelope's
//! `config` object, CLI flags). [`RawEngineConfig`] captures those values and
//! [`EngineConfig::from_raw`] resolves them, falling back to defaults for
//! anything absent or unparsable. Values of the wrong JSON type decode as
//! absent rather than failing the surrounding request.

use std::time::Duration;

use jiff::SignedDuration;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Delay before an automated step completes when none is configured.
pub const DEFAULT_STEP_DURATION: Duration = Duration::from_secs(2);

/// Source label stamped on run metadata when none is configured.
pub const DEFAULT_SOURCE: &str = "conductor";

/// Unresolved configuration values as received from a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEngineConfig {
    /// Label identifying where runs originate
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    /// Duration string such as `"2s"`, `"250ms"` or `"PT1S"`
    #[serde(default, alias = "stepDuration", deserialize_with = "lenient_string")]
    pub step_duration: Option<String>,
}

/// Accepts any JSON value, keeping strings and dropping everything else.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(Some(text)),
        None | Some(Value::Null) => Ok(None),
        Some(other) => {
            warn!("ignoring non-string config value {other}");
            Ok(None)
        }
    }
}

impl RawEngineConfig {
    /// Fills fields missing here from `fallback`.
    pub fn or(self, fallback: RawEngineConfig) -> Self {
        Self {
            source: self.source.or(fallback.source),
            step_duration: self.step_duration.or(fallback.step_duration),
        }
    }
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Label stamped on run metadata under the `source` key
    pub source: String,
    /// Delay before the automation driver completes a running step
    pub step_duration: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            step_duration: DEFAULT_STEP_DURATION,
        }
    }
}

impl EngineConfig {
    /// Resolves raw values; blank, invalid or negative entries fall back to
    /// the defaults with a warning.
    pub fn from_raw(raw: &RawEngineConfig) -> Self {
        let source = raw
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE)
            .to_string();

        let step_duration = match raw.step_duration.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_STEP_DURATION,
            Some(text) => parse_step_duration(text).unwrap_or_else(|e| {
                warn!("{e}; using default step duration {DEFAULT_STEP_DURATION:?}");
                DEFAULT_STEP_DURATION
            }),
        };

        Self {
            source,
            step_duration,
        }
    }
}

/// Parses a human-friendly or ISO 8601 duration string.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` when the text is not a duration or is
/// negative.
pub fn parse_step_duration(text: &str) -> Result<Duration> {
    let signed: SignedDuration = text.parse().map_err(|e| {
        EngineError::invalid_input("step_duration")
            .with_reason(format!("cannot parse '{text}': {e}"))
    })?;
    Duration::try_from(signed).map_err(|_| {
        EngineError::invalid_input("step_duration")
            .with_reason(format!("'{text}' is negative"))
    })
}
