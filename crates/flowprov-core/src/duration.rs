//! Event duration with the `-1` "not measured" sentinel.
//!
//! On the wire a duration is a signed millisecond count where `-1` means
//! unknown. `EventDuration` keeps that encoding but makes any other negative
//! value unrepresentable.

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Wire value for a duration that was not measured.
pub const UNKNOWN_DURATION_MILLIS: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duration must be -1 (unknown) or non-negative, got {0}")]
pub struct DurationError(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub struct EventDuration {
    // -1 or >= 0
    millis: i64,
}

impl EventDuration {
    pub const UNKNOWN: Self = Self { millis: UNKNOWN_DURATION_MILLIS };

    /// Measured duration; values beyond `i64::MAX` saturate.
    pub fn from_millis(millis: u64) -> Self {
        Self { millis: i64::try_from(millis).unwrap_or(i64::MAX) }
    }

    pub fn from_std(duration: Duration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Signed wire value: `-1` or a non-negative millisecond count.
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    pub fn is_unknown(&self) -> bool {
        self.millis == UNKNOWN_DURATION_MILLIS
    }

    pub fn measured(&self) -> Option<Duration> {
        u64::try_from(self.millis).ok().map(Duration::from_millis)
    }
}

impl Default for EventDuration {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl From<EventDuration> for i64 {
    fn from(value: EventDuration) -> Self {
        value.millis
    }
}

impl TryFrom<i64> for EventDuration {
    type Error = DurationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < UNKNOWN_DURATION_MILLIS {
            return Err(DurationError(value));
        }
        Ok(Self { millis: value })
    }
}

impl From<Duration> for EventDuration {
    fn from(value: Duration) -> Self {
        Self::from_std(value)
    }
}

impl fmt::Display for EventDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "unknown")
        } else {
            write!(f, "{}ms", self.millis)
        }
    }
}

impl JsonSchema for EventDuration {
    fn schema_name() -> Cow<'static, str> {
        "EventDuration".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "integer",
            "format": "int64",
            "minimum": UNKNOWN_DURATION_MILLIS,
            "description": "Duration in milliseconds; -1 when not measured."
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_unknown_sentinel() {
        assert_eq!(EventDuration::default().as_millis(), -1);
        assert!(EventDuration::default().is_unknown());
        assert_eq!(EventDuration::default().measured(), None);
    }

    #[test]
    fn signed_values_below_sentinel_are_rejected() {
        assert_eq!(EventDuration::try_from(-2), Err(DurationError(-2)));
        assert_eq!(EventDuration::try_from(-1), Ok(EventDuration::UNKNOWN));
        assert_eq!(EventDuration::try_from(0).map(|d| d.as_millis()), Ok(0));
    }

    #[test]
    fn serializes_as_signed_millis() {
        let value = serde_json::to_value(EventDuration::from_millis(250)).unwrap();
        assert_eq!(value, serde_json::json!(250));
        let unknown = serde_json::to_value(EventDuration::UNKNOWN).unwrap();
        assert_eq!(unknown, serde_json::json!(-1));
        let err = serde_json::from_value::<EventDuration>(serde_json::json!(-5));
        assert!(err.is_err());
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(EventDuration::from_millis(u64::MAX).as_millis(), i64::MAX);
        assert_eq!(
            EventDuration::from_std(Duration::from_secs(2)).measured(),
            Some(Duration::from_secs(2))
        );
    }
}
