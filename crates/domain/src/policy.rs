//! Policies for the two behaviours that are ambiguous in submitted data.

use serde::{Deserialize, Serialize};

/// What to do with a metric name that is not in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownMetricPolicy {
    /// Score with `accuracy` and log a warning
    #[default]
    FallbackToAccuracy,
    /// Fail with a metric error
    Reject,
}

/// What to do when an identifier appears more than once in one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later rows overwrite earlier ones
    #[default]
    LastWriteWins,
    /// Fail with an alignment error
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_lenient_behaviour() {
        assert_eq!(UnknownMetricPolicy::default(), UnknownMetricPolicy::FallbackToAccuracy);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::LastWriteWins);
    }

    #[test]
    fn test_policy_serialization() {
        let parsed: UnknownMetricPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(parsed, UnknownMetricPolicy::Reject);
        assert_eq!(
            serde_json::to_string(&DuplicatePolicy::LastWriteWins).unwrap(),
            "\"last_write_wins\""
        );
    }
}
