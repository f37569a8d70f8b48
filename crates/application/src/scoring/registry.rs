//! Metric registry - resolving external metric names.

use grader_domain::{Metric, ScoringError, ScoringResult, UnknownMetricPolicy, CATALOG};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Name to metric lookup table with an unknown-name policy.
///
/// Built once and shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    metrics: HashMap<String, Metric>,
    unknown_policy: UnknownMetricPolicy,
}

impl MetricRegistry {
    /// Registry holding the full catalog
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for (name, metric) in CATALOG {
            registry.register(name, *metric);
        }
        registry
    }

    /// Registry without any metric
    pub fn empty() -> Self {
        Self {
            metrics: HashMap::new(),
            unknown_policy: UnknownMetricPolicy::default(),
        }
    }

    /// Register a metric under a (case-insensitive) name
    pub fn register(&mut self, name: &str, metric: Metric) {
        self.metrics.insert(name.trim().to_lowercase(), metric);
    }

    pub fn with_unknown_policy(mut self, policy: UnknownMetricPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub fn unknown_policy(&self) -> UnknownMetricPolicy {
        self.unknown_policy
    }

    /// Get a metric by name, without applying the unknown-name policy
    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.get(&name.trim().to_lowercase()).copied()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.metrics.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a name, applying the unknown-name policy on a miss.
    pub fn resolve(&self, name: &str) -> ScoringResult<Metric> {
        if let Some(metric) = self.get(name) {
            debug!(requested = name, metric = %metric, "Resolved metric");
            return Ok(metric);
        }

        match self.unknown_policy {
            UnknownMetricPolicy::FallbackToAccuracy => {
                warn!(requested = name, "Unknown metric, falling back to accuracy");
                Ok(Metric::Accuracy)
            }
            UnknownMetricPolicy::Reject => {
                Err(ScoringError::Metric(format!("Unknown metric: {}", name)))
            }
        }
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
