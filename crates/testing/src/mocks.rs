//! Mock table sources.
//!
//! Provides in-memory [`TableSource`] implementations for testing without
//! touching the filesystem.

use grader_domain::{ScoringError, ScoringResult, Table};
use grader_infrastructure::TableSource;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// In-memory table source that records every location it is asked for
pub struct MockTableSource {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    requests: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockTableSource {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            delay: None,
        }
    }

    /// Register a table under a location
    pub fn with_table(self, location: impl Into<String>, table: Table) -> Self {
        self.insert(location, table);
        self
    }

    /// Block every load for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&self, location: impl Into<String>, table: Table) {
        self.tables.write().insert(location.into(), table);
    }

    /// Locations requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }

    pub fn clear(&self) {
        self.tables.write().clear();
        self.requests.write().clear();
    }
}

impl Default for MockTableSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for MockTableSource {
    fn load(&self, location: &str) -> ScoringResult<Table> {
        self.requests.write().push(location.to_string());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.tables
            .read()
            .get(location)
            .cloned()
            .ok_or_else(|| ScoringError::Load(format!("No such mock table: {}", location)))
    }
}

/// Table source that always fails with the given error
pub struct FailingTableSource {
    error: ScoringError,
}

impl FailingTableSource {
    pub fn new(error: ScoringError) -> Self {
        Self { error }
    }
}

impl TableSource for FailingTableSource {
    fn load(&self, _location: &str) -> ScoringResult<Table> {
        Err(self.error.clone())
    }
}
