//! Mock query backend for testing
//!
//! This backend executes nothing; it replays scripted behavior. It's useful
//! for:
//! - Unit testing the probe pipeline without a live engine
//! - Integration testing CI/CD pipelines
//! - Simulating error conditions (rejections, session loss, latency)
//!
//! Per query, the session answers in this order:
//! 1. session loss, when the configured query budget is spent
//! 2. a canned row response registered for the exact query text
//! 3. reject-all, then reject-by-fragment rules
//! 4. otherwise success with zero rows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kwprobe_backend::{MockBackend, QueryBackend};
//!
//! // Accept everything except queries naming SUM
//! let backend = MockBackend::new()
//!     .with_response(
//!         "SELECT word FROM keywords",
//!         MockBackend::keyword_rows(&[Some("SUM"), Some("IF")]),
//!     )
//!     .with_rejected_fragment("SUM");
//!
//! let session = backend.open().await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backend::{BackendError, QueryBackend, QuerySession, Row};

/// State shared between a mock backend and every session it opens
struct MockState {
    /// Queries executed so far, across all sessions
    executed: AtomicUsize,

    /// Every query text seen, in execution order
    query_log: Mutex<Vec<String>>,
}

/// Mock query backend
///
/// Builder-style configuration; open sessions share the backend's query
/// log, so assertions can run against the backend after the pipeline
/// finishes.
pub struct MockBackend {
    /// Canned row responses by exact query text
    responses: HashMap<String, Vec<Row>>,

    /// Reject any query containing one of these fragments
    reject_fragments: Vec<String>,

    /// Reject every query
    reject_all: bool,

    /// Fail every `open` call
    fail_open: bool,

    /// Return a connection error once this many queries have executed
    die_after: Option<usize>,

    /// Simulated latency per operation (milliseconds)
    latency_ms: u64,

    shared: Arc<MockState>,
}

impl MockBackend {
    /// Create a mock backend that accepts every query with zero rows
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            reject_fragments: Vec::new(),
            reject_all: false,
            fail_open: false,
            die_after: None,
            latency_ms: 0,
            shared: Arc::new(MockState {
                executed: AtomicUsize::new(0),
                query_log: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register canned rows for an exact query text
    ///
    /// Canned responses win over rejection rules, so a discovery query can
    /// keep answering while probe queries are being rejected.
    pub fn with_response(mut self, query: impl Into<String>, rows: Vec<Row>) -> Self {
        self.responses.insert(query.into(), rows);
        self
    }

    /// Reject any query whose text contains `fragment`
    pub fn with_rejected_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.reject_fragments.push(fragment.into());
        self
    }

    /// Reject every query
    pub fn with_reject_all(mut self) -> Self {
        self.reject_all = true;
        self
    }

    /// Fail every attempt to open a session
    pub fn with_open_failure(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Simulate session loss: after `count` executed queries, every further
    /// query returns a connection error
    pub fn with_session_loss_after(mut self, count: usize) -> Self {
        self.die_after = Some(count);
        self
    }

    /// Simulate latency for opens and queries
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Build single-column rows from keyword values, `None` meaning NULL
    pub fn keyword_rows(keywords: &[Option<&str>]) -> Vec<Row> {
        keywords
            .iter()
            .map(|keyword| vec![keyword.map(str::to_string)])
            .collect()
    }

    /// Number of queries executed across all sessions
    pub fn execute_count(&self) -> usize {
        self.shared.executed.load(Ordering::SeqCst)
    }

    /// Every query executed so far, in order
    pub async fn executed_queries(&self) -> Vec<String> {
        self.shared.query_log.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

struct MockSession {
    responses: HashMap<String, Vec<Row>>,
    reject_fragments: Vec<String>,
    reject_all: bool,
    die_after: Option<usize>,
    latency_ms: u64,
    shared: Arc<MockState>,
}

impl MockSession {
    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

#[async_trait]
impl QueryBackend for MockBackend {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn open(&self) -> Result<Box<dyn QuerySession>, BackendError> {
        self.simulate_latency().await;

        if self.fail_open {
            return Err(BackendError::Connection(
                "Simulated open failure".to_string(),
            ));
        }

        Ok(Box::new(MockSession {
            responses: self.responses.clone(),
            reject_fragments: self.reject_fragments.clone(),
            reject_all: self.reject_all,
            die_after: self.die_after,
            latency_ms: self.latency_ms,
            shared: Arc::clone(&self.shared),
        }))
    }
}

#[async_trait]
impl QuerySession for MockSession {
    async fn execute(&self, query: &str) -> Result<Vec<Row>, BackendError> {
        self.simulate_latency().await;

        self.shared.query_log.lock().await.push(query.to_string());
        let executed = self.shared.executed.fetch_add(1, Ordering::SeqCst);

        if let Some(budget) = self.die_after {
            if executed >= budget {
                return Err(BackendError::Connection(
                    "Simulated session loss".to_string(),
                ));
            }
        }

        if let Some(rows) = self.responses.get(query) {
            return Ok(rows.clone());
        }

        if self.reject_all {
            return Err(BackendError::Query("Rejected by mock".to_string()));
        }

        if let Some(fragment) = self
            .reject_fragments
            .iter()
            .find(|fragment| query.contains(fragment.as_str()))
        {
            return Err(BackendError::Query(format!(
                "Rejected by mock: query contains {:?}",
                fragment
            )));
        }

        Ok(Vec::new())
    }
}
