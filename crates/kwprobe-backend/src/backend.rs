//! Backend trait: an opaque query-executing connection

use async_trait::async_trait;

/// One result row as text columns; a NULL column is `None`
pub type Row = Vec<Option<String>>;

/// Errors raised by a query backend
///
/// Variants carry display strings rather than source errors so the mock
/// backend can replay them and the probe engine can store them as reject
/// reasons.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Query timed out: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// True when the error means the session is gone, not just one query
    ///
    /// The probe engine treats a fatal error as the end of the pass; every
    /// other variant is a per-query observation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BackendError::Connection(_))
    }
}

/// A backend that can open query sessions
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Backend name for logs (e.g. "PostgreSQL", "Mock")
    fn name(&self) -> &'static str;

    /// Open a long-lived session for a discovery or probing pass
    ///
    /// The session is dropped by the caller when the pass ends, on every
    /// exit path.
    async fn open(&self) -> Result<Box<dyn QuerySession>, BackendError>;
}

/// A live session executing query text
///
/// A failed query must not invalidate the session: probing issues hundreds
/// of queries over one session and many of them fail by design.
#[async_trait]
pub trait QuerySession: Send + Sync {
    /// Execute one query, returning its rows as text columns
    async fn execute(&self, query: &str) -> Result<Vec<Row>, BackendError>;
}
