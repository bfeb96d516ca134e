//! Probe engine
//!
//! One long-lived session, every keyword in discovery order, all four
//! positions per keyword with no short-circuiting. A rejected probe query
//! is data, not a failure; only a lost session ends the pass early.

use std::time::Duration;

use kwprobe_backend::{BackendError, QueryBackend, QuerySession};
use kwprobe_core::{KeywordTestResult, ProbeOutcome, ProbePosition, RejectReason};

use crate::dialect::Dialect;

/// Runs the per-keyword probes
#[derive(Debug, Clone, Default)]
pub struct ProbeEngine {
    /// Bounded per-probe timeout; `None` waits indefinitely
    timeout: Option<Duration>,
}

impl ProbeEngine {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Classify probes exceeding `timeout` as not allowed instead of
    /// hanging the whole pass on an unresponsive backend
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Probe every keyword in all four positions
    ///
    /// Returns one fully-populated result per keyword, in input order. If
    /// the session cannot be opened or dies mid-pass, the results collected
    /// so far are returned; a keyword interrupted before all four probes
    /// completed is omitted rather than recorded partially.
    pub async fn run(
        &self,
        backend: &dyn QueryBackend,
        dialect: &dyn Dialect,
        keywords: &[String],
    ) -> Vec<KeywordTestResult> {
        let session = match backend.open().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(
                    backend = backend.name(),
                    error = %e,
                    "probe session could not be opened"
                );
                return Vec::new();
            }
        };

        let mut results = Vec::with_capacity(keywords.len());

        for keyword in keywords {
            match self.probe_keyword(session.as_ref(), dialect, keyword).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(
                        keyword = %keyword,
                        error = %e,
                        "session lost mid-pass, returning partial results"
                    );
                    break;
                }
            }
        }

        results
    }

    /// Probe one keyword in all four positions
    ///
    /// `Err` only for session-fatal errors; every per-query failure becomes
    /// an outcome.
    async fn probe_keyword(
        &self,
        session: &dyn QuerySession,
        dialect: &dyn Dialect,
        keyword: &str,
    ) -> Result<KeywordTestResult, BackendError> {
        let function_name = self
            .probe_one(session, dialect, ProbePosition::FunctionName, keyword)
            .await?;
        let table_name = self
            .probe_one(session, dialect, ProbePosition::TableName, keyword)
            .await?;
        let variable_name = self
            .probe_one(session, dialect, ProbePosition::VariableName, keyword)
            .await?;
        let parameter_name = self
            .probe_one(session, dialect, ProbePosition::ParameterName, keyword)
            .await?;

        Ok(KeywordTestResult {
            keyword: keyword.to_string(),
            function_name,
            table_name,
            variable_name,
            parameter_name,
        })
    }

    /// Run one probe and collapse the result to an outcome
    async fn probe_one(
        &self,
        session: &dyn QuerySession,
        dialect: &dyn Dialect,
        position: ProbePosition,
        keyword: &str,
    ) -> Result<ProbeOutcome, BackendError> {
        let query = dialect.probe_query(position, keyword);

        let executed = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, session.execute(&query)).await {
                Ok(executed) => executed,
                Err(_) => {
                    tracing::debug!(keyword, position = %position, "probe timed out");
                    return Ok(ProbeOutcome::NotAllowed(RejectReason::TimedOut));
                }
            },
            None => session.execute(&query).await,
        };

        match executed {
            // Row contents are irrelevant; completing without an error is
            // the whole measurement.
            Ok(_rows) => Ok(ProbeOutcome::Allowed),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::debug!(keyword, position = %position, error = %e, "probe rejected");
                Ok(ProbeOutcome::NotAllowed(RejectReason::Rejected(
                    e.to_string(),
                )))
            }
        }
    }
}
