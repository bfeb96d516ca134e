//! KwProbe engine - the probe pipeline
//!
//! Three stages, strictly in order:
//! 1. [`discovery`] - fetch the backend's reserved keyword list
//! 2. [`probe`] - test every keyword unquoted in four identifier positions
//! 3. aggregation ([`kwprobe_core::Report`]) - partition into allowed-lists
//!
//! No stage returns an error. Backend failures degrade to an empty or
//! partial report; a rejected probe query is the measurement itself, not a
//! failure.

pub mod dialect;
pub mod discovery;
pub mod probe;

pub use dialect::{Dialect, PostgresDialect, TabularDialect};
pub use discovery::discover_keywords;
pub use probe::ProbeEngine;

use kwprobe_backend::QueryBackend;
use kwprobe_core::Report;

/// Run the full pipeline: discovery, probing, aggregation
///
/// Never fails: an unreachable backend yields a report with zero keywords
/// and four empty allowed-lists.
pub async fn run(backend: &dyn QueryBackend, dialect: &dyn Dialect, engine: &ProbeEngine) -> Report {
    let keywords = discover_keywords(backend, dialect).await;
    tracing::info!(count = keywords.len(), "retrieved keywords");

    let results = engine.run(backend, dialect, &keywords).await;
    tracing::info!(count = results.len(), "probed keywords");

    Report::from_results(keywords.len(), &results)
}
