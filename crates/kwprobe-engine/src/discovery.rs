//! Keyword discovery
//!
//! Asks the backend for its reserved keyword list via the dialect's
//! introspection query. Discovery failure is not fatal: the pipeline
//! continues with zero keywords rather than aborting the run.

use kwprobe_backend::QueryBackend;

use crate::dialect::Dialect;

/// Fetch the keyword list, in backend order, skipping NULL values
///
/// Keywords are returned exactly as received: no dedup, no sorting, no
/// syntax validation. Duplicates are probed and reported independently
/// downstream. Any session or query error is logged and yields an empty
/// list.
pub async fn discover_keywords(backend: &dyn QueryBackend, dialect: &dyn Dialect) -> Vec<String> {
    let query = dialect.discovery_query();

    let session = match backend.open().await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(
                backend = backend.name(),
                error = %e,
                "keyword discovery could not open a session"
            );
            return Vec::new();
        }
    };

    let rows = match session.execute(&query).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(
                backend = backend.name(),
                error = %e,
                "keyword discovery query failed"
            );
            return Vec::new();
        }
    };

    rows.into_iter()
        .filter_map(|mut row| {
            if row.is_empty() {
                None
            } else {
                row.swap_remove(0)
            }
        })
        .collect()
}
