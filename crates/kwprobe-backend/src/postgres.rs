//! PostgreSQL query backend
//!
//! Sessions run queries through the simple-query protocol, which returns
//! every column as text and accepts multi-statement probe scripts. Works
//! with:
//! - PostgreSQL 9.4+
//! - Amazon Redshift
//! - CockroachDB
//! - Other PostgreSQL-compatible databases
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Plain connection
//! let backend = PostgresBackend::new("host=localhost port=5432 dbname=mydb user=probe");
//!
//! // TLS connection via native-tls
//! let backend = PostgresBackend::new("host=db.example.com dbname=mydb user=probe").with_tls();
//!
//! let session = backend.open().await?;
//! ```

use async_trait::async_trait;

use crate::backend::{BackendError, QueryBackend, QuerySession, Row};

#[cfg(feature = "postgres")]
use tokio_postgres::{Client, Config as PgConfig, NoTls, SimpleQueryMessage};

#[cfg(feature = "postgres")]
use postgres_native_tls::MakeTlsConnector;

#[cfg(feature = "postgres")]
use native_tls::TlsConnector;

/// PostgreSQL query backend
///
/// Holds the connection descriptor; a fresh connection is established each
/// time [`QueryBackend::open`] is called and torn down when the returned
/// session is dropped.
pub struct PostgresBackend {
    /// PostgreSQL connection string
    /// (`host=... port=... dbname=... user=... password=...`)
    conn_str: String,

    /// Connect with TLS
    tls: bool,
}

impl PostgresBackend {
    /// Create a backend from a PostgreSQL connection string
    pub fn new(conn_str: impl Into<String>) -> Self {
        Self {
            conn_str: conn_str.into(),
            tls: false,
        }
    }

    /// Connect with TLS (native-tls)
    ///
    /// Use this for remote servers where data encryption is required.
    pub fn with_tls(mut self) -> Self {
        self.tls = true;
        self
    }
}

#[cfg(feature = "postgres")]
struct PostgresSession {
    client: Client,
}

#[cfg(feature = "postgres")]
#[async_trait]
impl QuerySession for PostgresSession {
    async fn execute(&self, query: &str) -> Result<Vec<Row>, BackendError> {
        let messages = self.client.simple_query(query).await.map_err(|e| {
            if e.is_closed() {
                BackendError::Connection(e.to_string())
            } else {
                BackendError::Query(e.to_string())
            }
        })?;

        let mut rows = Vec::new();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                rows.push(
                    (0..row.len())
                        .map(|i| row.get(i).map(str::to_string))
                        .collect(),
                );
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl QueryBackend for PostgresBackend {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    #[cfg(feature = "postgres")]
    async fn open(&self) -> Result<Box<dyn QuerySession>, BackendError> {
        // Validate the descriptor up front so a typo surfaces as a config
        // error instead of a connection failure.
        let _config: PgConfig = self
            .conn_str
            .parse()
            .map_err(|e| BackendError::Config(format!("Invalid connection string: {}", e)))?;

        let client = if self.tls {
            let connector = TlsConnector::builder().build().map_err(|e| {
                BackendError::Config(format!("Failed to create TLS connector: {}", e))
            })?;
            let tls = MakeTlsConnector::new(connector);

            let (client, connection) = tokio_postgres::connect(&self.conn_str, tls)
                .await
                .map_err(|e| {
                    BackendError::Connection(format!("Failed to connect with TLS: {}", e))
                })?;

            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::warn!(error = %e, "PostgreSQL TLS connection error");
                }
            });

            client
        } else {
            let (client, connection) = tokio_postgres::connect(&self.conn_str, NoTls)
                .await
                .map_err(|e| BackendError::Connection(format!("Failed to connect: {}", e)))?;

            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::warn!(error = %e, "PostgreSQL connection error");
                }
            });

            client
        };

        Ok(Box::new(PostgresSession { client }))
    }

    #[cfg(not(feature = "postgres"))]
    async fn open(&self) -> Result<Box<dyn QuerySession>, BackendError> {
        Err(BackendError::Config(
            "PostgreSQL support not compiled. Rebuild with: cargo build --features postgres"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_tls() {
        let backend = PostgresBackend::new("host=localhost");
        assert!(!backend.tls);

        let backend = backend.with_tls();
        assert!(backend.tls);
        assert_eq!(backend.conn_str, "host=localhost");
    }

    #[cfg(not(feature = "postgres"))]
    #[tokio::test]
    async fn open_without_feature_is_a_config_error() {
        let backend = PostgresBackend::new("host=localhost");
        let result = backend.open().await;
        assert!(matches!(result, Err(BackendError::Config(_))));
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn open_with_invalid_descriptor_is_a_config_error() {
        let backend = PostgresBackend::new("not a valid descriptor %%%");
        let result = backend.open().await;
        assert!(matches!(result, Err(BackendError::Config(_))));
    }
}
