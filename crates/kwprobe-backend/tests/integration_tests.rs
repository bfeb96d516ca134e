//! Integration tests for query backends
//!
//! Mock backend tests run everywhere. Tests requiring a live PostgreSQL
//! server are marked `#[ignore]` and can be run with:
//!
//! ```bash
//! KWPROBE_PG_CONNECTION="host=localhost port=5432 dbname=postgres user=postgres password=pass" \
//! cargo test -p kwprobe-backend --features postgres --test integration_tests -- --ignored
//! ```

use kwprobe_backend::{BackendError, MockBackend, QueryBackend, QuerySession as _};

#[tokio::test]
async fn mock_backend_full_workflow() {
    let backend = MockBackend::new()
        .with_response(
            "SELECT word FROM keywords",
            MockBackend::keyword_rows(&[Some("SELECT"), Some("IF")]),
        )
        .with_rejected_fragment("SELECT;");

    let session = backend.open().await.unwrap();

    let rows = session.execute("SELECT word FROM keywords").await.unwrap();
    assert_eq!(rows.len(), 2);

    let rejected = session.execute("EVALUATE SELECT;").await;
    assert!(matches!(rejected, Err(BackendError::Query(_))));

    // The session survives the rejected query.
    let rows = session.execute("SELECT word FROM keywords").await.unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(backend.execute_count(), 3);
}

#[tokio::test]
async fn mock_backend_rejections_are_not_fatal() {
    let backend = MockBackend::new().with_reject_all();
    let session = backend.open().await.unwrap();

    let error = session.execute("anything").await.unwrap_err();
    assert!(!error.is_fatal());
}

#[cfg(feature = "postgres")]
mod postgres_live {
    use kwprobe_backend::{PostgresBackend, QueryBackend, QuerySession as _};

    fn connection_string() -> Option<String> {
        std::env::var("KWPROBE_PG_CONNECTION").ok()
    }

    #[tokio::test]
    #[ignore = "requires a live PostgreSQL server"]
    async fn live_session_returns_text_rows() {
        let Some(conn) = connection_string() else {
            eprintln!("KWPROBE_PG_CONNECTION not set, skipping");
            return;
        };

        let backend = PostgresBackend::new(conn);
        let session = backend.open().await.unwrap();

        let rows = session
            .execute("SELECT word FROM pg_get_keywords() LIMIT 5")
            .await
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row[0].is_some()));
    }

    #[tokio::test]
    #[ignore = "requires a live PostgreSQL server"]
    async fn live_session_survives_a_rejected_query() {
        let Some(conn) = connection_string() else {
            eprintln!("KWPROBE_PG_CONNECTION not set, skipping");
            return;
        };

        let backend = PostgresBackend::new(conn);
        let session = backend.open().await.unwrap();

        assert!(session.execute("SELECT FROM FROM").await.is_err());

        let rows = session.execute("SELECT 1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].as_deref(), Some("1"));
    }
}
