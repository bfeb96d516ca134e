//! Query backends for keyword probing
//!
//! The probe pipeline needs exactly one capability from a backend: open a
//! session and execute query text, reporting success or failure. Row
//! contents only matter for the discovery query, so everything comes back
//! as text columns.
//!
//! ## Features
//!
//! Enable backend support via Cargo features:
//! - `postgres` - PostgreSQL/Redshift and other wire-compatible engines
//!
//! The [`MockBackend`] is always available and replays scripted behavior
//! for tests.
//!
//! ## Example
//!
//! ```rust,ignore
//! use kwprobe_backend::{PostgresBackend, QueryBackend};
//!
//! let backend = PostgresBackend::new("host=localhost port=5432 user=probe");
//! let session = backend.open().await?;
//! let rows = session.execute("SELECT word FROM pg_get_keywords()").await?;
//! ```

pub mod backend;
pub mod mock;
pub mod postgres;

pub use backend::{BackendError, QueryBackend, QuerySession, Row};
pub use mock::MockBackend;
pub use postgres::PostgresBackend;
