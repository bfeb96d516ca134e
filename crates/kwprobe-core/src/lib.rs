//! KwProbe Core
//!
//! Core domain model with stable, versioned types.
//! The report schema is part of the public API - breaking changes require
//! a new report version.

pub mod config;
pub mod probe;
pub mod report;

pub use config::{Config, ConfigError, DialectConfig};
pub use probe::{KeywordTestResult, ProbeOutcome, ProbePosition, RejectReason};
pub use report::{Report, ReportSummary, ReportVersion};
