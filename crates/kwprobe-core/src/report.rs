//! Report schema (stable v1)
//!
//! The report is the sole externally visible artifact of a probing run:
//! four ordered allowed-lists, one per identifier position, in discovery
//! order. The JSON shape is STABLE and VERSIONED - breaking changes require
//! a new version.

use serde::{Deserialize, Serialize};

use crate::probe::{KeywordTestResult, ProbePosition};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a probing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Keywords returned by discovery
    pub keywords_discovered: usize,

    /// Keywords with a complete four-position result
    pub keywords_probed: usize,
}

/// Keyword probe report
///
/// Each allowed-list contains exactly the keywords observed to execute
/// without a backend error in that position, preserving discovery order.
/// Duplicates from discovery are preserved. All four lists are empty when
/// the backend was unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Keywords usable unquoted as a function name
    pub allowed_function_names: Vec<String>,

    /// Keywords usable unquoted as a table name
    pub allowed_table_names: Vec<String>,

    /// Keywords usable unquoted as a variable name
    pub allowed_variable_names: Vec<String>,

    /// Keywords usable unquoted as a parameter name
    pub allowed_parameter_names: Vec<String>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            allowed_function_names: Vec::new(),
            allowed_table_names: Vec::new(),
            allowed_variable_names: Vec::new(),
            allowed_parameter_names: Vec::new(),
        }
    }

    /// Aggregate per-keyword results into the four allowed-lists
    ///
    /// Partitions on the outcome discriminant only: a keyword lands in the
    /// allowed-list for a position exactly when its outcome there is
    /// `Allowed`. Relative order follows the input, which the probe engine
    /// keeps in discovery order.
    pub fn from_results(keywords_discovered: usize, results: &[KeywordTestResult]) -> Self {
        let allowed = |position: ProbePosition| -> Vec<String> {
            results
                .iter()
                .filter(|result| result.is_allowed(position))
                .map(|result| result.keyword.clone())
                .collect()
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary {
                keywords_discovered,
                keywords_probed: results.len(),
            },
            allowed_function_names: allowed(ProbePosition::FunctionName),
            allowed_table_names: allowed(ProbePosition::TableName),
            allowed_variable_names: allowed(ProbePosition::VariableName),
            allowed_parameter_names: allowed(ProbePosition::ParameterName),
        }
    }

    /// Allowed-list for a position
    pub fn allowed(&self, position: ProbePosition) -> &[String] {
        match position {
            ProbePosition::FunctionName => &self.allowed_function_names,
            ProbePosition::TableName => &self.allowed_table_names,
            ProbePosition::VariableName => &self.allowed_variable_names,
            ProbePosition::ParameterName => &self.allowed_parameter_names,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ProbeOutcome, RejectReason};
    use pretty_assertions::assert_eq;

    fn allowed() -> ProbeOutcome {
        ProbeOutcome::Allowed
    }

    fn rejected() -> ProbeOutcome {
        ProbeOutcome::NotAllowed(RejectReason::Rejected("rejected".to_string()))
    }

    #[test]
    fn empty_report() {
        let report = Report::new();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.keywords_discovered, 0);
        for position in ProbePosition::ALL {
            assert!(report.allowed(position).is_empty());
        }
    }

    #[test]
    fn aggregation_partitions_per_position() {
        let results = vec![
            KeywordTestResult::from_outcomes("SUM", [rejected(), rejected(), rejected(), rejected()]),
            KeywordTestResult::from_outcomes("IF", [allowed(), rejected(), allowed(), allowed()]),
            KeywordTestResult::from_outcomes("MyCustomWord", [allowed(), allowed(), allowed(), allowed()]),
        ];

        let report = Report::from_results(3, &results);

        assert_eq!(report.allowed_function_names, vec!["IF", "MyCustomWord"]);
        assert_eq!(report.allowed_table_names, vec!["MyCustomWord"]);
        assert_eq!(report.allowed_variable_names, vec!["IF", "MyCustomWord"]);
        assert_eq!(report.allowed_parameter_names, vec!["IF", "MyCustomWord"]);
        assert_eq!(report.summary.keywords_discovered, 3);
        assert_eq!(report.summary.keywords_probed, 3);
    }

    #[test]
    fn allowed_plus_reserved_equals_total() {
        let results = vec![
            KeywordTestResult::from_outcomes("A", [allowed(), rejected(), allowed(), rejected()]),
            KeywordTestResult::from_outcomes("B", [rejected(), rejected(), allowed(), allowed()]),
            KeywordTestResult::from_outcomes("C", [allowed(), allowed(), rejected(), rejected()]),
        ];

        let report = Report::from_results(3, &results);

        for position in ProbePosition::ALL {
            let reserved = results
                .iter()
                .filter(|r| r.outcome(position).is_reserved())
                .count();
            assert_eq!(report.allowed(position).len() + reserved, results.len());
        }
    }

    #[test]
    fn duplicates_are_preserved() {
        let results = vec![
            KeywordTestResult::from_outcomes("IF", [allowed(), allowed(), allowed(), allowed()]),
            KeywordTestResult::from_outcomes("IF", [allowed(), allowed(), allowed(), allowed()]),
        ];

        let report = Report::from_results(2, &results);
        assert_eq!(report.allowed_function_names, vec!["IF", "IF"]);
    }

    #[test]
    fn partial_probing_keeps_discovered_count() {
        // Session died after one keyword; discovery still saw three.
        let results = vec![KeywordTestResult::from_outcomes(
            "SUM",
            [allowed(), allowed(), allowed(), allowed()],
        )];

        let report = Report::from_results(3, &results);
        assert_eq!(report.summary.keywords_discovered, 3);
        assert_eq!(report.summary.keywords_probed, 1);
    }

    #[test]
    fn report_serialization() {
        let report = Report::new();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"allowed_function_names\""));

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, report.version);
    }
}
