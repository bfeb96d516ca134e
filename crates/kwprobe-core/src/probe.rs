//! Probe domain types
//!
//! A probe is one synthesized query exercising exactly one
//! (keyword, position) pair against a live backend. The types here record
//! what the backend said, nothing more: "allowed" means the query executed
//! without a backend error, "not allowed" means it raised one.

use serde::{Deserialize, Serialize};

/// Syntactic position a keyword is tested in
///
/// Fixed set of four, never extended at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePosition {
    /// Unquoted name of a user-defined function
    FunctionName,

    /// Unquoted name of a defined table
    TableName,

    /// Unquoted name of a local variable
    VariableName,

    /// Unquoted name of a function parameter
    ParameterName,
}

impl ProbePosition {
    /// All positions, in the fixed order probes run and reports are emitted
    pub const ALL: [ProbePosition; 4] = [
        ProbePosition::FunctionName,
        ProbePosition::TableName,
        ProbePosition::VariableName,
        ProbePosition::ParameterName,
    ];

    /// Human-readable label used in console output
    pub fn label(&self) -> &'static str {
        match self {
            ProbePosition::FunctionName => "function name",
            ProbePosition::TableName => "table name",
            ProbePosition::VariableName => "variable name",
            ProbePosition::ParameterName => "parameter name",
        }
    }
}

impl std::fmt::Display for ProbePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why a probe was classified as not allowed
///
/// Aggregation only looks at the [`ProbeOutcome`] discriminant today; the
/// reason is kept for future diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The backend raised an error while executing the probe
    Rejected(String),

    /// The probe exceeded the configured per-probe timeout
    TimedOut,
}

/// Result of one probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// The query executed without a backend error, regardless of the rows
    /// it returned
    Allowed,

    /// The backend rejected the query, or it timed out
    NotAllowed(RejectReason),
}

impl ProbeOutcome {
    /// True when the keyword is reserved in this position
    pub fn is_reserved(&self) -> bool {
        matches!(self, ProbeOutcome::NotAllowed(_))
    }

    /// True when the keyword can be used unquoted in this position
    pub fn is_allowed(&self) -> bool {
        !self.is_reserved()
    }
}

/// One keyword plus its four per-position outcomes
///
/// Created once per keyword during probing; immutable afterwards. Every
/// record carries all four outcomes - a keyword whose probing was cut short
/// by a session failure is never recorded partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTestResult {
    /// The keyword exactly as discovery returned it
    pub keyword: String,

    /// Outcome when used as a function name
    pub function_name: ProbeOutcome,

    /// Outcome when used as a table name
    pub table_name: ProbeOutcome,

    /// Outcome when used as a variable name
    pub variable_name: ProbeOutcome,

    /// Outcome when used as a parameter name
    pub parameter_name: ProbeOutcome,
}

impl KeywordTestResult {
    /// Build a result from outcomes listed in [`ProbePosition::ALL`] order
    pub fn from_outcomes(keyword: impl Into<String>, outcomes: [ProbeOutcome; 4]) -> Self {
        let [function_name, table_name, variable_name, parameter_name] = outcomes;
        Self {
            keyword: keyword.into(),
            function_name,
            table_name,
            variable_name,
            parameter_name,
        }
    }

    /// Outcome recorded for a position
    pub fn outcome(&self, position: ProbePosition) -> &ProbeOutcome {
        match position {
            ProbePosition::FunctionName => &self.function_name,
            ProbePosition::TableName => &self.table_name,
            ProbePosition::VariableName => &self.variable_name,
            ProbePosition::ParameterName => &self.parameter_name,
        }
    }

    /// True when the keyword is usable unquoted in the position
    pub fn is_allowed(&self, position: ProbePosition) -> bool {
        self.outcome(position).is_allowed()
    }
}
