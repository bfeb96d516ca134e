//! Probe query templates per backend dialect
//!
//! Each dialect supplies the discovery query and four template functions,
//! one per identifier position. The keyword is substituted verbatim - no
//! quoting, no escaping. A keyword that breaks the synthesized query is
//! exactly the signal being measured, so templates must never sanitize it.

use kwprobe_core::ProbePosition;

/// Supplies the discovery query and the per-position probe templates
pub trait Dialect: Send + Sync {
    /// Dialect name for logs
    fn name(&self) -> &'static str;

    /// Introspection query enumerating the backend's reserved keyword
    /// list, one keyword in the first text column of each row
    fn discovery_query(&self) -> String;

    /// Minimal self-contained query using `keyword` unquoted in `position`
    ///
    /// The snippet must be executable on its own and must not depend on any
    /// model or table existing in the target database.
    fn probe_query(&self, position: ProbePosition, keyword: &str) -> String;
}

/// DAX dialect for Tabular analytical engines
///
/// Keywords come from the `DISCOVER_KEYWORDS` schema rowset exposed as a
/// DMV. Each probe defines a throwaway query-scoped object named after the
/// keyword and evaluates it.
pub struct TabularDialect;

impl Dialect for TabularDialect {
    fn name(&self) -> &'static str {
        "Tabular"
    }

    fn discovery_query(&self) -> String {
        "SELECT [Keyword] FROM $SYSTEM.DISCOVER_KEYWORDS".to_string()
    }

    fn probe_query(&self, position: ProbePosition, keyword: &str) -> String {
        match position {
            ProbePosition::FunctionName => format!(
                "DEFINE FUNCTION Test.{kw} = () => 1 EVALUATE {{ Test.{kw}() }}",
                kw = keyword
            ),
            ProbePosition::TableName => format!(
                "DEFINE TABLE {kw} = {{ 1 }} EVALUATE {kw}",
                kw = keyword
            ),
            ProbePosition::VariableName => format!(
                "DEFINE VAR {kw} = 1 EVALUATE {{ {kw} }}",
                kw = keyword
            ),
            ProbePosition::ParameterName => format!(
                "DEFINE FUNCTION Test.Probe = ({kw}) => {kw} EVALUATE {{ Test.Probe(1) }}",
                kw = keyword
            ),
        }
    }
}

/// SQL dialect for PostgreSQL-compatible engines
///
/// Probes only create session-scoped objects (pg_temp functions, temporary
/// tables), so a probing pass leaves no trace in the target database. Each
/// snippet is a multi-statement script; the simple-query protocol runs it
/// in one implicit transaction, so a failing statement rolls the whole
/// probe back.
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn discovery_query(&self) -> String {
        "SELECT word FROM pg_get_keywords()".to_string()
    }

    fn probe_query(&self, position: ProbePosition, keyword: &str) -> String {
        match position {
            ProbePosition::FunctionName => format!(
                "CREATE OR REPLACE FUNCTION pg_temp.{kw}() RETURNS integer LANGUAGE sql AS 'SELECT 1'; \
                 SELECT pg_temp.{kw}();",
                kw = keyword
            ),
            ProbePosition::TableName => format!(
                "CREATE TEMPORARY TABLE {kw} (v integer); \
                 INSERT INTO {kw} VALUES (1); \
                 SELECT v FROM {kw}; \
                 DROP TABLE {kw};",
                kw = keyword
            ),
            ProbePosition::VariableName => format!(
                "DO $probe$ DECLARE {kw} integer := 1; BEGIN PERFORM {kw}; END $probe$;",
                kw = keyword
            ),
            ProbePosition::ParameterName => format!(
                "CREATE OR REPLACE FUNCTION pg_temp.probe_param({kw} integer) \
                 RETURNS integer LANGUAGE sql AS 'SELECT $1'; \
                 SELECT pg_temp.probe_param(1);",
                kw = keyword
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabular_templates_substitute_verbatim() {
        let dialect = TabularDialect;

        let query = dialect.probe_query(ProbePosition::FunctionName, "SUM");
        assert_eq!(query, "DEFINE FUNCTION Test.SUM = () => 1 EVALUATE { Test.SUM() }");

        let query = dialect.probe_query(ProbePosition::TableName, "SUM");
        assert_eq!(query, "DEFINE TABLE SUM = { 1 } EVALUATE SUM");

        let query = dialect.probe_query(ProbePosition::VariableName, "SUM");
        assert_eq!(query, "DEFINE VAR SUM = 1 EVALUATE { SUM }");

        let query = dialect.probe_query(ProbePosition::ParameterName, "SUM");
        assert_eq!(
            query,
            "DEFINE FUNCTION Test.Probe = (SUM) => SUM EVALUATE { Test.Probe(1) }"
        );
    }

    #[test]
    fn malformed_keywords_are_not_escaped() {
        // A keyword with whitespace produces a broken snippet on purpose:
        // the backend rejecting it is the "not allowed" observation.
        let dialect = TabularDialect;
        let query = dialect.probe_query(ProbePosition::TableName, "LEFT OUTER");
        assert_eq!(query, "DEFINE TABLE LEFT OUTER = { 1 } EVALUATE LEFT OUTER");
    }

    #[test]
    fn postgres_templates_name_the_keyword_in_every_position() {
        let dialect = PostgresDialect;

        for position in ProbePosition::ALL {
            let query = dialect.probe_query(position, "select");
            assert!(query.contains("select"), "{position}: {query}");
        }

        let query = dialect.probe_query(ProbePosition::FunctionName, "window");
        assert!(query.contains("pg_temp.window()"));

        let query = dialect.probe_query(ProbePosition::ParameterName, "window");
        assert!(query.contains("probe_param(window integer)"));
    }

    #[test]
    fn discovery_queries() {
        assert_eq!(
            TabularDialect.discovery_query(),
            "SELECT [Keyword] FROM $SYSTEM.DISCOVER_KEYWORDS"
        );
        assert_eq!(
            PostgresDialect.discovery_query(),
            "SELECT word FROM pg_get_keywords()"
        );
    }
}
