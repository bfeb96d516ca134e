use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use kwprobe_backend::PostgresBackend;
use kwprobe_core::{Config, DialectConfig, ProbePosition, Report};
use kwprobe_engine::{PostgresDialect, ProbeEngine};

/// KwProbe - empirical reserved-keyword classification
///
/// Enumerates the backend's reserved keywords and tests each one unquoted
/// as a function name, table name, variable name, and parameter name.
#[derive(Parser)]
#[command(name = "kwprobe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend connection descriptor (falls back to KWPROBE_CONNECTION,
    /// then to `connection` in the config file)
    connection: Option<String>,

    /// Path to config file (default: kwprobe.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Query dialect: postgres or tabular
    #[arg(short, long)]
    dialect: Option<String>,

    /// Connect with TLS
    #[arg(long)]
    tls: bool,

    /// Bounded per-probe timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Also write the JSON report to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
        }))
        .with_writer(std::io::stderr)
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("kwprobe.toml").exists() {
        Config::from_file(Path::new("kwprobe.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    let dialect = match cli.dialect.as_deref() {
        Some(name) => parse_dialect(name)?,
        None => config.dialect,
    };

    let connection = cli
        .connection
        .or_else(|| std::env::var("KWPROBE_CONNECTION").ok())
        .or_else(|| config.connection.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No connection descriptor. Pass one as an argument, set \
                 KWPROBE_CONNECTION, or add `connection` to kwprobe.toml."
            )
        })?;

    if cli.verbose {
        eprintln!("{} dialect: {:?}", "Using".cyan(), dialect);
    }

    let mut engine = ProbeEngine::new();
    if let Some(timeout_ms) = cli.timeout_ms.or(config.probe_timeout_ms) {
        engine = engine.with_timeout(Duration::from_millis(timeout_ms));
    }

    let report = match dialect {
        DialectConfig::Postgres => {
            let mut backend = PostgresBackend::new(connection);
            if cli.tls || config.tls {
                backend = backend.with_tls();
            }
            kwprobe_engine::run(&backend, &PostgresDialect, &engine).await
        }
        DialectConfig::Tabular => {
            // The Tabular dialect is available through the library for any
            // QueryBackend implementation; no XMLA transport is bundled.
            anyhow::bail!(
                "The tabular dialect needs an XMLA session transport, which this \
                 build does not bundle. Use --dialect postgres, or drive the \
                 tabular templates through the kwprobe-engine library with your \
                 own QueryBackend."
            )
        }
    };

    print_report(&report);

    let output = cli.output.or_else(|| config.output.clone());
    if let Some(path) = output {
        report.save_to_file(&path)?;
        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    // An unreachable backend is an empty report, not a failure exit.
    Ok(())
}

/// Parse a dialect name from the command line
fn parse_dialect(name: &str) -> Result<DialectConfig> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" => Ok(DialectConfig::Postgres),
        "tabular" => Ok(DialectConfig::Tabular),
        other => Err(anyhow::anyhow!(
            "Unknown dialect: {other} (expected postgres or tabular)"
        )),
    }
}

/// Print the four allowed-lists with counts and 1-based numbering
fn print_report(report: &Report) {
    println!("{}", "=".repeat(60).bright_blue());
    println!("{}", "Keyword Probe Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();
    println!("Retrieved {} keywords", report.summary.keywords_discovered);
    println!("Probed {} keywords", report.summary.keywords_probed);

    for position in ProbePosition::ALL {
        let allowed = report.allowed(position);
        println!();
        println!(
            "{} ({}):",
            format!("Allowed as {}", position.label()).bold(),
            allowed.len()
        );

        if allowed.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for (index, keyword) in allowed.iter().enumerate() {
            println!("  {}. {}", index + 1, keyword.green());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_names_parse_case_insensitively() {
        assert_eq!(parse_dialect("postgres").unwrap(), DialectConfig::Postgres);
        assert_eq!(parse_dialect("Tabular").unwrap(), DialectConfig::Tabular);
        assert!(parse_dialect("oracle").is_err());
    }
}
