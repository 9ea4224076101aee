//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tix_model::StatusSource;

#[derive(Parser)]
#[command(
    name = "tix",
    version,
    about = "Ticket analytics ETL - rebuild the tickets_analysis table from store exports",
    long_about = "Rebuild the tickets_analysis table from ticket store exports.\n\n\
                  Reads the tickets and staffs collections (Extended JSON), resolves each\n\
                  ticket's owner, status, and lifecycle from its activity history, and\n\
                  replaces the PostgreSQL table in a single transaction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the ETL and replace the analytics table.
    Run(RunArgs),

    /// Show the analytics table layout and its DDL.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Ticket export file (overrides `source.tickets`).
    #[arg(long = "tickets", value_name = "PATH")]
    pub tickets: Option<PathBuf>,

    /// Staff export file (overrides `source.staff`).
    #[arg(long = "staff", value_name = "PATH")]
    pub staff: Option<PathBuf>,

    /// Transform and report without connecting to the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the sanitized table to a CSV file.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Where `current_status` comes from (overrides `transform.status_source`).
    #[arg(long = "status-source", value_enum)]
    pub status_source: Option<StatusSourceArg>,

    /// Target table (overrides `postgres.table` and TIX_TABLE_NAME).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Rows per insert statement (overrides `postgres.batch_size`).
    #[arg(long = "batch-size", value_name = "ROWS")]
    pub batch_size: Option<usize>,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Table name used in the rendered DDL.
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,
}

/// CLI status source choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum StatusSourceArg {
    History,
    Ticket,
    PreferTicket,
}

impl From<StatusSourceArg> for StatusSource {
    fn from(value: StatusSourceArg) -> Self {
        match value {
            StatusSourceArg::History => Self::History,
            StatusSourceArg::Ticket => Self::Ticket,
            StatusSourceArg::PreferTicket => Self::PreferTicket,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_arguments_parse() {
        let cli = Cli::try_parse_from([
            "tix",
            "--config",
            "etl.toml",
            "run",
            "--tickets",
            "t.json",
            "--dry-run",
            "--status-source",
            "prefer-ticket",
            "--csv",
            "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("etl.toml")));
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.dry_run);
        assert_eq!(args.tickets, Some(PathBuf::from("t.json")));
        assert_eq!(args.staff, None);
        assert_eq!(args.csv, Some(PathBuf::from("out.csv")));
        assert!(matches!(
            args.status_source.map(StatusSource::from),
            Some(StatusSource::PreferTicket)
        ));
    }

    #[test]
    fn test_schema_command_parses() {
        let cli = Cli::try_parse_from(["tix", "schema", "--table", "t2"]).unwrap();
        let Command::Schema(args) = cli.command else {
            panic!("expected schema command");
        };
        assert_eq!(args.table.as_deref(), Some("t2"));
    }
}
