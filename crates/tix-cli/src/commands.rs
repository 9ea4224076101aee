use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tix_cli::config::{EtlConfig, load_config};
use tix_cli::pipeline::{RunReport, RunRequest, run_pipeline};
use tix_model::{DEFAULT_TABLE_NAME, TICKETS_ANALYSIS_COLUMNS};
use tix_output::create_table_sql;
use tracing::info;

use crate::cli::{RunArgs, SchemaArgs};
use crate::summary::apply_table_style;

pub fn run_etl(config_path: Option<&Path>, args: &RunArgs) -> Result<RunReport> {
    let (mut config, origin) = load_config(config_path).context("load configuration")?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    apply_run_args(&mut config, args);
    info!(config = %origin, "configuration resolved");

    let request = RunRequest {
        dry_run: args.dry_run,
        csv: args.csv.clone(),
    };
    run_pipeline(&config, &request)
}

/// Command-line flags win over file and environment values.
fn apply_run_args(config: &mut EtlConfig, args: &RunArgs) {
    if let Some(path) = &args.tickets {
        config.source.tickets = path.clone();
    }
    if let Some(path) = &args.staff {
        config.source.staff = path.clone();
    }
    if let Some(source) = args.status_source {
        config.transform.status_source = source.into();
    }
    if let Some(table) = &args.table {
        config.postgres.table = table.clone();
    }
    if let Some(size) = args.batch_size {
        config.postgres.batch_size = size;
    }
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let table_name = args.table.as_deref().unwrap_or(DEFAULT_TABLE_NAME);
    let ddl = create_table_sql(table_name).context("render table definition")?;

    let mut table = Table::new();
    table.set_header(vec!["Column", "Type", "Constraints"]);
    apply_table_style(&mut table);
    for column in &TICKETS_ANALYSIS_COLUMNS {
        let mut constraints = Vec::new();
        if column.primary_key {
            constraints.push("primary key");
        }
        if column.non_negative {
            constraints.push(">= 0");
        }
        table.add_row(vec![
            column.name.to_string(),
            column.kind.sql_type(),
            constraints.join(", "),
        ]);
    }
    println!("{table}");
    println!();
    println!("{ddl};");
    Ok(())
}
