//! One ETL run: load exports, transform, export, load.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tix_ingest::load_sources;
use tix_model::OutputRow;
use tix_output::{PostgresConfig, PostgresSink, write_csv};
use tix_transform::{TransformSummary, transform_batch};
use tracing::{info, info_span};

use crate::config::EtlConfig;

/// Per-run switches that are not part of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Transform without touching the database.
    pub dry_run: bool,
    /// Also write the sanitized table as CSV.
    pub csv: Option<PathBuf>,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: TransformSummary,
    pub rows: usize,
    pub table: String,
    /// Rows inserted into the database, `None` for a dry run.
    pub inserted: Option<u64>,
    pub csv: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Executes a full run.
///
/// The batch is all-or-nothing: any failure before the commit leaves the
/// target table untouched.
pub fn run_pipeline(config: &EtlConfig, request: &RunRequest) -> Result<RunReport> {
    let span = info_span!("etl", table = %config.postgres.table, dry_run = request.dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    if !request.dry_run {
        config.postgres.validate().context("check postgres settings")?;
    }

    let sources = load_sources(&config.source.paths()).context("load source exports")?;
    let output = transform_batch(&sources.tickets, &sources.staff, &config.transform)
        .context("transform batch")?;

    if let Some(path) = &request.csv {
        write_csv(&output.rows, path)
            .with_context(|| format!("write csv export {}", path.display()))?;
    }

    let inserted = if request.dry_run {
        info!(rows = output.rows.len(), "dry run, database load skipped");
        None
    } else {
        Some(load_rows(&config.postgres, &output.rows)?)
    };

    let elapsed = start.elapsed();
    info!(
        rows = output.rows.len(),
        duration_ms = elapsed.as_millis(),
        "run complete"
    );
    Ok(RunReport {
        rows: output.rows.len(),
        summary: output.summary,
        table: config.postgres.table.clone(),
        inserted,
        csv: request.csv.clone(),
        elapsed,
    })
}

fn load_rows(config: &PostgresConfig, rows: &[OutputRow]) -> Result<u64> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(async {
        let sink = PostgresSink::connect(config)
            .await
            .context("connect to postgres")?;
        let result = sink.replace_table(rows).await;
        sink.close().await;
        result.with_context(|| format!("load table {}", config.table))
    })
}
