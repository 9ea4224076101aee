//! PostgreSQL sink.
//!
//! The analytics table is rebuilt on every run: drop, create, and insert all
//! happen inside one transaction, so readers see either the previous table
//! or the complete new one.

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::{Postgres, QueryBuilder};
use tix_model::{DEFAULT_TABLE_NAME, OutputRow, TICKETS_ANALYSIS_COLUMNS};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::ddl::{create_table_sql, drop_table_sql, insert_prefix, validate_table_name};
use crate::error::{OutputError, Result};

/// PostgreSQL accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// Largest batch that fits in a single insert statement.
pub const MAX_BATCH_SIZE: usize = MAX_BIND_PARAMS / TICKETS_ANALYSIS_COLUMNS.len();

/// Default rows per insert statement.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Connection and load settings.
///
/// `url` takes precedence over the discrete fields; `password` is applied on
/// top of either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// libpq-style mode: disable, allow, prefer, require, verify-ca, verify-full.
    pub sslmode: String,
    /// Target table.
    pub table: String,
    /// Rows per insert statement.
    pub batch_size: usize,
    /// Seconds to wait for a connection.
    pub connect_timeout_secs: u64,
    /// Extra connection attempts after the first failure.
    pub max_retries: u32,
    /// Base delay between attempts; attempt `n` waits `n` times this.
    pub retry_backoff_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: None,
            sslmode: "prefer".to_string(),
            table: DEFAULT_TABLE_NAME.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            connect_timeout_secs: 10,
            max_retries: 3,
            retry_backoff_ms: 500,
        }
    }
}

impl PostgresConfig {
    /// Checks table name and batch size.
    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.table)?;
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(OutputError::InvalidBatchSize {
                size: self.batch_size,
                max: MAX_BATCH_SIZE,
            });
        }
        Ok(())
    }

    /// Connection options derived from the settings.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let invalid = |what: &str, e: sqlx::Error| OutputError::InvalidConfig {
            message: format!("{what}: {e}"),
        };
        let mut options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).map_err(|e| invalid("url", e))?,
            None => {
                let ssl_mode =
                    PgSslMode::from_str(&self.sslmode).map_err(|e| invalid("sslmode", e))?;
                PgConnectOptions::new()
                    .host(&self.host)
                    .port(self.port)
                    .database(&self.database)
                    .username(&self.user)
                    .ssl_mode(ssl_mode)
            }
        };
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }

    /// Host/database pair for log lines; never includes credentials.
    pub fn display_target(&self) -> String {
        match &self.url {
            Some(_) => "<url>".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

/// A connected sink for one table.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
    table: String,
    batch_size: usize,
}

impl PostgresSink {
    /// Connects with bounded retries and linear backoff.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        config.validate()?;
        let options = config.connect_options()?;
        let attempts = config.max_retries.saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
                .connect_with(options.clone())
                .await;
            match result {
                Ok(pool) => {
                    info!(server = %config.display_target(), attempt, "connected to postgres");
                    return Ok(Self {
                        pool,
                        table: config.table.clone(),
                        batch_size: config.batch_size,
                    });
                }
                Err(error) if attempt < attempts => {
                    let delay = retry_delay(config.retry_backoff_ms, attempt);
                    warn!(
                        attempt,
                        retry_in_ms = delay.as_millis(),
                        error = %error,
                        "postgres connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(source) => {
                    return Err(OutputError::Connect {
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }

    /// Replaces the table contents with `rows`.
    ///
    /// Any failure drops the open transaction, which rolls it back. Returns the
    /// number of inserted rows.
    pub async fn replace_table(&self, rows: &[OutputRow]) -> Result<u64> {
        let span = info_span!("load", table = %self.table, rows = rows.len());
        async move {
            let start = Instant::now();
            let drop_sql = drop_table_sql(&self.table)?;
            let create_sql = create_table_sql(&self.table)?;
            let prefix = insert_prefix(&self.table)?;

            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| self.load_error("begin transaction for", e))?;
            sqlx::query(&drop_sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.load_error("drop", e))?;
            sqlx::query(&create_sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.load_error("create", e))?;

            let mut inserted = 0u64;
            for (batch, chunk) in rows.chunks(self.batch_size).enumerate() {
                let mut builder = QueryBuilder::<Postgres>::new(prefix.as_str());
                builder.push_values(chunk, |mut values, row| {
                    values
                        .push_bind(row.mongo_ticket_id.as_str())
                        .push_bind(row.ticket_id)
                        .push_bind(row.subject.as_deref())
                        .push_bind(row.ticket_type.as_deref())
                        .push_bind(row.current_status.as_deref())
                        .push_bind(row.ticket_created_at)
                        .push_bind(row.ticket_closed_at)
                        .push_bind(row.current_staff_id)
                        .push_bind(row.staff_name.as_deref())
                        .push_bind(row.staff_department.as_deref())
                        .push_bind(row.handle_duration_mins);
                });
                let result = builder
                    .build()
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| self.load_error("insert into", e))?;
                inserted += result.rows_affected();
                debug!(batch, rows = chunk.len(), "batch inserted");
            }

            tx.commit()
                .await
                .map_err(|e| self.load_error("commit", e))?;
            info!(
                inserted,
                duration_ms = start.elapsed().as_millis(),
                "table replaced"
            );
            Ok(inserted)
        }
        .instrument(span)
        .await
    }

    /// Closes the connection pool.
    pub async fn close(self) {
        self.pool.close().await;
    }

    fn load_error(&self, stage: &'static str, source: sqlx::Error) -> OutputError {
        OutputError::Load {
            table: self.table.clone(),
            stage,
            source,
        }
    }
}

/// Linear backoff before the attempt after `attempt`.
fn retry_delay(backoff_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(backoff_ms.saturating_mul(u64::from(attempt)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PostgresConfig::default();
        assert_eq!(config.table, "tickets_analysis");
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_batch_size_bounds() {
        assert_eq!(MAX_BATCH_SIZE, 5957);
        for size in [0, MAX_BATCH_SIZE + 1] {
            let config = PostgresConfig {
                batch_size: size,
                ..PostgresConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(OutputError::InvalidBatchSize { .. })
            ));
        }
    }

    #[test]
    fn test_connect_options_from_fields_and_url() {
        let config = PostgresConfig {
            host: "db.internal".to_string(),
            port: 6543,
            database: "analytics".to_string(),
            password: Some("secret".to_string()),
            ..PostgresConfig::default()
        };
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("analytics"));

        let config = PostgresConfig {
            url: Some("postgres://etl@warehouse:5433/metrics".to_string()),
            ..PostgresConfig::default()
        };
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "warehouse");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "etl");
        assert_eq!(config.display_target(), "<url>");
    }

    #[test]
    fn test_retry_delay_is_linear_and_saturates() {
        assert_eq!(retry_delay(500, 1), Duration::from_millis(500));
        assert_eq!(retry_delay(500, 3), Duration::from_millis(1500));
        assert_eq!(retry_delay(u64::MAX, 4), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_bad_sslmode_is_rejected() {
        let config = PostgresConfig {
            sslmode: "sometimes".to_string(),
            ..PostgresConfig::default()
        };
        assert!(matches!(
            config.connect_options(),
            Err(OutputError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = PostgresConfig {
            password: Some("secret".to_string()),
            ..PostgresConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(!text.contains("secret"));
        let parsed: PostgresConfig = toml::from_str("host = \"pg\"\nbatch_size = 50\n").unwrap();
        assert_eq!(parsed.host, "pg");
        assert_eq!(parsed.batch_size, 50);
        assert_eq!(parsed.port, 5432);
    }
}
