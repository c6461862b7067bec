//! PostgresSink - persists reports into a relational table
//!
//! The collector side of the pipeline. `start` ensures the target table
//! and index exist; `deliver` inserts one row per report. Every
//! statement is bounded by an explicit timeout.

use std::time::Duration;

use contracts::{BackoffPolicy, ContractError, MetricSink, MetricsReport};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Statement timeout for DDL and inserts
const STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound on closing the pool at shutdown
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for PostgresSink
#[derive(Debug, Clone)]
pub struct PostgresSettings {
    /// Connection string for PostgreSQL
    pub dsn: String,
    /// Name of the table to write reports into
    pub table: String,
}

impl PostgresSettings {
    /// Settings with the default `metrics` table
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            table: "metrics".to_string(),
        }
    }
}

/// Sink that stores reports in PostgreSQL.
pub struct PostgresSink {
    name: String,
    settings: PostgresSettings,
    pool: Option<PgPool>,
    backoff: BackoffPolicy,
}

impl PostgresSink {
    /// Create a new PostgresSink; the connection is established lazily.
    pub fn new(name: impl Into<String>, settings: PostgresSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            pool: None,
            backoff: BackoffPolicy::new(3, Duration::from_secs(5), Duration::from_secs(5)),
        }
    }

    fn pool(&self) -> Result<&PgPool, ContractError> {
        self.pool
            .as_ref()
            .ok_or_else(|| ContractError::uninitialized(&self.name))
    }

    async fn ensure_schema(&self) -> Result<(), ContractError> {
        let pool = self.pool()?;
        let table = &self.settings.table;
        debug!(sink = %self.name, table, "Ensuring metrics table exists");

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id SERIAL PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                url VARCHAR(255) NOT NULL DEFAULT '',
                response_time FLOAT NOT NULL DEFAULT 0,
                status_code INTEGER NOT NULL DEFAULT 0,
                regex_found BOOLEAN
            );
            CREATE INDEX IF NOT EXISTS url_idx ON {table}(url);"
        );

        let run = sqlx::raw_sql(&ddl).execute(pool);
        timeout(STATEMENT_TIMEOUT, run)
            .await
            .map_err(|_| ContractError::sink_deliver(&self.name, "schema statement timed out"))?
            .map_err(|e| ContractError::sink_deliver(&self.name, e.to_string()))?;
        Ok(())
    }

    async fn insert_report(&self, report: &MetricsReport) -> Result<(), ContractError> {
        let pool = self.pool()?;
        let stmt = format!(
            "INSERT INTO {}(url, response_time, status_code, regex_found) VALUES ($1, $2, $3, $4)",
            self.settings.table
        );

        let run = sqlx::query(&stmt)
            .bind(&report.url)
            .bind(report.response_time)
            .bind(i32::from(report.status_code))
            .bind(report.regex_found)
            .execute(pool);
        timeout(STATEMENT_TIMEOUT, run)
            .await
            .map_err(|_| ContractError::sink_deliver(&self.name, "insert timed out"))?
            .map_err(|e| ContractError::sink_deliver(&self.name, e.to_string()))?;
        Ok(())
    }
}

impl MetricSink for PostgresSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "postgres_sink_connect", skip(self), fields(sink = %self.name))]
    async fn connect(&mut self) -> Result<(), ContractError> {
        if self.pool.is_some() {
            return Ok(());
        }
        let dsn = self.settings.dsn.clone();
        let backoff = self.backoff;
        let pool = backoff
            .run("postgres connect", || {
                PgPoolOptions::new().max_connections(1).connect(dsn.as_str())
            })
            .await?;
        debug!(sink = %self.name, "Connected to database");
        self.pool = Some(pool);
        Ok(())
    }

    #[instrument(name = "postgres_sink_start", skip(self), fields(sink = %self.name))]
    async fn start(&mut self) -> Result<(), ContractError> {
        self.connect().await?;
        info!(sink = %self.name, table = %self.settings.table, "Postgres sink started");
        self.ensure_schema().await
    }

    #[instrument(name = "postgres_sink_deliver", skip(self, report), fields(sink = %self.name, url = %report.url))]
    async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError> {
        self.connect().await?;
        debug!(sink = %self.name, ?report, "Storing report");
        self.insert_report(report).await
    }

    #[instrument(name = "postgres_sink_shutdown", skip(self), fields(sink = %self.name))]
    async fn shutdown(&mut self) -> Result<(), ContractError> {
        if let Some(pool) = self.pool.take() {
            if timeout(CLOSE_TIMEOUT, pool.close()).await.is_err() {
                warn!(sink = %self.name, "Pool close timed out");
            }
        }
        info!(sink = %self.name, "Postgres sink shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_without_connect_is_noop() {
        let mut sink = PostgresSink::new(
            "store",
            PostgresSettings::new("postgres://localhost/sitewatch"),
        );
        assert!(sink.shutdown().await.is_ok());
    }

    #[tokio::test]
    async fn test_uninitialized_pool_is_fatal() {
        let sink = PostgresSink::new(
            "store",
            PostgresSettings::new("postgres://localhost/sitewatch"),
        );
        // Internal accessor models the bypassed-guard condition
        let err = sink.pool().unwrap_err();
        assert!(matches!(err, ContractError::UninitializedResource { .. }));
    }

    #[test]
    fn test_default_table_name() {
        let settings = PostgresSettings::new("postgres://localhost/sitewatch");
        assert_eq!(settings.table, "metrics");
    }
}
