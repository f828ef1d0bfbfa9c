//! Timed statement execution
//!
//! Every statement in the crate funnels through these helpers, whether it
//! runs against the pool or a checked-out connection. Success logs the
//! statement, wall-clock duration, and row count at debug; failure logs at
//! error and returns the error unchanged. No retries.

use std::time::Instant;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Execute, PgExecutor, Postgres};

/// A bound positional-parameter statement, ready to run.
pub type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

pub(crate) async fn fetch_all<'e, E>(
    executor: E,
    query: PgQuery<'_>,
) -> Result<Vec<PgRow>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = query.sql();
    let started = Instant::now();
    match query.fetch_all(executor).await {
        Ok(rows) => {
            log_success(sql, started, rows.len() as u64);
            Ok(rows)
        }
        Err(err) => {
            log_failure(sql, &err);
            Err(err)
        }
    }
}

pub(crate) async fn execute<'e, E>(executor: E, query: PgQuery<'_>) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = query.sql();
    let started = Instant::now();
    match query.execute(executor).await {
        Ok(result) => {
            log_success(sql, started, result.rows_affected());
            Ok(result.rows_affected())
        }
        Err(err) => {
            log_failure(sql, &err);
            Err(err)
        }
    }
}

fn log_success(sql: &str, started: Instant, rows: u64) {
    tracing::debug!(
        statement = sql,
        duration_ms = started.elapsed().as_millis() as u64,
        rows,
        "executed statement"
    );
}

fn log_failure(sql: &str, err: &sqlx::Error) {
    tracing::error!(statement = sql, error = %err, "statement failed");
}
