//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit limits: connections are created lazily up
//! to the maximum, closed after the idle timeout, and acquisition fails if
//! no connection can be established within the acquire timeout.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Maximum concurrent connections in the pool.
pub const MAX_CONNECTIONS: u32 = 20;

/// How long an unused connection stays open before being closed.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait when establishing a connection.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Create a PostgreSQL connection pool.
///
/// Every successful connect is logged.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
pub async fn create_pool(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .idle_timeout(IDLE_TIMEOUT)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .after_connect(|_conn, _meta| {
            Box::pin(async {
                tracing::info!("connected to PostgreSQL");
                Ok::<_, sqlx::Error>(())
            })
        })
        .connect_with(options)
        .await
}
