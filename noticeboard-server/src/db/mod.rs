//! Database layer - pool, timed executor, checkout, schema
//!
//! # Design Principles
//!
//! - Bounded connection pool (max 20), owned by a single [`Db`] handle
//! - Every statement goes through the timed executor - no bare pool calls
//! - Connection-level failures are signalled, never swallowed; the owner
//!   of the [`FatalSignal`] decides whether to shut down
//! - Checkout hands out exactly one connection per client; release is
//!   consuming, so a client cannot be released twice

pub mod checkout;
mod executor;
pub mod pool;
pub mod repos;
pub mod schema;

use sqlx::postgres::PgRow;
use sqlx::PgPool;
use tokio::sync::watch;

pub use checkout::TxClient;
pub use executor::PgQuery;
pub use pool::create_pool;
pub use repos::{Post, PostRepo};
pub use schema::ensure_schema;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// True when the underlying failure is connection-level rather than
    /// statement-level: the pool may be unusable and the process owner
    /// should decide how to react.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Sqlx(err) => is_fatal_sqlx(err),
        }
    }
}

fn is_fatal_sqlx(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

fn signal_if_fatal(fatal: &watch::Sender<Option<String>>, err: &sqlx::Error) {
    if is_fatal_sqlx(err) {
        fatal.send_replace(Some(err.to_string()));
    }
}

/// Receiver half of the fatal-error channel.
///
/// Held by the server run loop; resolves if the database layer reports a
/// connection-level failure.
pub struct FatalSignal(watch::Receiver<Option<String>>);

impl FatalSignal {
    /// Wait until a fatal database error is reported, returning its text.
    ///
    /// Pends forever if the [`Db`] handle is dropped without ever
    /// reporting one.
    pub async fn fired(&mut self) -> String {
        loop {
            if let Some(message) = self.0.borrow_and_update().clone() {
                return message;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Handle over the connection pool.
///
/// Cheap to clone; all clones share the pool and the fatal-error channel.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
    fatal: watch::Sender<Option<String>>,
}

impl Db {
    /// Wrap a pool, returning the handle and the fatal-signal receiver.
    pub fn new(pool: PgPool) -> (Self, FatalSignal) {
        let (fatal, rx) = watch::channel(None);
        (Self { pool, fatal }, FatalSignal(rx))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a statement against the pool and return its rows.
    ///
    /// Timing and row count are logged at debug; failures are logged at
    /// error, signalled if fatal, and returned unchanged.
    pub async fn fetch_all(&self, query: PgQuery<'_>) -> Result<Vec<PgRow>, DbError> {
        executor::fetch_all(&self.pool, query).await.map_err(|err| {
            signal_if_fatal(&self.fatal, &err);
            DbError::Sqlx(err)
        })
    }

    /// Run a statement against the pool and return the affected-row count.
    pub async fn execute(&self, query: PgQuery<'_>) -> Result<u64, DbError> {
        executor::execute(&self.pool, query).await.map_err(|err| {
            signal_if_fatal(&self.fatal, &err);
            DbError::Sqlx(err)
        })
    }

    /// Check a connection out of the pool for exclusive use.
    ///
    /// The returned client carries a watchdog that warns if it is held
    /// past the checkout threshold; see [`checkout::TxClient`].
    pub async fn checkout(&self) -> Result<TxClient, DbError> {
        let conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                signal_if_fatal(&self.fatal, &err);
                return Err(DbError::Sqlx(err));
            }
        };
        Ok(TxClient::new(conn, self.fatal.clone()))
    }
}
