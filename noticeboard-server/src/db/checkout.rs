//! Transactional client checkout
//!
//! [`Db::checkout`](super::Db::checkout) removes one connection from the
//! pool for exclusive use, e.g. multi-statement transactions. The raw
//! connection is wrapped by composition - never mutated - together with the
//! last statement issued and a watchdog that warns when a checkout is held
//! past the threshold. The watchdog is advisory: it logs once and never
//! reclaims the connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::PgRow;
use sqlx::{Execute, Postgres};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::executor::{self, PgQuery};
use super::{signal_if_fatal, DbError};

/// How long a client may be held before the watchdog warns.
pub const CHECKOUT_WARN_AFTER: Duration = Duration::from_secs(5);

/// Warns once if a checkout outlives the threshold.
struct Watchdog {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

impl Watchdog {
    fn arm(threshold: Duration, last_statement: Arc<Mutex<Option<String>>>) -> Self {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(threshold).await;
            flag.store(true, Ordering::SeqCst);
            let last = last_statement.lock().await.clone();
            match last {
                Some(statement) => tracing::warn!(
                    threshold_secs = threshold.as_secs(),
                    statement,
                    "client checked out longer than threshold"
                ),
                None => tracing::warn!(
                    threshold_secs = threshold.as_secs(),
                    "client checked out longer than threshold, no statement issued"
                ),
            }
        });
        Self { handle, fired }
    }

    fn disarm(&self) {
        self.handle.abort();
    }

    #[cfg(test)]
    fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A connection checked out of the pool for exclusive use.
///
/// Statements run with the same timing and logging as the pool path, and
/// each one is recorded so the watchdog can name it. [`release`] consumes
/// the client, cancels the watchdog, and hands the connection back to the
/// pool; dropping an unreleased client does the same.
///
/// [`release`]: TxClient::release
pub struct TxClient {
    conn: PoolConnection<Postgres>,
    last_statement: Arc<Mutex<Option<String>>>,
    watchdog: Watchdog,
    fatal: watch::Sender<Option<String>>,
}

impl TxClient {
    pub(super) fn new(
        conn: PoolConnection<Postgres>,
        fatal: watch::Sender<Option<String>>,
    ) -> Self {
        let last_statement = Arc::new(Mutex::new(None));
        let watchdog = Watchdog::arm(CHECKOUT_WARN_AFTER, Arc::clone(&last_statement));
        Self {
            conn,
            last_statement,
            watchdog,
            fatal,
        }
    }

    /// Run a statement on this connection and return its rows.
    pub async fn fetch_all(&mut self, query: PgQuery<'_>) -> Result<Vec<PgRow>, DbError> {
        *self.last_statement.lock().await = Some(query.sql().to_owned());
        executor::fetch_all(&mut *self.conn, query)
            .await
            .map_err(|err| {
                signal_if_fatal(&self.fatal, &err);
                DbError::Sqlx(err)
            })
    }

    /// Run a statement on this connection and return the affected-row count.
    pub async fn execute(&mut self, query: PgQuery<'_>) -> Result<u64, DbError> {
        *self.last_statement.lock().await = Some(query.sql().to_owned());
        executor::execute(&mut *self.conn, query)
            .await
            .map_err(|err| {
                signal_if_fatal(&self.fatal, &err);
                DbError::Sqlx(err)
            })
    }

    /// Cancel the watchdog and return the connection to the pool.
    ///
    /// Consuming `self` makes double-release unrepresentable.
    pub fn release(self) {
        self.watchdog.disarm();
        // conn drops here and goes back to the pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn watchdog_fires_past_threshold() {
        let last = Arc::new(Mutex::new(Some("BEGIN".to_string())));
        let watchdog = Watchdog::arm(CHECKOUT_WARN_AFTER, last);

        tokio::time::sleep(CHECKOUT_WARN_AFTER + Duration::from_secs(1)).await;

        assert!(watchdog.fired());
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_watchdog_never_fires() {
        let last = Arc::new(Mutex::new(None));
        let watchdog = Watchdog::arm(CHECKOUT_WARN_AFTER, last);

        watchdog.disarm();
        tokio::time::sleep(CHECKOUT_WARN_AFTER * 2).await;

        assert!(!watchdog.fired());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_watchdog_never_fires() {
        let fired = {
            let last = Arc::new(Mutex::new(None));
            let watchdog = Watchdog::arm(CHECKOUT_WARN_AFTER, last);
            Arc::clone(&watchdog.fired)
        };

        tokio::time::sleep(CHECKOUT_WARN_AFTER * 2).await;

        assert!(!fired.load(Ordering::SeqCst));
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p noticeboard-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn checkout_runs_transaction() {
        use crate::db::{create_pool, Db};

        let options = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL required")
            .parse()
            .expect("invalid DATABASE_URL");
        let pool = create_pool(options).await.expect("pool creation failed");
        let (db, _fatal) = Db::new(pool);

        let mut client = db.checkout().await.expect("checkout failed");
        client
            .execute(sqlx::query("BEGIN"))
            .await
            .expect("begin failed");
        let rows = client
            .fetch_all(sqlx::query("SELECT 1 AS one"))
            .await
            .expect("select failed");
        assert_eq!(rows.len(), 1);
        client
            .execute(sqlx::query("COMMIT"))
            .await
            .expect("commit failed");
        client.release();
    }
}
