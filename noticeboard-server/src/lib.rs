//! noticeboard-server: HTTP service over a PostgreSQL-backed posts table
//!
//! The interesting part lives in [`db`]: a bounded connection pool, a timed
//! query executor, transactional client checkout with an advisory watchdog,
//! and idempotent schema initialization. The [`http`] module exposes the
//! echo and posts endpoints on top of it.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use config::DbConfig;
pub use db::{Db, DbError, FatalSignal};
pub use http::server::{run_server, ServerConfig, ServerError};
pub use state::AppState;
