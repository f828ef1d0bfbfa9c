//! Schema initialization
//!
//! One idempotent statement, safe to run on every request and safe to race:
//! the engine guarantees CREATE TABLE IF NOT EXISTS is atomic.

use super::{Db, DbError};

const CREATE_POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id SERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    content TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Ensure the posts table exists.
///
/// On failure the error is logged by the executor and returned; callers at
/// the HTTP boundary are expected to log and proceed, since a pre-existing
/// table still serves.
pub async fn ensure_schema(db: &Db) -> Result<(), DbError> {
    db.execute(sqlx::query(CREATE_POSTS_TABLE)).await?;
    tracing::debug!("posts schema ensured");
    Ok(())
}
