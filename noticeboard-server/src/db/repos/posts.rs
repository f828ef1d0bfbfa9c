//! Post repository
//!
//! Posts are insert-only: created once, never updated or deleted, read in
//! descending creation order.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::db::{Db, DbError};
use crate::models::PostTitle;

const LIST_POSTS: &str =
    "SELECT id, title, content, created_at FROM posts ORDER BY created_at DESC, id DESC";

const INSERT_POST: &str = "INSERT INTO posts (title, content) VALUES ($1, $2) \
                           RETURNING id, title, content, created_at";

/// Post record from database
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            title: row.get("title"),
            // content column is nullable; surface NULL as the empty string
            content: row.get::<Option<String>, _>("content").unwrap_or_default(),
            created_at: row.get("created_at"),
        }
    }
}

/// Post repository
pub struct PostRepo<'a> {
    db: &'a Db,
}

impl<'a> PostRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List all posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DbError> {
        let rows = self.db.fetch_all(sqlx::query(LIST_POSTS)).await?;
        Ok(rows.iter().map(Post::from_row).collect())
    }

    /// Insert a post and return the stored record.
    ///
    /// The title is validated before it gets here; content defaults are the
    /// caller's concern.
    pub async fn create(&self, title: PostTitle, content: &str) -> Result<Post, DbError> {
        let rows = self
            .db
            .fetch_all(sqlx::query(INSERT_POST).bind(title.as_str()).bind(content))
            .await?;
        let row = rows
            .first()
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))?;
        Ok(Post::from_row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, ensure_schema, Db};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p noticeboard-server -- --ignored

    async fn test_db() -> Db {
        let options = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL required")
            .parse()
            .expect("invalid DATABASE_URL");
        let pool = create_pool(options).await.expect("pool creation failed");
        let (db, _fatal) = Db::new(pool);
        ensure_schema(&db).await.expect("schema init failed");
        db
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn created_post_round_trips() {
        let db = test_db().await;
        let repo = PostRepo::new(&db);

        let title = PostTitle::new("  integration test post  ").expect("valid title");
        let created = repo.create(title, "body").await.expect("insert failed");
        assert_eq!(created.title, "integration test post");
        assert_eq!(created.content, "body");

        let posts = repo.list().await.expect("list failed");
        assert!(posts.iter().any(|p| p.id == created.id));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_orders_newest_first() {
        let db = test_db().await;
        let repo = PostRepo::new(&db);

        let older = repo
            .create(PostTitle::new("older post").expect("valid title"), "")
            .await
            .expect("insert failed");
        let newer = repo
            .create(PostTitle::new("newer post").expect("valid title"), "")
            .await
            .expect("insert failed");

        let ids: Vec<i32> = repo
            .list()
            .await
            .expect("list failed")
            .iter()
            .map(|p| p.id)
            .collect();
        let older_pos = ids.iter().position(|&id| id == older.id).expect("older post listed");
        let newer_pos = ids.iter().position(|&id| id == newer.id).expect("newer post listed");
        assert!(newer_pos < older_pos, "newer post must list before older");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn omitted_content_defaults_to_empty() {
        let db = test_db().await;
        let repo = PostRepo::new(&db);

        let title = PostTitle::new("no content").expect("valid title");
        let created = repo.create(title, "").await.expect("insert failed");
        assert_eq!(created.content, "");
    }
}
