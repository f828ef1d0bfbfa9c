//! Repository implementations for database access
//!
//! Repositories borrow the [`Db`](super::Db) handle so every statement
//! goes through the timed executor.

pub mod posts;

pub use posts::{Post, PostRepo};
