//! Route groups, one module per endpoint family

pub mod echo;
pub mod health;
pub mod posts;
