//! Repository Module
//!
//! CRUD and query operations for the kitchen tables. Each repository
//! wraps a [`BaseRepository`] with a cloned connection handle.
//!
//! # ID Convention
//!
//! 全栈统一使用 "table:id" 字符串格式。Repositories accept either the
//! full form or the bare key and normalize with [`record_key`].

pub mod cooking_timer;
pub mod kitchen_order;
pub mod notification;
pub mod order;
pub mod staff;
pub mod workstation;

// Re-exports
pub use cooking_timer::CookingTimerRepository;
pub use kitchen_order::KitchenOrderRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use staff::StaffRepository;
pub use workstation::WorkstationRepository;

use shared::KitchenError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for KitchenError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => KitchenError::NotFound(msg),
            RepoError::Validation(msg) => KitchenError::Validation(msg),
            // Duplicate and Database surface as opaque persistence failures
            other => KitchenError::Persistence(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Shared connection holder for all repositories
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Strip the "table:" prefix from a record id, if present
pub fn record_key(id: &str) -> &str {
    id.split_once(':').map(|(_, key)| key).unwrap_or(id)
}

/// Count row shape for `SELECT count() ... GROUP ALL`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_strips_table_prefix() {
        assert_eq!(record_key("cooking_timer:abc123"), "abc123");
        assert_eq!(record_key("abc123"), "abc123");
    }

    #[test]
    fn repo_errors_map_into_the_domain_taxonomy() {
        let err: KitchenError = RepoError::NotFound("timer x".into()).into();
        assert!(matches!(err, KitchenError::NotFound(_)));

        let err: KitchenError = RepoError::Database("io".into()).into();
        assert!(matches!(err, KitchenError::Persistence(_)));
    }
}
