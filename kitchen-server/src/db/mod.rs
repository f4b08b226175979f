//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). One database per work dir;
//! repositories own cheap clones of the connection handle.

pub mod models;
pub mod repository;

use repository::{RepoError, RepoResult};
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "brigade";
const DATABASE: &str = "kitchen";

/// Open the embedded database at `path` and select the kitchen namespace
pub async fn open(path: impl AsRef<Path>) -> RepoResult<Surreal<Db>> {
    let path = path.as_ref();
    let endpoint = path.display().to_string();
    let db = Surreal::new::<RocksDb>(endpoint.as_str())
        .await
        .map_err(|e| RepoError::Database(format!("Failed to open database: {}", e)))?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    tracing::info!(path = %path.display(), "Database opened (SurrealDB embedded)");
    Ok(db)
}
