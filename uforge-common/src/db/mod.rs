//! Shared database access
//!
//! Pool initialization and schema creation for the uforge SQLite database.

pub mod schema;

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the uforge database, creating the file and schema if missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    schema::init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize an in-memory pool with the full schema (tests, dry runs)
///
/// Capped at one connection: each in-memory SQLite connection is its own
/// database, so a larger pool would scatter the schema.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    schema::init_tables(&pool).await?;
    Ok(pool)
}
