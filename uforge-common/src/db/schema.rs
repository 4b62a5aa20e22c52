//! Database schema
//!
//! Creates the lexicon, scoring, and validation tables if they don't exist.
//! Uniqueness constraints carry the idempotent-upsert discipline: duplicate
//! insert attempts are no-ops keyed by the unique column.

use crate::Result;
use sqlx::SqlitePool;

/// Initialize all uforge tables
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // Lexicon categories. `words` and `names` are disjoint by construction:
    // seeding routes each entry to exactly one of them.
    for table in ["words", "names"] {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL UNIQUE,
                letter_count INTEGER NOT NULL
            )
            "#,
            table
        ))
        .execute(pool)
        .await?;
    }

    for table in ["common_years", "common_numbers"] {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL UNIQUE
            )
            "#,
            table
        ))
        .execute(pool)
        .await?;
    }

    // Ranked scores awaiting validation. Keyed by username so repeated
    // insert attempts upsert instead of duplicating; consumption removes
    // rows by id.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS high_rated_usernames (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            score REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Archive of every username that ever earned a score. First score wins.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS high_rated_usernames_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            score REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Search-validated usernames with their first accepted result.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS validated_usernames (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            search_result_title TEXT NOT NULL,
            url TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_tables_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        init_tables(&pool).await.expect("First init failed");
        init_tables(&pool).await.expect("Second init failed");

        // All tables present and queryable
        for table in [
            "words",
            "names",
            "common_years",
            "common_numbers",
            "high_rated_usernames",
            "high_rated_usernames_history",
            "validated_usernames",
        ] {
            sqlx::query(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&pool)
                .await
                .unwrap_or_else(|e| panic!("Table {} missing: {}", table, e));
        }
    }
}
