//! Score table operations
//!
//! `high_rated_usernames` holds ranked candidates awaiting validation;
//! `high_rated_usernames_history` archives every username that ever earned
//! a score, surviving consumption of the working rows.

use crate::types::{AggregatedScore, ScoreRecord};
use sqlx::SqlitePool;
use uforge_common::Result;

/// Upsert a ranked score batch
///
/// Re-scoring an existing username updates its score in place, keeping the
/// original row id.
pub async fn upsert_scores(pool: &SqlitePool, scores: &[AggregatedScore]) -> Result<()> {
    for entry in scores {
        sqlx::query(
            r#"
            INSERT INTO high_rated_usernames (username, score)
            VALUES (?, ?)
            ON CONFLICT(username) DO UPDATE SET
                score = excluded.score
            "#,
        )
        .bind(&entry.candidate)
        .bind(entry.average)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Archive a score batch into the history table
///
/// The first recorded score for a username wins; later batches are no-ops
/// for usernames already archived.
pub async fn archive_scores(pool: &SqlitePool, scores: &[AggregatedScore]) -> Result<()> {
    for entry in scores {
        sqlx::query(
            "INSERT OR IGNORE INTO high_rated_usernames_history (username, score) VALUES (?, ?)",
        )
        .bind(&entry.candidate)
        .bind(entry.average)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Fetch the top-scored records, highest first
pub async fn top_scores(pool: &SqlitePool, limit: u32) -> Result<Vec<ScoreRecord>> {
    let rows: Vec<(i64, String, f64)> = sqlx::query_as(
        "SELECT id, username, score FROM high_rated_usernames ORDER BY score DESC, id LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, username, score)| ScoreRecord {
            id,
            username,
            score,
        })
        .collect())
}

/// Remove consumed score records by id
pub async fn remove_scores(pool: &SqlitePool, ids: &[i64]) -> Result<()> {
    for id in ids {
        sqlx::query("DELETE FROM high_rated_usernames WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uforge_common::db::init_memory_pool;

    fn score(candidate: &str, average: f64) -> AggregatedScore {
        AggregatedScore {
            candidate: candidate.to_string(),
            average,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_top_ordering() {
        let pool = init_memory_pool().await.unwrap();

        upsert_scores(&pool, &[score("low", 0.2), score("high", 0.9), score("mid", 0.5)])
            .await
            .unwrap();

        let top = top_scores(&pool, 2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username, "high");
        assert_eq!(top[1].username, "mid");
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let pool = init_memory_pool().await.unwrap();

        upsert_scores(&pool, &[score("x", 0.4)]).await.unwrap();
        let before = top_scores(&pool, 10).await.unwrap();

        upsert_scores(&pool, &[score("x", 0.8)]).await.unwrap();
        let after = top_scores(&pool, 10).await.unwrap();

        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, before[0].id);
        assert!((after[0].score - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_remove_consumes_records() {
        let pool = init_memory_pool().await.unwrap();

        upsert_scores(&pool, &[score("a", 0.9), score("b", 0.8)]).await.unwrap();
        let top = top_scores(&pool, 10).await.unwrap();
        let ids: Vec<i64> = top.iter().map(|r| r.id).collect();

        remove_scores(&pool, &ids).await.unwrap();
        assert!(top_scores(&pool, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archive_keeps_first_score() {
        let pool = init_memory_pool().await.unwrap();

        archive_scores(&pool, &[score("x", 0.6)]).await.unwrap();
        archive_scores(&pool, &[score("x", 0.9)]).await.unwrap();

        let row: (f64,) =
            sqlx::query_as("SELECT score FROM high_rated_usernames_history WHERE username = ?")
                .bind("x")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!((row.0 - 0.6).abs() < 1e-9);
    }
}
