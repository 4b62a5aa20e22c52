//! Validated username table operations

use crate::types::ValidationResult;
use sqlx::SqlitePool;
use uforge_common::Result;

/// A final-report row: validated username joined with its archived score
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub username: String,
    pub score: f64,
    pub title: String,
    pub url: String,
}

/// Persist accepted validation results
///
/// Keyed by unique username; a username validated in an earlier cycle keeps
/// its first accepted search result.
pub async fn upsert_validated(pool: &SqlitePool, results: &[ValidationResult]) -> Result<()> {
    for result in results {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO validated_usernames (username, search_result_title, url)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&result.candidate)
        .bind(&result.title)
        .bind(&result.url)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Count of validated usernames
pub async fn validated_count(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM validated_usernames")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Final production report: validated usernames with their archived scores,
/// best first
pub async fn final_report(pool: &SqlitePool, limit: u32) -> Result<Vec<ReportRow>> {
    let rows: Vec<(String, f64, String, String)> = sqlx::query_as(
        r#"
        SELECT v.username, h.score, v.search_result_title, v.url
        FROM validated_usernames v
        INNER JOIN high_rated_usernames_history h ON v.username = h.username
        ORDER BY h.score DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(username, score, title, url)| ReportRow {
            username,
            score,
            title,
            url,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::scores;
    use crate::types::AggregatedScore;
    use uforge_common::db::init_memory_pool;

    fn result(candidate: &str, title: &str, url: &str) -> ValidationResult {
        ValidationResult {
            candidate: candidate.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            matched: true,
        }
    }

    #[tokio::test]
    async fn test_upsert_validated_unique_username() {
        let pool = init_memory_pool().await.unwrap();

        upsert_validated(&pool, &[result("x", "First", "https://example.com/1")])
            .await
            .unwrap();
        upsert_validated(&pool, &[result("x", "Second", "https://example.com/2")])
            .await
            .unwrap();

        assert_eq!(validated_count(&pool).await.unwrap(), 1);

        let row: (String,) =
            sqlx::query_as("SELECT search_result_title FROM validated_usernames WHERE username = ?")
                .bind("x")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, "First");
    }

    #[tokio::test]
    async fn test_final_report_joins_history() {
        let pool = init_memory_pool().await.unwrap();

        scores::archive_scores(
            &pool,
            &[
                AggregatedScore {
                    candidate: "high".to_string(),
                    average: 0.9,
                },
                AggregatedScore {
                    candidate: "low".to_string(),
                    average: 0.3,
                },
            ],
        )
        .await
        .unwrap();

        upsert_validated(
            &pool,
            &[
                result("low", "Low page", "https://example.com/low"),
                result("high", "High page", "https://example.com/high"),
                result("unscored", "No history", "https://example.com/none"),
            ],
        )
        .await
        .unwrap();

        let report = final_report(&pool, 10).await.unwrap();
        // Only usernames with archived scores appear, best first
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].username, "high");
        assert!((report[0].score - 0.9).abs() < 1e-9);
        assert_eq!(report[1].username, "low");
    }
}
