//! Lexicon table operations
//!
//! The four categories live in their own tables: `names` and `words`
//! (seeded from a user-provided word list), `common_years` and
//! `common_numbers` (regenerated from fixed families). Seeding routes each
//! entry to exactly one table, keeping the categories disjoint.

use crate::types::FragmentKind;
use sqlx::SqlitePool;
use tracing::info;
use uforge_common::Result;

/// Year range commonly seen in usernames (birth years and similar)
const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1972..=2030;

/// Number families with high occurrence in usernames:
/// lucky numbers, X00, X000, XXX and XXXX patterns
const SPECIAL_NUMBERS: [u32; 43] = [
    33, 44, 55, 77, 88, 99, 89, // lucky numbers
    100, 200, 300, 400, 500, 600, 700, 800, 900, // X00
    1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000, // X000
    111, 222, 333, 444, 555, 666, 777, 888, 999, // XXX
    1111, 2222, 3333, 4444, 5555, 6666, 7777, 8888, 9999, // XXXX
];

fn table_for(kind: FragmentKind) -> &'static str {
    match kind {
        FragmentKind::Name => "names",
        FragmentKind::Word => "words",
        FragmentKind::Year => "common_years",
        FragmentKind::Number => "common_numbers",
    }
}

/// Load one lexicon category
///
/// Names and words come back ordered by length then value, matching the
/// curated dataset ordering; numeric categories keep insertion order.
pub async fn load_category(pool: &SqlitePool, kind: FragmentKind) -> Result<Vec<String>> {
    let query = match kind {
        FragmentKind::Name | FragmentKind::Word => format!(
            "SELECT word FROM {} ORDER BY letter_count, word",
            table_for(kind)
        ),
        FragmentKind::Year | FragmentKind::Number => {
            format!("SELECT word FROM {} ORDER BY id", table_for(kind))
        }
    };

    let rows: Vec<(String,)> = sqlx::query_as(&query).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(word,)| word).collect())
}

/// Import a newline-delimited word list into the names/words tables
///
/// Entries with a leading uppercase letter are names, everything else is a
/// word. Existing entries are left untouched. Returns (names, words) added.
pub async fn seed_wordlist<'a>(
    pool: &SqlitePool,
    lines: impl Iterator<Item = &'a str>,
    overwrite: bool,
) -> Result<(u64, u64)> {
    if overwrite {
        sqlx::query("DELETE FROM names").execute(pool).await?;
        sqlx::query("DELETE FROM words").execute(pool).await?;
    }

    let mut names_added = 0u64;
    let mut words_added = 0u64;

    for line in lines {
        let word = line.trim();
        if word.is_empty() {
            continue;
        }

        let is_name = word.chars().next().is_some_and(|c| c.is_uppercase());
        let table = if is_name { "names" } else { "words" };

        let result = sqlx::query(&format!(
            "INSERT OR IGNORE INTO {} (word, letter_count) VALUES (?, ?)",
            table
        ))
        .bind(word)
        .bind(word.chars().count() as i64)
        .execute(pool)
        .await?;

        if is_name {
            names_added += result.rows_affected();
        } else {
            words_added += result.rows_affected();
        }
    }

    info!(names_added, words_added, "Word list imported");
    Ok((names_added, words_added))
}

/// Rebuild the numeric lexicon tables
///
/// This is the corrective action the dataset retry loop invokes; it is also
/// available directly through the CLI.
pub async fn populate_numeric_tables(pool: &SqlitePool) -> Result<()> {
    for year in YEAR_RANGE {
        sqlx::query("INSERT OR IGNORE INTO common_years (word) VALUES (?)")
            .bind(year.to_string())
            .execute(pool)
            .await?;
    }

    for number in 1..=30u32 {
        sqlx::query("INSERT OR IGNORE INTO common_numbers (word) VALUES (?)")
            .bind(number.to_string())
            .execute(pool)
            .await?;
    }

    for number in SPECIAL_NUMBERS {
        sqlx::query("INSERT OR IGNORE INTO common_numbers (word) VALUES (?)")
            .bind(number.to_string())
            .execute(pool)
            .await?;
    }

    info!("Numeric lexicon tables populated");
    Ok(())
}
