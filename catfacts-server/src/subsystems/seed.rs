//! Fact table seeding (`catfacts-server --seed FILE`)
//!
//! Reads one fact per non-empty line and replaces the table contents in a single
//! transaction, so ids stay dense from 1 and match the count read at startup.

use anyhow::Result;
use catfacts_core::config::validate_table_name;
use catfacts_core::FactRecord;
use sqlx::PgPool;

/// Parse a seed file: one fact per line, blank lines ignored.
pub fn parse_facts(text: &str) -> Vec<FactRecord> {
    FactRecord::numbered(text.lines())
}

/// Create the table if needed and replace its rows with `records`.
pub async fn seed_facts(pool: &PgPool, table: &str, records: &[FactRecord]) -> Result<u64> {
    validate_table_name(table)?;

    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (id BIGINT PRIMARY KEY, fact TEXT NOT NULL)",
        table
    ))
    .execute(&mut *tx)
    .await?;

    sqlx::query(&format!("DELETE FROM {}", table))
        .execute(&mut *tx)
        .await?;

    let insert_sql = format!("INSERT INTO {} (id, fact) VALUES ($1, $2)", table);
    let mut inserted = 0u64;
    for record in records {
        inserted += sqlx::query(&insert_sql)
            .bind(record.id)
            .bind(&record.fact)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    tracing::info!(table, inserted, "Seeded fact table");
    Ok(inserted)
}

/// Read `path` and seed `table` from it.
pub async fn seed_from_file(pool: &PgPool, table: &str, path: &str) -> Result<u64> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read seed file {}: {}", path, e))?;
    let records = parse_facts(&text);
    if records.is_empty() {
        anyhow::bail!("Seed file {} contains no facts", path);
    }
    seed_facts(pool, table, &records).await
}
