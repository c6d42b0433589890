//! Fact store — key-value lookup of fact text by 1-based integer id
//!
//! Provides a `FactStore` trait with implementations for:
//! - **Postgres** — one table, `id BIGINT PRIMARY KEY`, `fact TEXT NOT NULL`
//! - **Memory** — a fixed list, used by tests and local harnesses
//!
//! A missing id is a normal outcome (`Ok(None)`), never an error.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::config::validate_table_name;
use crate::error::CatFactsError;

// ============================================================================
// FactStore trait
// ============================================================================

#[async_trait]
pub trait FactStore: Send + Sync {
    /// Total number of stored facts.
    async fn count(&self) -> Result<i64, CatFactsError>;

    /// Fact text for `id`, or `None` when no such record exists.
    async fn get(&self, id: i64) -> Result<Option<String>, CatFactsError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Postgres
// ============================================================================

pub struct PgFactStore {
    pool: PgPool,
    table: String,
    count_sql: String,
    get_sql: String,
}

impl PgFactStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, CatFactsError> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            count_sql: format!("SELECT COUNT(*) FROM {}", table),
            get_sql: format!("SELECT fact FROM {} WHERE id = $1", table),
            pool,
            table,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl FactStore for PgFactStore {
    async fn count(&self) -> Result<i64, CatFactsError> {
        let count: i64 = sqlx::query_scalar(&self.count_sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn get(&self, id: i64) -> Result<Option<String>, CatFactsError> {
        let fact: Option<String> = sqlx::query_scalar(&self.get_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fact)
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryFactStore {
    facts: Vec<String>,
}

impl MemoryFactStore {
    pub fn new<I, S>(facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            facts: facts.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl FactStore for MemoryFactStore {
    async fn count(&self) -> Result<i64, CatFactsError> {
        Ok(self.facts.len() as i64)
    }

    async fn get(&self, id: i64) -> Result<Option<String>, CatFactsError> {
        let index = match usize::try_from(id) {
            Ok(id) if id >= 1 => id - 1,
            _ => return Ok(None),
        };
        Ok(self.facts.get(index).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
