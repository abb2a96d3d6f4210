//! SQLite-backed skater store.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::Money;
use crate::model::Skater;
use crate::model::Stance;
use crate::query::Page;
use crate::query::RecordQuery;
use crate::query::sql;

use super::SkaterStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS skaters (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL,
    stance TEXT NOT NULL,
    stats TEXT NOT NULL,
    deck_price_cents INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

/// SQLite-backed record store.
pub struct SqliteStore {
    client: Client,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;
        Self::init(client).await
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. Data is lost when the store is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::init(client).await
    }

    async fn init(client: Client) -> Result<Self, StoreError> {
        client.conn(|conn| conn.execute(SCHEMA, [])).await?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SkaterStore for SqliteStore {
    async fn list(&self, query: &RecordQuery) -> Result<Page, StoreError> {
        let mut params: Vec<String> = Vec::new();
        let where_clause = match &query.filter {
            Some(filter) => format!(" WHERE {}", sql::filter_to_sql(filter, &mut params)),
            None => String::new(),
        };

        let select = format!(
            "SELECT id, name, email, age, stance, stats, deck_price_cents, created_at
             FROM skaters{} ORDER BY {} LIMIT {} OFFSET {}",
            where_clause,
            sql::order_to_sql(&query.order),
            query.limit,
            query.offset,
        );
        let count = format!("SELECT COUNT(*) FROM skaters{}", where_clause);

        // Slice and count run on the same connection so they observe the
        // same roster.
        let (rows, total) = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(&select)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), RawRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                let total: i64 = conn.query_row(
                    &count,
                    rusqlite::params_from_iter(params.iter()),
                    |row| row.get(0),
                )?;
                Ok((rows, total))
            })
            .await?;

        let records = rows
            .into_iter()
            .map(RawRow::decode)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(records, total as usize))
    }

    async fn fetch_all(&self) -> Result<Vec<Skater>, StoreError> {
        let rows = self
            .client
            .conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, email, age, stance, stats, deck_price_cents, created_at
                     FROM skaters",
                )?;
                let rows = stmt
                    .query_map([], RawRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(RawRow::decode).collect()
    }

    async fn insert(&self, skater: &Skater) -> Result<(), StoreError> {
        let record = skater.clone();
        let cents = record
            .deck_price
            .to_cents()
            .ok_or_else(|| StoreError::decode("deck_price_cents", "price out of range"))?;

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO skaters (id, name, email, age, stance, stats, deck_price_cents, created_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        record.id.to_string(),
                        record.name,
                        record.email,
                        record.age as i64,
                        record.stance.as_str(),
                        record.stats,
                        cents,
                        record.created_at.to_rfc3339(),
                    ],
                )
            })
            .await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let statement = format!(
            "DELETE FROM skaters WHERE id IN ({})",
            vec!["?"; ids.len()].join(", ")
        );

        let removed = self
            .client
            .conn(move |conn| conn.execute(&statement, rusqlite::params_from_iter(ids.iter())))
            .await?;

        Ok(removed)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let total: i64 = self
            .client
            .conn(|conn| conn.query_row("SELECT COUNT(*) FROM skaters", [], |row| row.get(0)))
            .await?;
        Ok(total as usize)
    }
}

/// A row as stored, before field decoding.
struct RawRow {
    id: String,
    name: String,
    email: String,
    age: i64,
    stance: String,
    stats: String,
    deck_price_cents: i64,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            age: row.get(3)?,
            stance: row.get(4)?,
            stats: row.get(5)?,
            deck_price_cents: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn decode(self) -> Result<Skater, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::decode("id", e.to_string()))?;
        let age = u8::try_from(self.age)
            .map_err(|e| StoreError::decode("age", e.to_string()))?;
        let stance = Stance::parse(&self.stance)
            .ok_or_else(|| StoreError::decode("stance", format!("unknown stance '{}'", self.stance)))?;
        let deck_price = Money::from_cents(self.deck_price_cents);
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::decode("created_at", e.to_string()))?
            .with_timezone(&Utc);

        Ok(Skater {
            id,
            name: self.name,
            email: self.email,
            age,
            stance,
            stats: self.stats,
            deck_price,
            created_at,
        })
    }
}
