// src/store/sqlite.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

use super::HistoryStore;
use crate::core::models::{HistoryRecord, NewHistoryRecord, ProbeResult};
use crate::error::ReconResult;

pub struct SqliteHistoryStore {
    pool: Pool<Sqlite>,
}

impl SqliteHistoryStore {
    /// Opens (creating if needed) the database at `database_url` and ensures the schema.
    ///
    /// An in-memory URL only stays coherent with `max_connections == 1`, since
    /// every connection would otherwise see its own empty database.
    pub async fn connect(database_url: &str, max_connections: u32) -> ReconResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(database_url, "History store ready.");
        Ok(store)
    }

    async fn init_schema(&self) -> ReconResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS scan_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                domain TEXT NOT NULL,
                results TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_scan_history_user_created
                ON scan_history (user_id, created_at DESC);",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn insert(&self, record: NewHistoryRecord) -> ReconResult<HistoryRecord> {
        let results_json = serde_json::to_string(&record.results)?;
        let created_at = Utc::now();

        let id = sqlx::query(
            "INSERT INTO scan_history (user_id, domain, results, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.user_id)
        .bind(&record.domain)
        .bind(&results_json)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, user_id = %record.user_id, domain = %record.domain, "History record stored.");
        Ok(HistoryRecord {
            id,
            user_id: record.user_id,
            domain: record.domain,
            results: record.results,
            created_at,
        })
    }

    async fn recent_for_user(&self, user_id: &str, limit: usize) -> ReconResult<Vec<HistoryRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "SELECT id, user_id, domain, results, created_at FROM scan_history
                WHERE user_id = ?
                ORDER BY created_at DESC, id DESC
                LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> ReconResult<HistoryRecord> {
                let results: String = row.try_get("results")?;
                let results: Vec<ProbeResult> = serde_json::from_str(&results)?;
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                Ok(HistoryRecord {
                    id: row.try_get("id")?,
                    user_id: row.try_get("user_id")?,
                    domain: row.try_get("domain")?,
                    results,
                    created_at,
                })
            })
            .collect()
    }
}
