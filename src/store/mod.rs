// src/store/mod.rs

//! Scan history persistence.
//!
//! The HTTP layer only needs two operations: append one record and read the
//! newest records of one user. `SqliteHistoryStore` is the production backend.

mod sqlite;

pub use self::sqlite::SqliteHistoryStore;

use async_trait::async_trait;

use crate::core::models::{HistoryRecord, NewHistoryRecord};
use crate::error::ReconResult;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one record and returns it as stored.
    async fn insert(&self, record: NewHistoryRecord) -> ReconResult<HistoryRecord>;

    /// Returns at most `limit` records owned by `user_id`, newest first.
    async fn recent_for_user(&self, user_id: &str, limit: usize) -> ReconResult<Vec<HistoryRecord>>;
}
