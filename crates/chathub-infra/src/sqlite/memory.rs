//! SQLite long-term memory implementation.
//!
//! Implements `MemoryStore` from `chathub-core`. Values are stored as JSON
//! text and deserialized on read; `(bot_id, key)` is unique.

use std::collections::BTreeMap;

use chathub_core::store::MemoryStore;
use chathub_types::error::StoreError;
use chathub_types::store::StoredMemory;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{decode_value, encode_value, format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `MemoryStore`.
pub struct SqliteMemoryStore {
    pool: DatabasePool,
}

impl SqliteMemoryStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MemoryRow {
    bot_id: String,
    key: String,
    value: String,
    created_at: String,
    updated_at: String,
}

impl MemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            bot_id: row.try_get("bot_id")?,
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_entry(self) -> Result<StoredMemory, StoreError> {
        Ok(StoredMemory {
            bot_id: self.bot_id,
            key: self.key,
            value: decode_value(&self.value)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl MemoryStore for SqliteMemoryStore {
    async fn get(&self, bot_id: &str, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let row = sqlx::query("SELECT value FROM memories WHERE bot_id = ? AND key = ?")
            .bind(bot_id)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let value: String = row.try_get("value").map_err(query_error)?;
                Ok(Some(decode_value(&value)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, bot_id: &str, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let now = format_datetime(&Utc::now());
        let value_str = encode_value(value)?;

        sqlx::query(
            r#"INSERT INTO memories (bot_id, key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (bot_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(bot_id)
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn list_all(&self, bot_id: &str) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        let rows = sqlx::query("SELECT key, value FROM memories WHERE bot_id = ? ORDER BY key")
            .bind(bot_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut entries = BTreeMap::new();
        for row in &rows {
            let key: String = row.try_get("key").map_err(query_error)?;
            let value: String = row.try_get("value").map_err(query_error)?;
            entries.insert(key, decode_value(&value)?);
        }
        Ok(entries)
    }

    async fn delete(&self, bot_id: &str, key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM memories WHERE bot_id = ? AND key = ?")
            .bind(bot_id)
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, bot_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM memories WHERE bot_id = ?")
            .bind(bot_id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }

    async fn get_entry(&self, bot_id: &str, key: &str) -> Result<Option<StoredMemory>, StoreError> {
        let row = sqlx::query("SELECT * FROM memories WHERE bot_id = ? AND key = ?")
            .bind(bot_id)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let memory_row = MemoryRow::from_row(&row).map_err(query_error)?;
                Ok(Some(memory_row.into_entry()?))
            }
            None => Ok(None),
        }
    }
}
