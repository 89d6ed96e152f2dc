//! SQLite session configuration implementation.
//!
//! Implements `ConfigStore` from `chathub-core`, keyed by
//! `(bot_id, session_id, key)` in the `session_configs` table.

use std::collections::BTreeMap;

use chathub_core::store::ConfigStore;
use chathub_types::error::StoreError;
use chathub_types::store::StoredConfig;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{decode_value, encode_value, format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `ConfigStore`.
pub struct SqliteConfigStore {
    pool: DatabasePool,
}

impl SqliteConfigStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConfigRow {
    bot_id: String,
    session_id: String,
    key: String,
    value: String,
    created_at: String,
    updated_at: String,
}

impl ConfigRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            bot_id: row.try_get("bot_id")?,
            session_id: row.try_get("session_id")?,
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_entry(self) -> Result<StoredConfig, StoreError> {
        Ok(StoredConfig {
            bot_id: self.bot_id,
            session_id: self.session_id,
            key: self.key,
            value: decode_value(&self.value)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl ConfigStore for SqliteConfigStore {
    async fn get(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let row = sqlx::query(
            "SELECT value FROM session_configs WHERE bot_id = ? AND session_id = ? AND key = ?",
        )
        .bind(bot_id)
        .bind(session_id)
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

    async fn set(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let now = format_datetime(&Utc::now());
        let value_str = encode_value(value)?;

        sqlx::query(
            r#"INSERT INTO session_configs (bot_id, session_id, key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (bot_id, session_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(bot_id)
        .bind(session_id)
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn list_all(
        &self,
        bot_id: &str,
        session_id: &str,
    ) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        let rows = sqlx::query(
            "SELECT key, value FROM session_configs WHERE bot_id = ? AND session_id = ? ORDER BY key",
        )
        .bind(bot_id)
        .bind(session_id)
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

    async fn clear(&self, bot_id: &str, session_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM session_configs WHERE bot_id = ? AND session_id = ?")
            .bind(bot_id)
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }

    async fn get_entry(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
    ) -> Result<Option<StoredConfig>, StoreError> {
        let row = sqlx::query(
            "SELECT * FROM session_configs WHERE bot_id = ? AND session_id = ? AND key = ?",
        )
        .bind(bot_id)
        .bind(session_id)
        .bind(key)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => {
                let config_row = ConfigRow::from_row(&row).map_err(query_error)?;
                Ok(Some(config_row.into_entry()?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_set_scoped_to_session() {
        let store = SqliteConfigStore::new(test_pool().await);

        store.set("b1", "s1", "context_length", &json!(30)).await.unwrap();

        assert_eq!(
            store.get("b1", "s1", "context_length").await.unwrap(),
            Some(json!(30))
        );
        assert!(store.get("b1", "s2", "context_length").await.unwrap().is_none());
        assert!(store.get("b2", "s1", "context_length").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts_single_row() {
        let pool = test_pool().await;
        let store = SqliteConfigStore::new(pool.clone());

        store.set("b1", "s1", "mode", &json!("fast")).await.unwrap();
        store.set("b1", "s1", "mode", &json!("slow")).await.unwrap();

        let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM session_configs")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(rows.0, 1);

        let entry = store.get_entry("b1", "s1", "mode").await.unwrap().unwrap();
        assert_eq!(entry.value, json!("slow"));
        assert_eq!(entry.session_id, "s1");
    }

    #[tokio::test]
    async fn test_list_all_and_clear() {
        let store = SqliteConfigStore::new(test_pool().await);
        store.set("b1", "s1", "a", &json!(1)).await.unwrap();
        store.set("b1", "s1", "b", &json!([true])).await.unwrap();
        store.set("b1", "s2", "a", &json!(2)).await.unwrap();

        let all = store.list_all("b1", "s1").await.unwrap();
        assert_eq!(
            all,
            BTreeMap::from([("a".to_string(), json!(1)), ("b".to_string(), json!([true]))])
        );

        assert_eq!(store.clear("b1", "s1").await.unwrap(), 2);
        assert!(store.list_all("b1", "s1").await.unwrap().is_empty());
        assert_eq!(store.get("b1", "s2", "a").await.unwrap(), Some(json!(2)));
    }
}
