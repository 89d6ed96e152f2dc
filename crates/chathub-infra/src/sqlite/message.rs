//! SQLite message log implementation.
//!
//! Implements `MessageStore` from `chathub-core`. The auto-increment `seq`
//! column is the ordering key, so insertion order survives identical
//! timestamps. Segment lists are stored as JSON text.

use chathub_core::store::MessageStore;
use chathub_types::chat::Role;
use chathub_types::error::StoreError;
use chathub_types::segment::Segment;
use chathub_types::store::StoredMessage;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `MessageStore`.
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    seq: i64,
    bot_id: String,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            seq: row.try_get("seq")?,
            bot_id: row.try_get("bot_id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, StoreError> {
        let role: Role = self.role.parse().map_err(StoreError::Serialization)?;
        let content: Vec<Segment> = serde_json::from_str(&self.content)
            .map_err(|e| StoreError::Serialization(format!("invalid message content: {e}")))?;

        Ok(StoredMessage {
            seq: self.seq,
            bot_id: self.bot_id,
            session_id: self.session_id,
            role,
            content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MessageStore implementation
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    async fn append(
        &self,
        bot_id: &str,
        session_id: &str,
        role: Role,
        content: &[Segment],
    ) -> Result<StoredMessage, StoreError> {
        let created_at = Utc::now();
        let content_json = serde_json::to_string(content)
            .map_err(|e| StoreError::Serialization(format!("failed to serialize content: {e}")))?;

        let result = sqlx::query(
            r#"INSERT INTO messages (bot_id, session_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(bot_id)
        .bind(session_id)
        .bind(role.to_string())
        .bind(&content_json)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(StoredMessage {
            seq: result.last_insert_rowid(),
            bot_id: bot_id.to_string(),
            session_id: session_id.to_string(),
            role,
            content: content.to_vec(),
            created_at,
        })
    }

    async fn list(
        &self,
        bot_id: &str,
        session_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        // A negative LIMIT means "no limit" in SQLite.
        let limit = limit.map_or(-1, i64::from);

        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT * FROM messages
                   WHERE bot_id = ? AND session_id = ?
                   ORDER BY seq DESC
                   LIMIT ?
               ) ORDER BY seq ASC"#,
        )
        .bind(bot_id)
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(query_error)?;
            messages.push(r.into_message()?);
        }
        Ok(messages)
    }

    async fn count(&self, bot_id: &str, session_id: &str) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM messages WHERE bot_id = ? AND session_id = ?")
            .bind(bot_id)
            .bind(session_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let n: i64 = row.try_get("n").map_err(query_error)?;
        Ok(n as u64)
    }

    async fn clear(&self, bot_id: &str, session_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE bot_id = ? AND session_id = ?")
            .bind(bot_id)
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }
}
