//! Infrastructure layer for Chat Hub.
//!
//! Contains the SQLite implementations of the store traits defined in
//! `chathub-core`, plus configuration loading and data directory resolution.

pub mod config;
pub mod sqlite;

use chathub_core::session::SessionStore;

use sqlite::config::SqliteConfigStore;
use sqlite::memory::SqliteMemoryStore;
use sqlite::message::SqliteMessageStore;
use sqlite::pool::DatabasePool;

/// Session store backed by SQLite for all three collections.
pub type SqliteSessionStore = SessionStore<SqliteMessageStore, SqliteMemoryStore, SqliteConfigStore>;

/// Build a [`SqliteSessionStore`] whose collections share `pool`.
pub fn sqlite_session_store(pool: &DatabasePool) -> SqliteSessionStore {
    SessionStore::new(
        SqliteMessageStore::new(pool.clone()),
        SqliteMemoryStore::new(pool.clone()),
        SqliteConfigStore::new(pool.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chathub_core::hub::Hub;
    use chathub_types::chat::{EventType, Role};
    use chathub_types::client;
    use serde_json::json;

    use crate::sqlite::test_support::test_pool;

    #[tokio::test]
    async fn test_hub_over_sqlite() {
        let pool = test_pool().await;
        let hub = Hub::new(Arc::new(sqlite_session_store(&pool)));
        hub.register_placeholder("b1", "ok", true).unwrap();

        let event = hub.chat(client::chat("b1", "s1", "hi")).await;
        assert_eq!(event.event, EventType::Message);

        let log = hub.session("b1", "s1").messages().list(None).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Role::User);
        assert_eq!(log[1].content[0].as_text(), Some("ok"));

        let result = hub.command(&client::set_context_length("b1", "s1", 12)).await;
        assert!(result.success);
        assert_eq!(
            hub.session("b1", "s1").config().get("context_length").await.unwrap(),
            Some(json!(12))
        );

        let result = hub.command(&client::clear_context("b1", "s1")).await;
        assert_eq!(result.data.unwrap()["cleared_messages"], json!(2));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_error_event() {
        let pool = test_pool().await;
        let hub = Hub::new(Arc::new(sqlite_session_store(&pool)));
        hub.register_placeholder("b1", "ok", true).unwrap();
        pool.close().await;

        let event = hub.chat(client::chat("b1", "s1", "hi")).await;
        assert!(event.is_error());

        let result = hub.command(&client::clear_memory("b1", "s1")).await;
        assert!(!result.success);
    }
}
