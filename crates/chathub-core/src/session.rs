//! Session-scoped access to the store.
//!
//! A [`SessionScope`] binds a `(bot_id, session_id)` pair once so callers can
//! reach the session's messages, the bot's long-term memory, and the
//! session's configuration without passing ids around:
//!
//! ```ignore
//! let scope = store.scope("bot-001", "sess-abc");
//! scope.messages().add(Role::User, &[Segment::text("hello")]).await?;
//! scope.memory().set("user_name", &json!("Ming")).await?;
//! let length = scope.config().get_or("context_length", json!(20)).await?;
//! ```

use std::collections::BTreeMap;

use chathub_types::chat::Role;
use chathub_types::error::StoreError;
use chathub_types::segment::Segment;
use chathub_types::store::{StoredConfig, StoredMemory, StoredMessage};
use serde_json::Value;

use crate::store::{ConfigStore, MemoryStore, MessageStore};

/// The three store collections behind one handle.
///
/// Generic over the store traits to maintain clean architecture
/// (chathub-core never depends on chathub-infra).
pub struct SessionStore<M: MessageStore, K: MemoryStore, C: ConfigStore> {
    messages: M,
    memory: K,
    config: C,
}

impl<M: MessageStore, K: MemoryStore, C: ConfigStore> SessionStore<M, K, C> {
    pub fn new(messages: M, memory: K, config: C) -> Self {
        Self {
            messages,
            memory,
            config,
        }
    }

    /// Bind a `(bot_id, session_id)` pair.
    pub fn scope(&self, bot_id: impl Into<String>, session_id: impl Into<String>) -> SessionScope<'_, M, K, C> {
        SessionScope {
            store: self,
            bot_id: bot_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Access the message store.
    pub fn message_store(&self) -> &M {
        &self.messages
    }

    /// Access the memory store.
    pub fn memory_store(&self) -> &K {
        &self.memory
    }

    /// Access the config store.
    pub fn config_store(&self) -> &C {
        &self.config
    }
}

/// A store view bound to one bot and session.
pub struct SessionScope<'a, M: MessageStore, K: MemoryStore, C: ConfigStore> {
    store: &'a SessionStore<M, K, C>,
    bot_id: String,
    session_id: String,
}

impl<'a, M: MessageStore, K: MemoryStore, C: ConfigStore> SessionScope<'a, M, K, C> {
    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// This session's messages (short-term context).
    pub fn messages(&self) -> MessageAccessor<'_, M> {
        MessageAccessor {
            store: &self.store.messages,
            bot_id: &self.bot_id,
            session_id: &self.session_id,
        }
    }

    /// The bot's long-term memory, shared across all of its sessions.
    pub fn memory(&self) -> MemoryAccessor<'_, K> {
        MemoryAccessor {
            store: &self.store.memory,
            bot_id: &self.bot_id,
        }
    }

    /// This session's configuration.
    pub fn config(&self) -> ConfigAccessor<'_, C> {
        ConfigAccessor {
            store: &self.store.config,
            bot_id: &self.bot_id,
            session_id: &self.session_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

/// Message log of one session.
pub struct MessageAccessor<'a, M: MessageStore> {
    store: &'a M,
    bot_id: &'a str,
    session_id: &'a str,
}

impl<M: MessageStore> MessageAccessor<'_, M> {
    /// Append a message.
    pub async fn add(&self, role: Role, content: &[Segment]) -> Result<StoredMessage, StoreError> {
        self.store.append(self.bot_id, self.session_id, role, content).await
    }

    /// Messages in insertion order; `limit` keeps only the most recent ones.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<StoredMessage>, StoreError> {
        self.store.list(self.bot_id, self.session_id, limit).await
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.store.count(self.bot_id, self.session_id).await
    }

    /// Delete every message of the session.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        self.store.clear(self.bot_id, self.session_id).await
    }
}

/// Long-term memory of one bot.
pub struct MemoryAccessor<'a, K: MemoryStore> {
    store: &'a K,
    bot_id: &'a str,
}

impl<K: MemoryStore> MemoryAccessor<'_, K> {
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.store.get(self.bot_id, key).await
    }

    /// Get a value, falling back to `default` when the key is absent.
    pub async fn get_or(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Insert or overwrite a value.
    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.store.set(self.bot_id, key, value).await
    }

    pub async fn list_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        self.store.list_all(self.bot_id).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.store.delete(self.bot_id, key).await
    }

    /// Delete every memory of the bot.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        self.store.clear(self.bot_id).await
    }

    pub async fn entry(&self, key: &str) -> Result<Option<StoredMemory>, StoreError> {
        self.store.get_entry(self.bot_id, key).await
    }
}

/// Configuration of one session.
pub struct ConfigAccessor<'a, C: ConfigStore> {
    store: &'a C,
    bot_id: &'a str,
    session_id: &'a str,
}

impl<C: ConfigStore> ConfigAccessor<'_, C> {
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.store.get(self.bot_id, self.session_id, key).await
    }

    /// Get a value, falling back to `default` when the key is absent.
    pub async fn get_or(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.store.set(self.bot_id, self.session_id, key, value).await
    }

    pub async fn list_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        self.store.list_all(self.bot_id, self.session_id).await
    }

    pub async fn clear(&self) -> Result<u64, StoreError> {
        self.store.clear(self.bot_id, self.session_id).await
    }

    pub async fn entry(&self, key: &str) -> Result<Option<StoredConfig>, StoreError> {
        self.store.get_entry(self.bot_id, self.session_id, key).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
