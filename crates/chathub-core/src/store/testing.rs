//! In-process store doubles for unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chathub_types::chat::Role;
use chathub_types::error::StoreError;
use chathub_types::segment::Segment;
use chathub_types::store::{StoredConfig, StoredMemory, StoredMessage};
use chrono::Utc;
use serde_json::Value;

use super::{ConfigStore, MemoryStore, MessageStore};
use crate::session::SessionStore;

#[derive(Default)]
struct State {
    next_seq: i64,
    messages: Vec<StoredMessage>,
    memories: BTreeMap<(String, String), StoredMemory>,
    configs: BTreeMap<(String, String, String), StoredConfig>,
}

/// Mutex-guarded maps implementing every store trait.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

pub type TestSessionStore = SessionStore<InMemoryStore, InMemoryStore, InMemoryStore>;

pub fn memory_session_store() -> Arc<TestSessionStore> {
    Arc::new(SessionStore::new(
        InMemoryStore::default(),
        InMemoryStore::default(),
        InMemoryStore::default(),
    ))
}

impl MessageStore for InMemoryStore {
    async fn append(
        &self,
        bot_id: &str,
        session_id: &str,
        role: Role,
        content: &[Segment],
    ) -> Result<StoredMessage, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.next_seq += 1;
        let message = StoredMessage {
            seq: state.next_seq,
            bot_id: bot_id.to_string(),
            session_id: session_id.to_string(),
            role,
            content: content.to_vec(),
            created_at: Utc::now(),
        };
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn list(
        &self,
        bot_id: &str,
        session_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let state = self.state.lock().unwrap();
        let rows: Vec<StoredMessage> = state
            .messages
            .iter()
            .filter(|m| m.bot_id == bot_id && m.session_id == session_id)
            .cloned()
            .collect();
        let skip = match limit {
            Some(limit) => rows.len().saturating_sub(limit as usize),
            None => 0,
        };
        Ok(rows.into_iter().skip(skip).collect())
    }

    async fn count(&self, bot_id: &str, session_id: &str) -> Result<u64, StoreError> {
        Ok(MessageStore::list(self, bot_id, session_id, None).await?.len() as u64)
    }

    async fn clear(&self, bot_id: &str, session_id: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.messages.len();
        state
            .messages
            .retain(|m| !(m.bot_id == bot_id && m.session_id == session_id));
        Ok((before - state.messages.len()) as u64)
    }
}

impl MemoryStore for InMemoryStore {
    async fn get(&self, bot_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(MemoryStore::get_entry(self, bot_id, key).await?.map(|e| e.value))
    }

    async fn set(&self, bot_id: &str, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        state
            .memories
            .entry((bot_id.to_string(), key.to_string()))
            .and_modify(|e| {
                e.value = value.clone();
                e.updated_at = now;
            })
            .or_insert_with(|| StoredMemory {
                bot_id: bot_id.to_string(),
                key: key.to_string(),
                value: value.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn list_all(&self, bot_id: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .memories
            .values()
            .filter(|e| e.bot_id == bot_id)
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect())
    }

    async fn delete(&self, bot_id: &str, key: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .memories
            .remove(&(bot_id.to_string(), key.to_string()))
            .is_some())
    }

    async fn clear(&self, bot_id: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.memories.len();
        state.memories.retain(|(bot, _), _| bot != bot_id);
        Ok((before - state.memories.len()) as u64)
    }

    async fn get_entry(&self, bot_id: &str, key: &str) -> Result<Option<StoredMemory>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .memories
            .get(&(bot_id.to_string(), key.to_string()))
            .cloned())
    }
}

impl ConfigStore for InMemoryStore {
    async fn get(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        Ok(ConfigStore::get_entry(self, bot_id, session_id, key)
            .await?
            .map(|e| e.value))
    }

    async fn set(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
        value: &Value,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        state
            .configs
            .entry((bot_id.to_string(), session_id.to_string(), key.to_string()))
            .and_modify(|e| {
                e.value = value.clone();
                e.updated_at = now;
            })
            .or_insert_with(|| StoredConfig {
                bot_id: bot_id.to_string(),
                session_id: session_id.to_string(),
                key: key.to_string(),
                value: value.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn list_all(
        &self,
        bot_id: &str,
        session_id: &str,
    ) -> Result<BTreeMap<String, Value>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .configs
            .values()
            .filter(|e| e.bot_id == bot_id && e.session_id == session_id)
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect())
    }

    async fn clear(&self, bot_id: &str, session_id: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.configs.len();
        state
            .configs
            .retain(|(bot, session, _), _| !(bot == bot_id && session == session_id));
        Ok((before - state.configs.len()) as u64)
    }

    async fn get_entry(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
    ) -> Result<Option<StoredConfig>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .configs
            .get(&(bot_id.to_string(), session_id.to_string(), key.to_string()))
            .cloned())
    }
}

/// A store whose every operation fails, for exercising error paths.
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Connection("store unavailable".to_string())
}

impl MessageStore for UnavailableStore {
    async fn append(&self, _: &str, _: &str, _: Role, _: &[Segment]) -> Result<StoredMessage, StoreError> {
        Err(unavailable())
    }

    async fn list(&self, _: &str, _: &str, _: Option<u32>) -> Result<Vec<StoredMessage>, StoreError> {
        Err(unavailable())
    }

    async fn count(&self, _: &str, _: &str) -> Result<u64, StoreError> {
        Err(unavailable())
    }

    async fn clear(&self, _: &str, _: &str) -> Result<u64, StoreError> {
        Err(unavailable())
    }
}

impl MemoryStore for UnavailableStore {
    async fn get(&self, _: &str, _: &str) -> Result<Option<Value>, StoreError> {
        Err(unavailable())
    }

    async fn set(&self, _: &str, _: &str, _: &Value) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_all(&self, _: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _: &str, _: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn clear(&self, _: &str) -> Result<u64, StoreError> {
        Err(unavailable())
    }

    async fn get_entry(&self, _: &str, _: &str) -> Result<Option<StoredMemory>, StoreError> {
        Err(unavailable())
    }
}

impl ConfigStore for UnavailableStore {
    async fn get(&self, _: &str, _: &str, _: &str) -> Result<Option<Value>, StoreError> {
        Err(unavailable())
    }

    async fn set(&self, _: &str, _: &str, _: &str, _: &Value) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_all(&self, _: &str, _: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        Err(unavailable())
    }

    async fn clear(&self, _: &str, _: &str) -> Result<u64, StoreError> {
        Err(unavailable())
    }

    async fn get_entry(&self, _: &str, _: &str, _: &str) -> Result<Option<StoredConfig>, StoreError> {
        Err(unavailable())
    }
}

pub fn unavailable_session_store() -> Arc<SessionStore<UnavailableStore, UnavailableStore, UnavailableStore>> {
    Arc::new(SessionStore::new(UnavailableStore, UnavailableStore, UnavailableStore))
}
