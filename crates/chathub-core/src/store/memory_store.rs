//! Long-term memory trait.

use std::collections::BTreeMap;

use chathub_types::error::StoreError;
use chathub_types::store::StoredMemory;

/// Trait for bot-scoped long-term memory.
///
/// Stores arbitrary JSON values keyed by bot ID and string key, shared by
/// every session of the bot. At most one entry exists per `(bot_id, key)`.
pub trait MemoryStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        bot_id: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StoreError>> + Send;

    /// Set a value for a key (atomic upsert).
    fn set(
        &self,
        bot_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// All entries for a bot as a key -> value map.
    fn list_all(
        &self,
        bot_id: &str,
    ) -> impl std::future::Future<Output = Result<BTreeMap<String, serde_json::Value>, StoreError>> + Send;

    /// Delete a key. Returns whether an entry was removed; absent keys are not an error.
    fn delete(
        &self,
        bot_id: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// Delete every entry for a bot. Returns the number removed.
    fn clear(
        &self,
        bot_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Get the full entry including timestamps.
    fn get_entry(
        &self,
        bot_id: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredMemory>, StoreError>> + Send;
}
