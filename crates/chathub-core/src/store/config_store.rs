//! Session configuration trait.

use std::collections::BTreeMap;

use chathub_types::error::StoreError;
use chathub_types::store::StoredConfig;

/// Trait for per-session configuration values.
///
/// Same contract as [`MemoryStore`](super::MemoryStore), keyed by
/// `(bot_id, session_id, key)`.
pub trait ConfigStore: Send + Sync {
    fn get(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StoreError>> + Send;

    /// Set a value for a key (atomic upsert).
    fn set(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    fn list_all(
        &self,
        bot_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<BTreeMap<String, serde_json::Value>, StoreError>> + Send;

    /// Delete every configuration entry of a session. Returns the number removed.
    fn clear(
        &self,
        bot_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Full record for a key, including timestamps.
    fn get_entry(
        &self,
        bot_id: &str,
        session_id: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredConfig>, StoreError>> + Send;
}
