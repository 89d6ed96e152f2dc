//! Message log trait.

use chathub_types::chat::Role;
use chathub_types::error::StoreError;
use chathub_types::segment::Segment;
use chathub_types::store::StoredMessage;

/// Trait for the per-session, append-only message log.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in chathub-infra.
pub trait MessageStore: Send + Sync {
    /// Append a message, assigning it the next sequence key.
    fn append(
        &self,
        bot_id: &str,
        session_id: &str,
        role: Role,
        content: &[Segment],
    ) -> impl std::future::Future<Output = Result<StoredMessage, StoreError>> + Send;

    /// Messages for a session in ascending sequence order.
    ///
    /// With `limit`, only the most recent `limit` messages are returned,
    /// still in ascending order.
    fn list(
        &self,
        bot_id: &str,
        session_id: &str,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, StoreError>> + Send;

    /// Number of messages stored for a session.
    fn count(
        &self,
        bot_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Delete every message of a session. Returns the number removed.
    fn clear(
        &self,
        bot_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
