//! Session store abstractions.
//!
//! Three independently addressable collections: messages (per session),
//! long-term memory (per bot), and configuration (per session).
//! Implementations live in chathub-infra.

pub mod config_store;
pub mod memory_store;
pub mod message_store;

#[cfg(test)]
pub(crate) mod testing;

pub use config_store::ConfigStore;
pub use memory_store::MemoryStore;
pub use message_store::MessageStore;
