//! Concurrent bot id -> handler map with dispatch.
//!
//! The registry is read on every chat request and written only when bots are
//! registered or unregistered, so it is backed by a `DashMap`. Registration
//! is a single atomic check-and-insert: a duplicate id is rejected and the
//! original handler stays active.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chathub_types::chat::{ChatEvent, ChatPayload};
use chathub_types::error::{DispatchError, RegistryError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use super::box_handler::BoxBotHandler;
use super::handler::BotHandler;

/// A handler plus its registration order.
struct RegisteredBot {
    order: u64,
    handler: Arc<BoxBotHandler>,
}

/// Registry of bot handlers, indexed by bot id.
pub struct BotRegistry {
    bots: DashMap<String, RegisteredBot>,
    next_order: AtomicU64,
}

impl BotRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bots: DashMap::new(),
            next_order: AtomicU64::new(0),
        }
    }

    /// Register a handler under `bot_id`.
    ///
    /// Fails with [`RegistryError::AlreadyRegistered`] if the id is taken.
    pub fn register<H: BotHandler + 'static>(
        &self,
        bot_id: impl Into<String>,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.register_boxed(bot_id, BoxBotHandler::new(handler))
    }

    /// Register an already type-erased handler under `bot_id`.
    pub fn register_boxed(
        &self,
        bot_id: impl Into<String>,
        handler: BoxBotHandler,
    ) -> Result<(), RegistryError> {
        match self.bots.entry(bot_id.into()) {
            Entry::Occupied(entry) => Err(RegistryError::AlreadyRegistered(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(bot_id = %entry.key(), "registered bot");
                entry.insert(RegisteredBot {
                    order: self.next_order.fetch_add(1, Ordering::SeqCst),
                    handler: Arc::new(handler),
                });
                Ok(())
            }
        }
    }

    /// Remove a bot. Returns `true` if it was registered; absent ids are not an error.
    pub fn unregister(&self, bot_id: &str) -> bool {
        let removed = self.bots.remove(bot_id).is_some();
        if removed {
            debug!(%bot_id, "unregistered bot");
        }
        removed
    }

    /// Route a payload to its bot's handler.
    ///
    /// An unknown bot id yields an `error` event echoing the payload's ids
    /// rather than a Rust error. Otherwise the handler's event is returned
    /// unmodified. The map entry is released before the handler runs.
    pub async fn dispatch(&self, payload: ChatPayload) -> ChatEvent {
        let handler = self
            .bots
            .get(&payload.bot_id)
            .map(|entry| Arc::clone(&entry.handler));

        match handler {
            Some(handler) => {
                debug!(
                    bot_id = %payload.bot_id,
                    session_id = %payload.session_id,
                    request_id = %payload.request_id,
                    "dispatching chat payload"
                );
                handler.handle(payload).await
            }
            None => {
                let err = DispatchError::NoSuchBot(payload.bot_id.clone());
                warn!(request_id = %payload.request_id, "{err}");
                ChatEvent::error(&payload, err.to_string())
            }
        }
    }

    /// Snapshot of registered bot ids, in registration order.
    pub fn bot_ids(&self) -> Vec<String> {
        let mut ids: Vec<(u64, String)> = self
            .bots
            .iter()
            .map(|entry| (entry.order, entry.key().clone()))
            .collect();
        ids.sort_unstable_by_key(|(order, _)| *order);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn contains(&self, bot_id: &str) -> bool {
        self.bots.contains_key(bot_id)
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

impl Default for BotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BotRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotRegistry")
            .field("bots", &self.bot_ids())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chathub_types::chat::{EventType, Message, Role};

    fn reply_with(text: &'static str) -> impl BotHandler {
        move |payload: ChatPayload| async move {
            ChatEvent::message(&payload, Message::text(Role::Assistant, text))
        }
    }

    fn payload(bot_id: &str) -> ChatPayload {
        ChatPayload::new(bot_id, "s1", Message::text(Role::User, "hi"))
    }

    #[tokio::test]
    async fn test_dispatch_to_missing_bot_returns_error_event() {
        let registry = BotRegistry::new();
        let payload = payload("ghost");
        let request_id = payload.request_id.clone();

        let event = registry.dispatch(payload).await;

        assert_eq!(event.event, EventType::Error);
        assert!(event.error.as_deref().unwrap().contains("ghost"));
        assert_eq!(event.error.as_deref(), Some("no such bot: ghost"));
        assert_eq!(event.bot_id, "ghost");
        assert_eq!(event.session_id, "s1");
        assert_eq!(event.request_id, Some(request_id));
    }

    #[tokio::test]
    async fn test_dispatch_returns_handler_event_unmodified() {
        let registry = BotRegistry::new();
        registry.register("b1", reply_with("pong")).unwrap();

        let event = registry.dispatch(payload("b1")).await;
        assert_eq!(event.event, EventType::Message);
        assert_eq!(event.message.unwrap().plain_text(), "pong");
    }

    #[tokio::test]
    async fn test_register_conflict_keeps_original() {
        let registry = BotRegistry::new();
        registry.register("b1", reply_with("first")).unwrap();

        let err = registry.register("b1", reply_with("second")).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(ref id) if id == "b1"));

        let event = registry.dispatch(payload("b1")).await;
        assert_eq!(event.message.unwrap().plain_text(), "first");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = BotRegistry::new();
        registry.register("b1", reply_with("x")).unwrap();

        assert!(registry.unregister("b1"));
        assert!(!registry.unregister("b1"));
        assert!(!registry.unregister("never"));
        assert!(registry.is_empty());

        let event = registry.dispatch(payload("b1")).await;
        assert!(event.is_error());

        // The id is free again after unregistering.
        registry.register("b1", reply_with("y")).unwrap();
    }

    #[test]
    fn test_bot_ids_in_registration_order() {
        let registry = BotRegistry::new();
        for id in ["zeta", "alpha", "mid"] {
            registry.register(id, reply_with("x")).unwrap();
        }
        assert_eq!(registry.bot_ids(), vec!["zeta", "alpha", "mid"]);
        assert!(registry.contains("alpha"));

        registry.unregister("alpha");
        assert_eq!(registry.bot_ids(), vec!["zeta", "mid"]);
    }

    #[tokio::test]
    async fn test_concurrent_registration_admits_one_winner() {
        let registry = Arc::new(BotRegistry::new());
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                registry.register("contested", reply_with("x")).is_ok()
            }));
        }

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_across_bots() {
        let registry = Arc::new(BotRegistry::new());
        registry.register("a", reply_with("from a")).unwrap();
        registry.register("b", reply_with("from b")).unwrap();

        let mut tasks = Vec::new();
        for i in 0..20 {
            let registry = Arc::clone(&registry);
            let bot = if i % 2 == 0 { "a" } else { "b" };
            tasks.push(tokio::spawn(async move {
                (bot, registry.dispatch(payload(bot)).await)
            }));
        }

        for task in tasks {
            let (bot, event) = task.await.unwrap();
            assert_eq!(event.bot_id, bot);
            assert_eq!(event.message.unwrap().plain_text(), format!("from {bot}"));
        }
    }
}
