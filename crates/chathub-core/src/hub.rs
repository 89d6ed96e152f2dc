//! Hub facade tying the registry, the session store, and the command
//! interpreter together.
//!
//! Transports (HTTP, CLI) hold one `Hub` behind an `Arc` and never touch the
//! registry or stores directly.

use std::sync::Arc;

use chathub_types::chat::{ChatEvent, ChatPayload};
use chathub_types::command::{CommandPayload, CommandResult};
use chathub_types::error::RegistryError;

use crate::command;
use crate::handler::PlaceholderHandler;
use crate::registry::BotRegistry;
use crate::session::{SessionScope, SessionStore};
use crate::store::{ConfigStore, MemoryStore, MessageStore};

pub struct Hub<M: MessageStore, K: MemoryStore, C: ConfigStore> {
    registry: BotRegistry,
    store: Arc<SessionStore<M, K, C>>,
}

impl<M, K, C> Hub<M, K, C>
where
    M: MessageStore + 'static,
    K: MemoryStore + 'static,
    C: ConfigStore + 'static,
{
    pub fn new(store: Arc<SessionStore<M, K, C>>) -> Self {
        Self {
            registry: BotRegistry::new(),
            store,
        }
    }

    pub fn registry(&self) -> &BotRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<SessionStore<M, K, C>> {
        &self.store
    }

    /// Register a [`PlaceholderHandler`] sharing this hub's store.
    pub fn register_placeholder(
        &self,
        bot_id: impl Into<String>,
        reply: impl Into<String>,
        persist_reply: bool,
    ) -> Result<(), RegistryError> {
        let handler = PlaceholderHandler::new(Arc::clone(&self.store), reply)
            .with_persist_reply(persist_reply);
        self.registry.register(bot_id, handler)
    }

    /// Dispatch a chat payload to its bot.
    pub async fn chat(&self, payload: ChatPayload) -> ChatEvent {
        self.registry.dispatch(payload).await
    }

    /// Run a command against the payload's session.
    pub async fn command(&self, payload: &CommandPayload) -> CommandResult {
        let scope = self.store.scope(payload.bot_id.as_str(), payload.session_id.as_str());
        command::execute(&scope, payload).await
    }

    /// Store view for one bot and session.
    pub fn session(&self, bot_id: impl Into<String>, session_id: impl Into<String>) -> SessionScope<'_, M, K, C> {
        self.store.scope(bot_id, session_id)
    }
}

impl<M: MessageStore, K: MemoryStore, C: ConfigStore> std::fmt::Debug for Hub<M, K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").field("registry", &self.registry).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{InMemoryStore, memory_session_store};
    use chathub_types::chat::{EventType, Role};
    use chathub_types::client;
    use chathub_types::segment::Segment;
    use serde_json::json;

    fn hub() -> Hub<InMemoryStore, InMemoryStore, InMemoryStore> {
        Hub::new(memory_session_store())
    }

    #[tokio::test]
    async fn test_chat_round_trip_through_placeholder() {
        let hub = hub();
        hub.register_placeholder("b1", "noted", true).unwrap();

        let event = hub.chat(client::chat("b1", "s1", "hi")).await;
        assert_eq!(event.event, EventType::Message);
        assert_eq!(event.bot_id, "b1");
        assert_eq!(event.session_id, "s1");

        let log = hub.session("b1", "s1").messages().list(None).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].content, vec![Segment::text("hi")]);
    }

    #[tokio::test]
    async fn test_chat_to_unregistered_bot_is_error_event() {
        let hub = hub();
        let event = hub.chat(client::chat("nobody", "s1", "hi")).await;
        assert!(event.is_error());
        assert!(event.error.unwrap().contains("nobody"));
    }

    #[tokio::test]
    async fn test_duplicate_placeholder_rejected() {
        let hub = hub();
        hub.register_placeholder("b1", "one", true).unwrap();
        let err = hub.register_placeholder("b1", "two", true).unwrap_err();
        assert_eq!(err.to_string(), "bot 'b1' is already registered");
        assert_eq!(hub.registry().bot_ids(), vec!["b1"]);
    }

    #[tokio::test]
    async fn test_clear_context_after_chat() {
        let hub = hub();
        hub.register_placeholder("b1", "noted", true).unwrap();
        hub.chat(client::chat("b1", "s1", "hi")).await;
        hub.chat(client::chat("b1", "s2", "hi")).await;

        let result = hub.command(&client::clear_context("b1", "s1")).await;
        assert!(result.success);
        assert_eq!(result.data.unwrap()["cleared_messages"], json!(2));

        assert_eq!(hub.session("b1", "s1").messages().count().await.unwrap(), 0);
        assert_eq!(hub.session("b1", "s2").messages().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_commands_do_not_require_registration() {
        let hub = hub();
        let result = hub.command(&client::set_context_length("unregistered", "s1", 5)).await;
        assert!(result.success);
        assert_eq!(
            hub.session("unregistered", "s1").config().get("context_length").await.unwrap(),
            Some(json!(5))
        );
    }

    #[tokio::test]
    async fn test_custom_handler_shares_store() {
        let hub = hub();
        let store = Arc::clone(hub.store());
        hub.registry()
            .register("echo", move |payload: ChatPayload| {
                let store = Arc::clone(&store);
                async move {
                    let text = payload.message.plain_text();
                    let scope = store.scope(payload.bot_id.as_str(), payload.session_id.as_str());
                    match scope.memory().set("last", &json!(text)).await {
                        Ok(()) => ChatEvent::message(
                            &payload,
                            chathub_types::chat::Message::text(Role::Assistant, text),
                        ),
                        Err(e) => ChatEvent::error(&payload, e.to_string()),
                    }
                }
            })
            .unwrap();

        let event = hub.chat(client::chat("echo", "s1", "ping")).await;
        assert_eq!(event.message.unwrap().plain_text(), "ping");
        assert_eq!(
            hub.session("echo", "other").memory().get("last").await.unwrap(),
            Some(json!("ping"))
        );
    }
}
