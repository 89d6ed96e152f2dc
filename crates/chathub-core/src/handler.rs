//! Placeholder bot handler.
//!
//! Stores the inbound message in the session log and answers with a fixed
//! assistant reply. Real bots plug in through [`BotHandler`] the same way.

use std::sync::Arc;

use chathub_types::chat::{ChatEvent, ChatPayload, Message, Role};
use chathub_types::error::StoreError;
use tracing::{debug, warn};

use crate::registry::BotHandler;
use crate::session::SessionStore;
use crate::store::{ConfigStore, MemoryStore, MessageStore};

/// Handler that persists the conversation and replies with canned text.
pub struct PlaceholderHandler<M: MessageStore, K: MemoryStore, C: ConfigStore> {
    store: Arc<SessionStore<M, K, C>>,
    reply: String,
    persist_reply: bool,
}

impl<M: MessageStore, K: MemoryStore, C: ConfigStore> PlaceholderHandler<M, K, C> {
    pub fn new(store: Arc<SessionStore<M, K, C>>, reply: impl Into<String>) -> Self {
        Self {
            store,
            reply: reply.into(),
            persist_reply: true,
        }
    }

    /// Whether the assistant reply is appended to the session log as well.
    pub fn with_persist_reply(mut self, persist_reply: bool) -> Self {
        self.persist_reply = persist_reply;
        self
    }

    async fn respond(&self, payload: &ChatPayload) -> Result<Message, StoreError> {
        let scope = self.store.scope(payload.bot_id.as_str(), payload.session_id.as_str());
        let inbound = &payload.message;
        scope.messages().add(inbound.role, &inbound.content).await?;

        let reply = Message::text(Role::Assistant, self.reply.clone());
        if self.persist_reply {
            scope.messages().add(reply.role, &reply.content).await?;
        }
        Ok(reply)
    }
}

impl<M: MessageStore, K: MemoryStore, C: ConfigStore> BotHandler for PlaceholderHandler<M, K, C> {
    async fn handle(&self, payload: ChatPayload) -> ChatEvent {
        match self.respond(&payload).await {
            Ok(reply) => {
                debug!(
                    bot_id = %payload.bot_id,
                    session_id = %payload.session_id,
                    "placeholder reply sent"
                );
                ChatEvent::message(&payload, reply)
            }
            Err(e) => {
                warn!(
                    bot_id = %payload.bot_id,
                    session_id = %payload.session_id,
                    error = %e,
                    "failed to persist chat message"
                );
                ChatEvent::error(&payload, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{memory_session_store, unavailable_session_store};
    use chathub_types::chat::EventType;
    use chathub_types::client;

    #[tokio::test]
    async fn test_persists_inbound_and_reply() {
        let store = memory_session_store();
        let handler = PlaceholderHandler::new(Arc::clone(&store), "ack");

        let event = handler.handle(client::chat("b1", "s1", "hi")).await;

        assert_eq!(event.event, EventType::Message);
        assert_eq!(event.message.as_ref().unwrap().role, Role::Assistant);
        assert_eq!(event.message.unwrap().plain_text(), "ack");

        let log = store.scope("b1", "s1").messages().list(None).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Role::User);
        assert_eq!(log[0].content[0].as_text(), Some("hi"));
        assert_eq!(log[1].role, Role::Assistant);
        assert_eq!(log[1].content[0].as_text(), Some("ack"));
    }

    #[tokio::test]
    async fn test_reply_not_persisted_when_disabled() {
        let store = memory_session_store();
        let handler = PlaceholderHandler::new(Arc::clone(&store), "ack").with_persist_reply(false);

        handler.handle(client::chat("b1", "s1", "hi")).await;

        let log = store.scope("b1", "s1").messages().list(None).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_error_event() {
        let handler = PlaceholderHandler::new(unavailable_session_store(), "ack");
        let payload = client::chat("b1", "s1", "hi");
        let request_id = payload.request_id.clone();

        let event = handler.handle(payload).await;

        assert_eq!(event.event, EventType::Error);
        assert!(event.error.unwrap().contains("store unavailable"));
        assert_eq!(event.request_id, Some(request_id));
        assert!(event.message.is_none());
    }
}
