//! Bot handler trait.

use std::future::Future;

use chathub_types::chat::{ChatEvent, ChatPayload};

/// Trait for answering chat payloads addressed to a bot.
///
/// Handlers are total: failures (storage errors and the like) must be turned
/// into an `error` event by the handler itself, so the caller always receives
/// a well-formed [`ChatEvent`].
///
/// Any `Fn(ChatPayload) -> impl Future<Output = ChatEvent>` closure is a handler.
pub trait BotHandler: Send + Sync {
    fn handle(&self, payload: ChatPayload) -> impl Future<Output = ChatEvent> + Send;
}

impl<F, Fut> BotHandler for F
where
    F: Fn(ChatPayload) -> Fut + Send + Sync,
    Fut: Future<Output = ChatEvent> + Send,
{
    fn handle(&self, payload: ChatPayload) -> impl Future<Output = ChatEvent> + Send {
        (self)(payload)
    }
}
