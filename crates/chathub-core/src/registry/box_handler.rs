//! BoxBotHandler -- object-safe dynamic dispatch wrapper for BotHandler.
//!
//! 1. Define an object-safe `BotHandlerDyn` trait with boxed futures
//! 2. Blanket-impl `BotHandlerDyn` for all `T: BotHandler`
//! 3. `BoxBotHandler` wraps `Box<dyn BotHandlerDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chathub_types::chat::{ChatEvent, ChatPayload};

use super::handler::BotHandler;

/// Object-safe version of [`BotHandler`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn BotHandlerDyn`).
/// A blanket implementation is provided for all types implementing `BotHandler`.
pub trait BotHandlerDyn: Send + Sync {
    fn handle_boxed(
        &self,
        payload: ChatPayload,
    ) -> Pin<Box<dyn Future<Output = ChatEvent> + Send + '_>>;
}

impl<T: BotHandler> BotHandlerDyn for T {
    fn handle_boxed(
        &self,
        payload: ChatPayload,
    ) -> Pin<Box<dyn Future<Output = ChatEvent> + Send + '_>> {
        Box::pin(self.handle(payload))
    }
}

/// Type-erased bot handler.
///
/// Since `BotHandler` uses RPITIT, it cannot be used as a trait object
/// directly; the registry stores handlers of different concrete types
/// behind this wrapper.
pub struct BoxBotHandler {
    inner: Box<dyn BotHandlerDyn>,
}

impl BoxBotHandler {
    /// Wrap a concrete `BotHandler` in a type-erased box.
    pub fn new<T: BotHandler + 'static>(handler: T) -> Self {
        Self {
            inner: Box::new(handler),
        }
    }

    pub async fn handle(&self, payload: ChatPayload) -> ChatEvent {
        self.inner.handle_boxed(payload).await
    }
}

impl std::fmt::Debug for BoxBotHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxBotHandler").finish_non_exhaustive()
    }
}
