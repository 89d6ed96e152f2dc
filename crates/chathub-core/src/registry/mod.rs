//! Bot registry and dispatch.
//!
//! - `handler` -- `BotHandler` trait implemented by anything that answers chat payloads
//! - `box_handler` -- `BoxBotHandler`, the type-erased handler stored by the registry
//! - `bot_registry` -- `BotRegistry`, the concurrent bot id -> handler map with `dispatch`

pub mod bot_registry;
pub mod box_handler;
pub mod handler;

pub use bot_registry::BotRegistry;
pub use box_handler::BoxBotHandler;
pub use handler::BotHandler;
