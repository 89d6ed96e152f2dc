//! Client-side helpers for building request payloads in one call.

use crate::chat::{ChatPayload, Message, Role};
use crate::command::{Command, CommandPayload};
use crate::segment::Segment;

/// Build a plain-text chat payload from the user.
///
/// ```
/// let payload = chathub_types::client::chat("bot-001", "sess-abc", "hello!");
/// assert_eq!(payload.message.plain_text(), "hello!");
/// ```
pub fn chat(bot_id: &str, session_id: &str, text: &str) -> ChatPayload {
    ChatPayload::new(bot_id, session_id, Message::text(Role::User, text))
}

/// Build a chat payload from arbitrary segments (mixed text and media).
pub fn chat_segments(
    bot_id: &str,
    session_id: &str,
    role: Role,
    segments: Vec<Segment>,
) -> ChatPayload {
    ChatPayload::new(bot_id, session_id, Message::new(role, segments))
}

/// Build a "clear context" command payload.
pub fn clear_context(bot_id: &str, session_id: &str) -> CommandPayload {
    CommandPayload::new(bot_id, session_id, Command::ClearContext)
}

/// Build a "clear long-term memory" command payload.
pub fn clear_memory(bot_id: &str, session_id: &str) -> CommandPayload {
    CommandPayload::new(bot_id, session_id, Command::ClearMemory)
}

/// Build a "set context length" command payload.
pub fn set_context_length(bot_id: &str, session_id: &str, length: i64) -> CommandPayload {
    CommandPayload::new(bot_id, session_id, Command::SetContextLength { length })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_segments_keeps_order() {
        let payload = chat_segments(
            "bot-001",
            "sess-abc",
            Role::User,
            vec![Segment::text("see"), Segment::image("https://example.com/cat.jpg")],
        );
        assert_eq!(payload.message.content[0].kind(), "text");
        assert_eq!(payload.message.content[1].kind(), "image");
    }

    #[test]
    fn test_command_helpers() {
        assert_eq!(clear_context("b", "s").command, Command::ClearContext);
        assert_eq!(clear_memory("b", "s").command, Command::ClearMemory);
        assert_eq!(
            set_context_length("b", "s", 40).command,
            Command::SetContextLength { length: 40 }
        );
    }
}
