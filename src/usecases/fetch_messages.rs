//! Message gateway, read side: recent messages of one conversation.
//!
//! Callers must hold an `allowed` access decision for the conversation
//! before invoking this; the gateway itself only shapes the payload.

use crate::domain::message::Message;
use crate::domain::sanitize::strip_markup;
use crate::usecases::transport::{BackendError, BackendTransport, RawMessage};

/// How many messages a fetch returns when the caller does not say.
pub const DEFAULT_MESSAGE_LIMIT: usize = 10;
const MAX_MESSAGE_LIMIT: usize = 100;

/// Label used when the backend reports no sender for a message.
pub const UNKNOWN_SENDER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMessagesError {
    ConversationNotFound,
    Unavailable(String),
}

/// Fetches up to `limit` most recent messages, dropping pure-media entries,
/// sanitizing bodies, and resolving ownership against the account id.
///
/// Sender and account ids are compared as `i64`; Telegram ids routinely
/// exceed the 32-bit range and must never be narrowed first.
pub async fn fetch_recent(
    transport: &dyn BackendTransport,
    conversation_id: i64,
    limit: usize,
    own_account_id: i64,
) -> Result<Vec<Message>, FetchMessagesError> {
    let limit = normalized_limit(limit);
    let raw = transport
        .recent_messages(conversation_id, limit)
        .await
        .map_err(map_backend_error)?;

    Ok(raw
        .iter()
        .filter(|message| has_displayable_text(message))
        .map(|message| shape_message(message, own_account_id))
        .collect())
}

fn normalized_limit(limit: usize) -> usize {
    match limit {
        0 => DEFAULT_MESSAGE_LIMIT,
        value if value > MAX_MESSAGE_LIMIT => MAX_MESSAGE_LIMIT,
        value => value,
    }
}

/// Pure-media messages (media attached, no text at all) are dropped; a
/// text-less message without media still goes through (e.g. service notes).
fn has_displayable_text(message: &RawMessage) -> bool {
    !message.text.is_empty() || !message.has_media
}

fn shape_message(raw: &RawMessage, own_account_id: i64) -> Message {
    Message {
        id: raw.id,
        timestamp: raw.timestamp,
        sender_label: raw
            .sender_label
            .clone()
            .unwrap_or_else(|| UNKNOWN_SENDER.to_owned()),
        body: strip_markup(&raw.text),
        reactions_summary: summarize_reactions(raw),
        is_own: raw.sender_id == Some(own_account_id),
    }
}

fn summarize_reactions(raw: &RawMessage) -> String {
    raw.reactions
        .iter()
        .map(|entry| format!("{} x{}", entry.reaction, entry.count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn map_backend_error(error: BackendError) -> FetchMessagesError {
    match error {
        BackendError::ConversationNotFound => FetchMessagesError::ConversationNotFound,
        BackendError::Unavailable(message) => FetchMessagesError::Unavailable(message),
    }
}
