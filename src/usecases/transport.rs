//! Backend transport port.
//!
//! The bridge core never talks to Telegram directly; everything it needs
//! from the messaging backend goes through this trait. The production
//! implementation lives in `crate::telegram`, tests use recording stubs.

use async_trait::async_trait;

/// The authenticated account behind the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub id: i64,
    pub first_name: String,
    /// Empty when the account has no last name.
    pub last_name: String,
}

/// Backend class tag of a dialog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// A user (private dialog).
    User,
    /// A legacy small group.
    Chat,
    /// A channel, broadcast or megagroup.
    Channel,
}

/// One dialog entity as the backend reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntity {
    pub kind: RawKind,
    /// Raw backend id, without the public `-100` channel marker.
    pub id: i64,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// Only meaningful for `RawKind::Channel`.
    pub megagroup: bool,
    /// Set when the chat was migrated to a successor; such entries are stale.
    pub migrated_to: Option<i64>,
    pub pinned: bool,
}

/// One reaction bucket on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub reaction: String,
    pub count: i32,
}

/// One message as the backend reports it, before sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub id: i32,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub sender_id: Option<i64>,
    pub sender_label: Option<String>,
    pub text: String,
    pub has_media: bool,
    pub reactions: Vec<ReactionCount>,
}

/// Transport-level failures. The core never retries these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend call failed or timed out; carries the backend's message.
    Unavailable(String),
    /// The target conversation is not in the account's dialog list.
    ConversationNotFound,
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Unavailable(message) => write!(f, "backend unavailable: {message}"),
            BackendError::ConversationNotFound => f.write_str("conversation not found"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Port over the messaging backend, mirrored from what the bridge consumes:
/// the current account, the dialog list, recent messages, and message send.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    async fn current_account(&self) -> Result<AccountInfo, BackendError>;

    /// Full dialog list in the backend's own order.
    async fn list_dialogs(&self) -> Result<Vec<RawEntity>, BackendError>;

    /// Up to `limit` most recent messages, newest first.
    async fn recent_messages(
        &self,
        conversation_id: i64,
        limit: usize,
    ) -> Result<Vec<RawMessage>, BackendError>;

    /// Sends a message; `Ok(None)` means the backend accepted the call but
    /// produced no message (treated as a rejection by the gateway).
    async fn send_message(
        &self,
        conversation_id: i64,
        body: &str,
    ) -> Result<Option<i32>, BackendError>;
}

impl RawEntity {
    /// Minimal user entity, mostly useful for tests and stubs.
    pub fn user(id: i64, first_name: &str) -> Self {
        Self {
            kind: RawKind::User,
            id,
            title: None,
            first_name: Some(first_name.to_owned()),
            last_name: None,
            username: None,
            megagroup: false,
            migrated_to: None,
            pinned: false,
        }
    }

    /// Minimal channel entity, mostly useful for tests and stubs.
    pub fn channel(id: i64, title: &str, megagroup: bool) -> Self {
        Self {
            kind: RawKind::Channel,
            id,
            title: Some(title.to_owned()),
            first_name: None,
            last_name: None,
            username: None,
            megagroup,
            migrated_to: None,
            pinned: false,
        }
    }
}
