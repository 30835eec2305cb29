/// Kind of conversation as exposed over the bridge API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationKind {
    /// Private 1-to-1 dialog or small group chat.
    #[default]
    Chat,
    /// Megagroup (a channel-backed group).
    Group,
    /// Broadcast channel.
    Channel,
}

impl ConversationKind {
    /// Wire label used in JSON payloads.
    pub fn label(&self) -> &'static str {
        match self {
            ConversationKind::Chat => "chat",
            ConversationKind::Group => "group",
            ConversationKind::Channel => "channel",
        }
    }
}

/// One canonical conversation record inside a directory snapshot.
///
/// Produced by the normalizer from backend entities and never mutated
/// afterwards; a new snapshot replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Directory id. Channels and megagroups carry the public `-100` marker.
    pub id: i64,
    pub title: String,
    /// Public handle, empty when the conversation has none.
    pub username: String,
    pub kind: ConversationKind,
    /// True only for the account's own saved-messages conversation.
    pub is_self: bool,
    pub pinned: bool,
}

impl Conversation {
    /// Case-insensitive substring match against title or username.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self.username.to_lowercase().contains(query_lower)
    }
}
