/// One message ready for plain-text display.
///
/// The body is already sanitized and the sender resolved to a display label;
/// nothing here is persisted by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Telegram message ids fit in 32 bits; account and sender ids do not.
    pub id: i32,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Sender display name, `"Unknown"` when the backend gave none.
    pub sender_label: String,
    pub body: String,
    /// Human-readable reaction summary, empty when the message has none.
    pub reactions_summary: String,
    /// True when the sender id equals the authenticated account's own id.
    pub is_own: bool,
}
