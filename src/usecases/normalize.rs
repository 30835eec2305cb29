//! Conversation normalizer: backend dialog entities to canonical records.

use crate::domain::conversation::{Conversation, ConversationKind};
use crate::usecases::transport::{RawEntity, RawKind};

/// Title used for the account's own saved-messages conversation.
pub const SAVED_MESSAGES_TITLE: &str = "Saved Messages";

/// Directory id for an entity: channels and megagroups get the backend's
/// public `-100` marker prefixed onto the raw id, everything else keeps it.
///
/// This is the single id-marking helper; the transport adapter uses it too,
/// so whitelist membership and conversation lookups always compare the same
/// representation.
pub fn directory_id(kind: RawKind, raw_id: i64) -> i64 {
    match kind {
        RawKind::Channel => format!("-100{raw_id}").parse().unwrap_or(raw_id),
        RawKind::User | RawKind::Chat => raw_id,
    }
}

/// Converts backend entities into canonical conversations, preserving the
/// backend's dialog order. Entities superseded by a migration are dropped.
pub fn normalize(entities: &[RawEntity], own_account_id: i64) -> Vec<Conversation> {
    entities
        .iter()
        .filter(|entity| entity.migrated_to.is_none())
        .map(|entity| normalize_entity(entity, own_account_id))
        .collect()
}

fn normalize_entity(entity: &RawEntity, own_account_id: i64) -> Conversation {
    let is_self = entity.id == own_account_id;
    let title = if is_self {
        SAVED_MESSAGES_TITLE.to_owned()
    } else {
        resolve_title(entity)
    };

    Conversation {
        id: directory_id(entity.kind, entity.id),
        title,
        username: entity.username.clone().unwrap_or_default(),
        kind: resolve_kind(entity),
        is_self,
        pinned: entity.pinned,
    }
}

fn resolve_title(entity: &RawEntity) -> String {
    if let Some(title) = &entity.title {
        return title.clone();
    }

    match (&entity.first_name, &entity.last_name) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.clone(),
        _ => String::new(),
    }
}

fn resolve_kind(entity: &RawEntity) -> ConversationKind {
    match entity.kind {
        RawKind::Channel if entity.megagroup => ConversationKind::Group,
        RawKind::Channel => ConversationKind::Channel,
        RawKind::User | RawKind::Chat => ConversationKind::Chat,
    }
}
