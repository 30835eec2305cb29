//! Whitelist mutations. All of them are idempotent so clients may retry
//! freely; the return value reports whether anything actually changed.

use crate::usecases::access::WhitelistConfig;

/// Adds a directory id. Adding a present id is a no-op.
pub fn add(whitelist: &mut WhitelistConfig, directory_id: i64) -> bool {
    whitelist.allowed_ids.insert(directory_id)
}

/// Removes a directory id. Removing an absent id is a no-op.
pub fn remove(whitelist: &mut WhitelistConfig, directory_id: i64) -> bool {
    whitelist.allowed_ids.remove(&directory_id)
}

/// Turns whitelist enforcement on or off.
pub fn set_enforcement(whitelist: &mut WhitelistConfig, enabled: bool) -> bool {
    let changed = whitelist.enabled != enabled;
    whitelist.enabled = enabled;
    changed
}
