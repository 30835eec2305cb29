//! Access policy: bearer-token gate and conversation whitelist.
//!
//! The two gates are independent. A deployment may run with both, either,
//! or neither; that is decided by configuration, not by separate code paths
//! as in the legacy endpoint variants.

use std::collections::BTreeSet;

/// Whitelist of permitted conversation directory ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhitelistConfig {
    pub enabled: bool,
    pub allowed_ids: BTreeSet<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    Ok,
    /// No credential presented and none configured.
    Unauthorized,
    /// Credential mismatch or whitelist exclusion.
    Forbidden,
}

/// Per-request decision, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    pub fn ok() -> Self {
        Self {
            allowed: true,
            reason: AccessReason::Ok,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            allowed: false,
            reason: AccessReason::Unauthorized,
        }
    }

    pub fn forbidden() -> Self {
        Self {
            allowed: false,
            reason: AccessReason::Forbidden,
        }
    }
}

/// What the caller presented.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessRequest<'a> {
    pub bearer_token: Option<&'a str>,
    /// Directory id the request targets, if it targets one conversation.
    pub target_conversation_id: Option<i64>,
}

/// Policy state loaded from configuration at request time.
#[derive(Debug, Clone, Copy)]
pub struct AccessState<'a> {
    /// Whether the token gate is active in this deployment.
    pub require_token: bool,
    pub configured_token: Option<&'a str>,
    pub whitelist: &'a WhitelistConfig,
}

/// Outcome of policy evaluation. When `bootstrap_token` is set, the caller
/// must persist it as the configured token before returning the decision;
/// the token field is first-write-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub decision: AccessDecision,
    pub bootstrap_token: Option<String>,
}

impl Authorization {
    fn denied(decision: AccessDecision) -> Self {
        Self {
            decision,
            bootstrap_token: None,
        }
    }
}

/// Evaluates both gates. The token gate runs first; the whitelist gate only
/// applies when the request targets a specific conversation.
pub fn authorize(request: AccessRequest<'_>, state: AccessState<'_>) -> Authorization {
    let mut bootstrap_token = None;

    if state.require_token {
        match token_gate(request.bearer_token, state.configured_token) {
            TokenGate::Pass => {}
            TokenGate::PassWithBootstrap(token) => bootstrap_token = Some(token),
            TokenGate::Unauthorized => return Authorization::denied(AccessDecision::unauthorized()),
            TokenGate::Forbidden => return Authorization::denied(AccessDecision::forbidden()),
        }
    }

    if let Some(target) = request.target_conversation_id {
        if !conversation_visible(state.whitelist, target) {
            return Authorization::denied(AccessDecision::forbidden());
        }
    }

    Authorization {
        decision: AccessDecision::ok(),
        bootstrap_token,
    }
}

/// Whitelist gate for one directory id. Also used to filter the directory
/// snapshot before listing, paging, and searching.
pub fn conversation_visible(whitelist: &WhitelistConfig, directory_id: i64) -> bool {
    !whitelist.enabled || whitelist.allowed_ids.contains(&directory_id)
}

enum TokenGate {
    Pass,
    PassWithBootstrap(String),
    Unauthorized,
    Forbidden,
}

fn token_gate(presented: Option<&str>, configured: Option<&str>) -> TokenGate {
    match configured {
        // First non-empty token to arrive becomes the configured token.
        None => match presented {
            Some(token) if !token.is_empty() => TokenGate::PassWithBootstrap(token.to_owned()),
            _ => TokenGate::Unauthorized,
        },
        Some(expected) => match presented {
            Some(token) if token == expected => TokenGate::Pass,
            _ => TokenGate::Forbidden,
        },
    }
}
