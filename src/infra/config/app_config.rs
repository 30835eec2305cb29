use serde::{Deserialize, Serialize};

use crate::usecases::access::WhitelistConfig;

/// The single persisted configuration record. Everything the bridge needs
/// across restarts lives here: API credentials, the HTTP listener, and the
/// access-control state (bearer token plus whitelist).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BridgeConfig {
    pub logging: LogConfig,
    pub telegram: TelegramConfig,
    pub server: ServerConfig,
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelegramConfig {
    pub api_id: i32,
    pub api_hash: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_id: 0,
            api_hash: "replace-me".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 65222,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessConfig {
    /// Whether the bearer-token gate is active.
    pub require_token: bool,
    /// Configured bearer token; first-write-wins via bootstrap-on-first-use.
    pub token: Option<String>,
    pub use_whitelist: bool,
    /// Whitelisted conversation directory ids.
    pub whitelist: Vec<i64>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            require_token: true,
            token: None,
            use_whitelist: false,
            whitelist: Vec::new(),
        }
    }
}

impl AccessConfig {
    pub fn whitelist_config(&self) -> WhitelistConfig {
        WhitelistConfig {
            enabled: self.use_whitelist,
            allowed_ids: self.whitelist.iter().copied().collect(),
        }
    }

    /// Writes a mutated whitelist back into the persisted shape.
    pub fn apply_whitelist(&mut self, whitelist: &WhitelistConfig) {
        self.use_whitelist = whitelist.enabled;
        self.whitelist = whitelist.allowed_ids.iter().copied().collect();
    }
}
