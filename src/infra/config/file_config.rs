use serde::Deserialize;

use crate::infra::config::{AccessConfig, BridgeConfig, LogConfig, ServerConfig, TelegramConfig};

/// Partial on-disk shape; absent fields keep their defaults.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub telegram: Option<FileTelegramConfig>,
    pub server: Option<FileServerConfig>,
    pub access: Option<FileAccessConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut BridgeConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(telegram) = self.telegram {
            telegram.merge_into(&mut config.telegram);
        }

        if let Some(server) = self.server {
            server.merge_into(&mut config.server);
        }

        if let Some(access) = self.access {
            access.merge_into(&mut config.access);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTelegramConfig {
    pub api_id: Option<i32>,
    pub api_hash: Option<String>,
}

impl FileTelegramConfig {
    fn merge_into(self, config: &mut TelegramConfig) {
        if let Some(api_id) = self.api_id {
            config.api_id = api_id;
        }

        if let Some(api_hash) = self.api_hash {
            config.api_hash = api_hash;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl FileServerConfig {
    fn merge_into(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }

        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileAccessConfig {
    pub require_token: Option<bool>,
    pub token: Option<String>,
    pub use_whitelist: Option<bool>,
    pub whitelist: Option<Vec<i64>>,
}

impl FileAccessConfig {
    fn merge_into(self, config: &mut AccessConfig) {
        if let Some(require_token) = self.require_token {
            config.require_token = require_token;
        }

        if let Some(token) = self.token {
            config.token = Some(token);
        }

        if let Some(use_whitelist) = self.use_whitelist {
            config.use_whitelist = use_whitelist;
        }

        if let Some(whitelist) = self.whitelist {
            config.whitelist = whitelist;
        }
    }
}
