mod app_config;
mod file_config;
mod loader;
mod store;

pub use app_config::{AccessConfig, BridgeConfig, LogConfig, ServerConfig, TelegramConfig};
pub use loader::load;
pub use store::{ConfigStore, FileConfigStore};
