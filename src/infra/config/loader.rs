use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, BridgeConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

pub fn load(path: Option<&Path>) -> Result<BridgeConfig, AppError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

    let mut config = BridgeConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let config = load(Some(Path::new("./missing-config.toml"))).expect("config must load");

        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            r#"[logging]
level = "debug"

[telegram]
api_id = 123
api_hash = "abc"

[server]
port = 8080

[access]
require_token = false
use_whitelist = true
whitelist = [-100222, 5]
"#,
        )
        .expect("must write test config");

        let config = load(Some(&config_path)).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.telegram.api_id, 123);
        assert_eq!(config.telegram.api_hash, "abc");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.access.require_token);
        assert!(config.access.use_whitelist);
        assert_eq!(config.access.whitelist, vec![-100222, 5]);
    }

    #[test]
    fn partial_access_section_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[access]\ntoken = \"abc\"\n").expect("must write test config");

        let config = load(Some(&config_path)).expect("config must load");

        assert_eq!(config.access.token.as_deref(), Some("abc"));
        assert!(config.access.require_token);
        assert!(!config.access.use_whitelist);
    }
}
