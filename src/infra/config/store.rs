//! Configuration store: serialized read-modify-write of the single
//! persisted record. Whitelist mutations and token bootstrap go through
//! `update`, which holds a lock across load, apply, and save so concurrent
//! requests cannot lose each other's writes.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::infra::{
    config::{loader, BridgeConfig},
    error::AppError,
};

pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<BridgeConfig, AppError>;

    fn save(&self, config: &BridgeConfig) -> Result<(), AppError>;

    /// Atomic read-modify-write; returns the record as persisted.
    fn update(
        &self,
        apply: &mut dyn FnMut(&mut BridgeConfig),
    ) -> Result<BridgeConfig, AppError>;
}

pub struct FileConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf).unwrap_or_else(loader::default_path),
            write_lock: Mutex::new(()),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<BridgeConfig, AppError> {
        loader::load(Some(&self.path))
    }

    fn save(&self, config: &BridgeConfig) -> Result<(), AppError> {
        let raw = toml::to_string_pretty(config).map_err(AppError::ConfigSerialize)?;
        fs::write(&self.path, raw).map_err(|source| AppError::ConfigWrite {
            path: self.path.clone(),
            source,
        })
    }

    fn update(
        &self,
        apply: &mut dyn FnMut(&mut BridgeConfig),
    ) -> Result<BridgeConfig, AppError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut config = self.load()?;
        apply(&mut config);
        self.save(&config)?;

        Ok(config)
    }
}
