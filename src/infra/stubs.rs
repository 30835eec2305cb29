//! In-memory test doubles for the configuration store.

use std::sync::Mutex;

use crate::infra::{config::BridgeConfig, config::ConfigStore, error::AppError};

/// Config store backed by memory, recording every save so tests can assert
/// that mutations were persisted (and when).
pub struct MemoryConfigStore {
    state: Mutex<BridgeConfig>,
    save_count: Mutex<usize>,
}

impl MemoryConfigStore {
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            state: Mutex::new(config),
            save_count: Mutex::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.lock().expect("save count lock")
    }

    pub fn current(&self) -> BridgeConfig {
        self.state.lock().expect("state lock").clone()
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::with_config(BridgeConfig::default())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<BridgeConfig, AppError> {
        Ok(self.state.lock().expect("state lock").clone())
    }

    fn save(&self, config: &BridgeConfig) -> Result<(), AppError> {
        *self.state.lock().expect("state lock") = config.clone();
        *self.save_count.lock().expect("save count lock") += 1;
        Ok(())
    }

    fn update(
        &self,
        apply: &mut dyn FnMut(&mut BridgeConfig),
    ) -> Result<BridgeConfig, AppError> {
        let mut config = self.load()?;
        apply(&mut config);
        self.save(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_mutates_and_counts_saves() {
        let store = MemoryConfigStore::default();

        let updated = store
            .update(&mut |config| config.access.token = Some("abc".to_owned()))
            .expect("update");

        assert_eq!(updated.access.token.as_deref(), Some("abc"));
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.current(), updated);
    }
}
