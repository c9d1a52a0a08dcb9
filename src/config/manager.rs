use super::{
    archive::ArchiveConfig, mutation::MutationConfig, search::SearchConfig,
    traits::ConfigSection,
};
use crate::error::GeneError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

const ENV_PREFIX: &str = "EVOGENE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mutation: MutationConfig,
    pub archive: ArchiveConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GeneError> {
        self.mutation.validate()?;
        self.archive.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file, with `EVOGENE_<SECTION>__<KEY>` environment variables on top
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GeneError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GeneError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| GeneError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.write_guard()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GeneError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| GeneError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, GeneError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| GeneError::Configuration("Config lock poisoned".to_string()))
    }

    /// Apply `f` and keep the result only if it still validates
    pub fn update<F>(&self, f: F) -> Result<(), GeneError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.write_guard()?;
        let mut candidate = guard.clone();
        f(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    fn write_guard(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, GeneError> {
        self.config
            .write()
            .map_err(|_| GeneError::Configuration("Config lock poisoned".to_string()))
    }
}
