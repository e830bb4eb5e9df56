use super::{
    evolution::EvolutionConfig,
    network::NetworkConfig,
    trading::TradingConfig,
    traits::{invalid, ConfigSection},
};
use crate::engines::generation::genome::Topology;
use crate::error::NeurotradeError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `NEUROTRADE__EVOLUTION__GENERATIONS=50`
pub const ENV_PREFIX: &str = "NEUROTRADE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub trading: TradingConfig,
    pub network: NetworkConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), NeurotradeError> {
        self.evolution.validate()?;
        self.trading.validate()?;
        self.network.validate()?;

        let expected_outputs = 2 * self.trading.symbols.len();
        if self.network.output_count != expected_outputs {
            return Err(invalid(
                NetworkConfig::section_name(),
                format!(
                    "output_count is {} but {} symbols need {}",
                    self.network.output_count,
                    self.trading.symbols.len(),
                    expected_outputs
                ),
            ));
        }
        Ok(())
    }

    /// Network shape for a universe with `feature_count` columns.
    ///
    /// The input is the current capital followed by `lookback` days of
    /// features.
    pub fn topology(&self, feature_count: usize) -> Result<Topology, NeurotradeError> {
        Topology::new(
            1 + self.trading.lookback * feature_count,
            self.network.layers(),
        )
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

    /// Layer a TOML file and `NEUROTRADE__*` environment variables on top
    /// of the defaults.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), NeurotradeError> {
        let path = path.as_ref();
        let config: AppConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .add_source(Self::environment())
            .build()
            .map_err(|e| {
                NeurotradeError::Configuration(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| NeurotradeError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());

        *self.write()? = config;
        Ok(())
    }

    /// Defaults plus environment overrides, for runs without a file.
    pub fn load_from_env(&self) -> Result<(), NeurotradeError> {
        let defaults = Config::try_from(&AppConfig::default())?;
        let config: AppConfig = Config::builder()
            .add_source(defaults)
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        config.validate()?;
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), NeurotradeError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| NeurotradeError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| NeurotradeError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, NeurotradeError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| NeurotradeError::Configuration("Config lock poisoned".to_string()))
    }

    pub fn update<F>(&self, f: F) -> Result<(), NeurotradeError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut updated = self.get()?;
        f(&mut updated);
        updated.validate()?;
        *self.write()? = updated;
        Ok(())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, NeurotradeError> {
        self.config
            .write()
            .map_err(|_| NeurotradeError::Configuration("Config lock poisoned".to_string()))
    }
}
