//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/weaver/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub circuit: CircuitConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Defaults applied when authoring a new circuit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitConfig {
    #[serde(default = "default_rounds")]
    pub default_rounds: u32,

    #[serde(default = "default_rest_seconds")]
    pub default_rest_seconds: u32,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            default_rounds: default_rounds(),
            default_rest_seconds: default_rest_seconds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("weaver")
}

fn default_rounds() -> u32 {
    3
}

fn default_rest_seconds() -> u32 {
    crate::scheduler::DEFAULT_REST_SECONDS
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.circuit.default_rounds == 0 {
            return Err(Error::Config(
                "circuit.default_rounds must be at least 1".into(),
            ));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("weaver").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.circuit.default_rounds, 3);
        assert_eq!(config.circuit.default_rest_seconds, 60);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.circuit.default_rounds, parsed.circuit.default_rounds);
        assert_eq!(
            config.circuit.default_rest_seconds,
            parsed.circuit.default_rest_seconds
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[circuit]
default_rounds = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.circuit.default_rounds, 5);
        assert_eq!(config.circuit.default_rest_seconds, 60); // default
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[circuit]\ndefault_rounds = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
