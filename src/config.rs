use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::borders::{CodeOverrides, DatasetSource};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub borders: BordersConfig,
    pub overrides: Option<CodeOverrides>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BordersConfig {
    /// File path (optionally `.gz`) or http(s) URL
    pub source: String,
}

impl Default for BordersConfig {
    fn default() -> Self {
        Self {
            source: "data/countryBorders.geo.json".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Config file if given, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn dataset_source(&self) -> DatasetSource {
        DatasetSource::parse(&self.borders.source)
    }

    /// Configured overrides; the Natural Earth table when the section is absent
    pub fn code_overrides(&self) -> CodeOverrides {
        self.overrides
            .clone()
            .unwrap_or_else(CodeOverrides::natural_earth)
    }
}
