//! Command line and config file

use crate::error::Result;
use asset_cache::{Namespaces, StorageConfig};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "imagery", version, about = "Image asset cache and transform server")]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "localhost:3000")]
    pub bind: String,

    /// YAML config file
    pub config_file: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// CORS allow-list; "*" allows any origin
    #[serde(default)]
    pub origins: Vec<String>,
    #[serde(default)]
    pub storages: HashMap<String, StorageConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn namespaces(&self) -> Result<Namespaces> {
        Ok(Namespaces::from_configs(&self.storages)?)
    }
}
