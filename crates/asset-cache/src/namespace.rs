//! Storage namespaces (buckets) and their registry

use crate::error::{AssetError, Result};
use crate::remote::{DirectoryStore, HttpRemoteStore, MemoryStore, RemoteStore};
use crate::types::AssetKey;
use object_store_client::ObjectStoreClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_CACHE_AGE: u64 = 24 * 60 * 60;

fn default_cache_age() -> u64 {
    DEFAULT_CACHE_AGE
}

/// Remote backend of a namespace
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RemoteConfig {
    Http {
        url: String,
        #[serde(default)]
        token: Option<String>,
    },
    Directory {
        path: PathBuf,
    },
    Memory,
}

/// Configuration of one bucket as it appears in the config file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    pub bucket: String,
    pub root: PathBuf,
    #[serde(default = "default_cache_age")]
    pub cache_age: u64,
    pub remote: RemoteConfig,
}

/// A configured bucket: local cache root plus its remote store
pub struct Namespace {
    name: String,
    bucket: String,
    root: PathBuf,
    cache_age: u64,
    store: Arc<dyn RemoteStore>,
}

impl Namespace {
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        root: impl Into<PathBuf>,
        cache_age: u64,
        store: Arc<dyn RemoteStore>,
    ) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            root: root.into(),
            cache_age,
            store,
        }
    }

    /// Build a namespace and its remote backend from configuration
    pub fn from_config(name: &str, config: &StorageConfig) -> Result<Self> {
        if config.bucket.is_empty() {
            return Err(AssetError::Config(format!("storage {:?} has no bucket", name)));
        }
        if config.root.as_os_str().is_empty() {
            return Err(AssetError::Config(format!("storage {:?} has no root", name)));
        }

        let store: Arc<dyn RemoteStore> = match &config.remote {
            RemoteConfig::Http { url, token } => {
                let mut client = ObjectStoreClient::new(url, &config.bucket)
                    .map_err(|e| AssetError::Config(format!("storage {:?}: {}", name, e)))?;
                if let Some(token) = token {
                    client = client.with_token(token.clone());
                }
                Arc::new(HttpRemoteStore::new(client))
            }
            RemoteConfig::Directory { path } => Arc::new(DirectoryStore::new(path.clone())),
            RemoteConfig::Memory => Arc::new(MemoryStore::new()),
        };

        Ok(Self::new(
            name,
            config.bucket.clone(),
            config.root.clone(),
            config.cache_age,
            store,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Max-age for Cache-Control headers, in seconds
    pub fn cache_age(&self) -> u64 {
        self.cache_age
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    /// `<root>/<key>`
    pub fn local_path(&self, key: &AssetKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

/// Immutable name -> namespace registry
#[derive(Default, Clone)]
pub struct Namespaces {
    entries: HashMap<String, Arc<Namespace>>,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &HashMap<String, StorageConfig>) -> Result<Self> {
        let mut namespaces = Self::new();
        for (name, config) in configs {
            namespaces.insert(Namespace::from_config(name, config)?);
        }
        Ok(namespaces)
    }

    pub fn insert(&mut self, namespace: Namespace) {
        self.entries
            .insert(namespace.name().to_string(), Arc::new(namespace));
    }

    pub fn get(&self, name: &str) -> Result<Arc<Namespace>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("unknown namespace: {}", name)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
