//! Local cache of verbatim originals, filled from the remote store

use crate::error::{AssetError, Result};
use crate::materialize;
use crate::namespace::Namespace;
use crate::remote::RemoteStore;
use crate::types::{Asset, AssetKey, Stats};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Resolves keys to local original files, downloading on first access.
///
/// A file already present under the namespace root is trusted as-is:
/// remote content is immutable once cached.
#[derive(Clone, Default)]
pub struct OriginCache {
    stats: Arc<Stats>,
}

impl OriginCache {
    pub fn new(stats: Arc<Stats>) -> Self {
        Self { stats }
    }

    pub async fn fetch(&self, namespace: &Namespace, key: &AssetKey) -> Result<Asset> {
        let path = namespace.local_path(key);

        if matches!(fs::try_exists(&path).await, Ok(true)) {
            self.stats.origin(true);
            debug!(namespace = namespace.name(), key = %key, "Origin cache hit");
            return Ok(Asset::from_key(key.as_str(), path));
        }

        self.stats.origin(false);

        // runs to completion even when the caller is dropped
        let store = namespace.store().clone();
        let name = namespace.name().to_string();
        let task = {
            let key = key.clone();
            let path = path.clone();
            tokio::spawn(async move { download(store, &name, &key, &path).await })
        };
        let size = task
            .await
            .map_err(|e| AssetError::NotFound(format!("{}: {}", key, e)))??;

        debug!(key = %key, size, "Cached original");
        Ok(Asset::from_key(key.as_str(), path))
    }
}

/// Stream a remote object into the local cache
async fn download(
    store: Arc<dyn RemoteStore>,
    namespace: &str,
    key: &AssetKey,
    path: &Path,
) -> Result<u64> {
    let mut remote = store.open(key.as_str()).await.map_err(|e| {
        warn!(namespace, key = %key, error = %e, "Failed to open remote object");
        AssetError::Remote(e)
    })?;

    info!(namespace, key = %key, path = ?path, "Downloading original");

    materialize::write_stream(path, &mut remote)
        .await
        .map_err(|e| {
            warn!(path = ?path, error = %e, "Failed to cache original");
            AssetError::NotFound(format!("{}: {}", key, e))
        })
}
