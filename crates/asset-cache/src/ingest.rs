//! Content-addressed ingestion of uploads and their background replication

use crate::capability::Optimizer;
use crate::error::Result;
use crate::identify::Identifier;
use crate::materialize;
use crate::namespace::Namespace;
use crate::types::{Asset, Stats};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Hex SHA-256 of a file's contents
pub async fn content_hash(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// A stored upload and its detached replication task
pub struct Upload {
    /// Carries the combined `<bucket>/<key>` as its key
    pub asset: Asset,
    /// Dropping the handle leaves replication running
    pub replication: JoinHandle<()>,
}

/// Moves uploads into the origin cache under `upload/<sha256><ext>` and
/// copies them to the remote store in the background.
///
/// Replication is best-effort: failures are logged, never retried, and
/// nothing records that a local upload is still missing remotely.
#[derive(Clone)]
pub struct Ingestor {
    identifier: Identifier,
    optimizer: Arc<dyn Optimizer>,
    stats: Arc<Stats>,
}

impl Ingestor {
    pub fn new(identifier: Identifier, optimizer: Arc<dyn Optimizer>, stats: Arc<Stats>) -> Self {
        Self {
            identifier,
            optimizer,
            stats,
        }
    }

    pub async fn store(
        &self,
        namespace: Arc<Namespace>,
        temp_path: &Path,
        original_filename: &str,
    ) -> Result<Upload> {
        let mut asset = Asset {
            path: temp_path.to_path_buf(),
            original_filename: Some(original_filename.to_string()),
            ..Default::default()
        };
        self.identifier.identify(&mut asset).await;
        debug!(path = ?temp_path, filename = original_filename, size = asset.size, "Temporary upload");

        let hash = content_hash(temp_path).await?;
        let key = format!("upload/{}{}", hash, asset.extension);
        let local_path = namespace.root().join(&key);

        materialize::relocate(temp_path, &local_path).await?;
        self.stats.upload();
        info!(namespace = namespace.name(), key = %key, path = ?local_path, "Stored upload");

        let replication = {
            let ingestor = self.clone();
            let namespace = namespace.clone();
            let path = local_path.clone();
            let key = key.clone();
            tokio::spawn(async move { ingestor.replicate(&namespace, &path, &key).await })
        };

        asset.path = local_path;
        asset.key = format!("{}/{}", namespace.bucket(), key);

        Ok(Upload { asset, replication })
    }

    /// Copy a local file to the remote store unless the key already exists
    pub async fn replicate(&self, namespace: &Namespace, path: &Path, key: &str) {
        match namespace.store().exists(key).await {
            Ok(true) => {
                info!(key, "Already replicated");
                self.stats.replication_skipped();
                return;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(key, error = %e, "Failed to check remote object");
                self.stats.replication_failed();
                return;
            }
        }

        if let Err(e) = self.optimizer.optimize(path).await {
            warn!(path = ?path, error = %e, "Optimize failed");
        }

        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read upload");
                self.stats.replication_failed();
                return;
            }
        };

        info!(key, size = data.len(), "Uploading");
        match namespace.store().save(key, Bytes::from(data)).await {
            Ok(()) => {
                info!(key, "Uploaded");
                self.stats.replication_completed();
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to upload");
                self.stats.replication_failed();
            }
        }
    }
}
