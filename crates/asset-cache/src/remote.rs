//! Remote object store boundary and its backends

use async_trait::async_trait;
use bytes::Bytes;
use object_store_client::{ObjectStoreClient, ObjectStoreError};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Readable body of a remote blob
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

#[derive(Debug)]
pub enum RemoteError {
    NotFound(String),
    Io(Box<std::io::Error>),
    Backend(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::NotFound(key) => write!(f, "Remote object not found: {}", key),
            RemoteError::Io(err) => write!(f, "IO error: {}", err),
            RemoteError::Backend(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(err: std::io::Error) -> Self {
        RemoteError::Io(Box::new(err))
    }
}

impl From<ObjectStoreError> for RemoteError {
    fn from(err: ObjectStoreError) -> Self {
        RemoteError::Backend(err.to_string())
    }
}

/// Key/value blob store holding the durable copy of every original
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, RemoteError>;

    async fn open(&self, key: &str) -> Result<ByteStream, RemoteError>;

    async fn save(&self, key: &str, data: Bytes) -> Result<(), RemoteError>;
}

/// Bucket on an HTTP object store
pub struct HttpRemoteStore {
    client: ObjectStoreClient,
}

impl HttpRemoteStore {
    pub fn new(client: ObjectStoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn exists(&self, key: &str) -> Result<bool, RemoteError> {
        Ok(self.client.head(key).await?)
    }

    async fn open(&self, key: &str) -> Result<ByteStream, RemoteError> {
        match self.client.get(key).await {
            Ok(stream) => Ok(Box::pin(StreamReader::new(stream))),
            Err(e) if e.is_not_found() => Err(RemoteError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, data: Bytes) -> Result<(), RemoteError> {
        let content_type = crate::mime::mime_for_extension(crate::mime::extension_of(key));
        Ok(self.client.put(key, data, content_type).await?)
    }
}

/// "Remote" store rooted at a local directory
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl RemoteStore for DirectoryStore {
    async fn exists(&self, key: &str) -> Result<bool, RemoteError> {
        Ok(tokio::fs::try_exists(self.root.join(key)).await?)
    }

    async fn open(&self, key: &str) -> Result<ByteStream, RemoteError> {
        match tokio::fs::File::open(self.root.join(key)).await {
            Ok(file) => Ok(Box::pin(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RemoteError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, data: Bytes) -> Result<(), RemoteError> {
        let path = self.root.join(key);
        crate::materialize::write_bytes(&path, &data).await?;
        debug!(path = ?path, size = data.len(), "Saved to directory store");
        Ok(())
    }
}

/// In-process store that counts the calls it receives
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Bytes>>,
    exists_calls: AtomicU64,
    open_calls: AtomicU64,
    save_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting a save
    pub fn insert(&self, key: &str, data: impl Into<Bytes>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), data.into());
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn exists_calls(&self) -> u64 {
        self.exists_calls.load(Ordering::Relaxed)
    }

    pub fn open_calls(&self) -> u64 {
        self.open_calls.load(Ordering::Relaxed)
    }

    pub fn save_calls(&self) -> u64 {
        self.save_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, RemoteError> {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects.contains_key(key))
    }

    async fn open(&self, key: &str) -> Result<ByteStream, RemoteError> {
        self.open_calls.fetch_add(1, Ordering::Relaxed);
        let data = {
            let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
            objects.get(key).cloned()
        };
        match data {
            Some(data) => Ok(Box::pin(std::io::Cursor::new(data))),
            None => Err(RemoteError::NotFound(key.to_string())),
        }
    }

    async fn save(&self, key: &str, data: Bytes) -> Result<(), RemoteError> {
        self.save_calls.fetch_add(1, Ordering::Relaxed);
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects.insert(key.to_string(), data);
        Ok(())
    }
}
