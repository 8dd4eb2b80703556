//! Core asset types

use crate::dimensions::Dimensions;
use crate::error::{AssetError, Result};
use crate::mime::{extension_of, mime_for_extension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Key of a blob within a namespace, always a relative path below its root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let valid = !key.is_empty()
            && !key.contains('\0')
            && Path::new(&key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !valid {
            return Err(AssetError::InvalidKey(key));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata for a locally cached file.
///
/// `dimensions` and `format` are filled in by the identifier; `None` means
/// "not identified yet", not "not an image".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    pub key: String,
    pub path: PathBuf,
    pub original_filename: Option<String>,
    pub size: u64,
    pub mime_type: Option<String>,
    pub extension: String,
    pub dimensions: Option<Dimensions>,
    pub format: Option<String>,
}

impl Asset {
    /// Asset for a local file, with extension and mime inferred from `key`
    pub fn from_key(key: &str, path: PathBuf) -> Self {
        let extension = extension_of(key).to_string();
        Self {
            key: key.to_string(),
            path,
            mime_type: mime_for_extension(&extension).map(str::to_string),
            extension,
            ..Default::default()
        }
    }

    /// The name extension and mime are derived from
    pub fn source_filename(&self) -> String {
        match &self.original_filename {
            Some(name) => name.clone(),
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Statistics about cache activity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub origin_hits: u64,
    pub origin_misses: u64,
    pub derivative_hits: u64,
    pub derivative_misses: u64,
    pub uploads: u64,
    pub replications_completed: u64,
    pub replications_skipped: u64,
    pub replications_failed: u64,
}

/// Shared counters behind [`CacheStats`]
#[derive(Debug, Default)]
pub struct Stats {
    origin_hits: AtomicU64,
    origin_misses: AtomicU64,
    derivative_hits: AtomicU64,
    derivative_misses: AtomicU64,
    uploads: AtomicU64,
    replications_completed: AtomicU64,
    replications_skipped: AtomicU64,
    replications_failed: AtomicU64,
}

impl Stats {
    pub(crate) fn origin(&self, hit: bool) {
        let counter = if hit {
            &self.origin_hits
        } else {
            &self.origin_misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn derivative(&self, hit: bool) {
        let counter = if hit {
            &self.derivative_hits
        } else {
            &self.derivative_misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn replication_completed(&self) {
        self.replications_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn replication_skipped(&self) {
        self.replications_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn replication_failed(&self) {
        self.replications_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            origin_hits: self.origin_hits.load(Ordering::Relaxed),
            origin_misses: self.origin_misses.load(Ordering::Relaxed),
            derivative_hits: self.derivative_hits.load(Ordering::Relaxed),
            derivative_misses: self.derivative_misses.load(Ordering::Relaxed),
            uploads: self.uploads.load(Ordering::Relaxed),
            replications_completed: self.replications_completed.load(Ordering::Relaxed),
            replications_skipped: self.replications_skipped.load(Ordering::Relaxed),
            replications_failed: self.replications_failed.load(Ordering::Relaxed),
        }
    }
}
