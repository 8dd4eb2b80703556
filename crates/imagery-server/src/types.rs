//! Response bodies

use asset_cache::{Asset, CacheStats};
use serde::{Deserialize, Serialize};

/// `/ping` response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub response: String,
    pub version: String,
    pub uptime_secs: u64,
    pub stats: CacheStats,
}

/// Result of an upload or URL ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    /// `<bucket>/<key>`
    pub id: String,
    pub filename: String,
    /// Mime type, empty when unknown
    pub format: String,
    /// Byte count as a decimal string
    pub size: String,
}

impl UploadResponse {
    pub fn new(asset: &Asset, filename: &str) -> Self {
        Self {
            id: asset.key.clone(),
            filename: filename.to_string(),
            format: asset.mime_type.clone().unwrap_or_default(),
            size: asset.size.to_string(),
        }
    }
}
