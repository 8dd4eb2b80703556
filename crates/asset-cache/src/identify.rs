//! Image identification by header sniffing and external probing

use crate::capability::Prober;
use crate::mime::{extension_for_format, extension_of, mime_for_extension};
use crate::types::Asset;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Number of leading bytes inspected for magic numbers
pub const HEADER_LEN: usize = 261;

/// Whether the leading bytes of a file match a known image signature
pub fn is_image_header(header: &[u8]) -> bool {
    image::guess_format(header).is_ok()
}

/// Fills in size, mime and (for images) format and dimensions of an asset
#[derive(Clone)]
pub struct Identifier {
    prober: Arc<dyn Prober>,
}

impl Identifier {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Identify `asset` in place.
    ///
    /// Does nothing once dimensions are known. Files that are not images
    /// never get dimensions, so they are re-sniffed on every call. Failures
    /// are logged and leave the asset usable as an opaque file.
    pub async fn identify(&self, asset: &mut Asset) {
        if asset.dimensions.is_some() {
            return;
        }

        let filename = asset.source_filename();
        asset.extension = extension_of(&filename).to_string();
        asset.mime_type = mime_for_extension(&asset.extension).map(str::to_string);

        let mut file = match File::open(&asset.path).await {
            Ok(file) => file,
            Err(e) => {
                warn!(path = ?asset.path, error = %e, "Failed to open file for identification");
                return;
            }
        };

        match file.metadata().await {
            Ok(metadata) => asset.size = metadata.len(),
            Err(e) => {
                warn!(path = ?asset.path, error = %e, "Failed to stat file");
                return;
            }
        }

        let mut header = Vec::with_capacity(HEADER_LEN);
        if let Err(e) = (&mut file)
            .take(HEADER_LEN as u64)
            .read_to_end(&mut header)
            .await
        {
            warn!(path = ?asset.path, error = %e, "Failed to read file header");
            return;
        }

        if !is_image_header(&header) {
            debug!(path = ?asset.path, size = asset.size, "Not an image");
            return;
        }

        match self.prober.probe(&asset.path).await {
            Ok(report) => {
                asset.extension = extension_for_format(&report.format).to_string();
                asset.format = Some(report.format);
                asset.dimensions = Some(report.dimensions);
                debug!(
                    path = ?asset.path,
                    format = ?asset.format,
                    dimensions = ?asset.dimensions.as_ref().map(|d| d.as_str()),
                    "Identified image"
                );
            }
            Err(e) => {
                warn!(path = ?asset.path, error = %e, "Failed to probe image");
            }
        }
    }
}
