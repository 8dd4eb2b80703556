//! Disk-backed image asset cache
//!
//! Serves originals from a two-tier local cache in front of a remote object
//! store: one tier holds verbatim originals fetched on first access, the
//! other holds per-transform derivatives computed on first access. Uploads
//! are content-addressed on disk and replicated to the remote store in the
//! background.

mod capability;
mod derive;
mod dimensions;
mod error;
mod identify;
mod ingest;
mod magick;
mod materialize;
mod mime;
mod namespace;
mod origin;
mod remote;
mod transform;
mod types;

pub use capability::{CapabilityError, Optimizer, ProbeReport, Prober, Transformer};
pub use derive::TransformCache;
pub use dimensions::{Dimensions, ParseError};
pub use error::{AssetError, Result};
pub use identify::{is_image_header, Identifier, HEADER_LEN};
pub use ingest::{content_hash, Ingestor, Upload};
pub use magick::{ImageMagickProber, ImageMagickTransformer, JpegOptimizer};
pub use mime::{extension_for_format, extension_of, mime_for_extension};
pub use namespace::{Namespace, Namespaces, RemoteConfig, StorageConfig};
pub use origin::OriginCache;
pub use remote::{
    ByteStream, DirectoryStore, HttpRemoteStore, MemoryStore, RemoteError, RemoteStore,
};
pub use transform::{Operation, TransformSpec};
pub use types::{Asset, AssetKey, CacheStats, Stats};
