//! Imagery server library
//!
//! HTTP surface over the asset cache: config loading, router and handlers.

pub mod config;
pub mod error;
pub mod server;
pub mod types;

pub use config::{Args, Config};
pub use error::{ApiError, Result, ServerError};
pub use server::{create_router, start_server, ServerState, SharedState};
pub use types::{PingResponse, UploadResponse};
