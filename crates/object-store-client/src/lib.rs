//! Object Store Client
//!
//! Minimal HTTP client for a path-style object store, addressing objects as
//! `<endpoint>/<bucket>/<key>`. Supports existence checks (HEAD), streaming
//! reads (GET) and whole-object writes (PUT).

pub mod client;
pub mod error;

pub use client::{ObjectStoreClient, ObjectStream};
pub use error::{ObjectStoreError, Result};
