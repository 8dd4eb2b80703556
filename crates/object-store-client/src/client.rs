//! HTTP object store client

use crate::error::{ObjectStoreError, Result};
use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::{Client, StatusCode};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Streaming body of an object, yielding chunks as they arrive
pub type ObjectStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

const USER_AGENT: &str = "object-store-client-rs/0.1";

/// Client for a single bucket on a path-style object store
#[derive(Clone)]
pub struct ObjectStoreClient {
    client: Client,
    endpoint: Url,
    bucket: String,
    token: Option<String>,
}

impl ObjectStoreClient {
    /// Create a client for `bucket` on the store at `endpoint`
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            bucket: bucket.to_string(),
            token: None,
        })
    }

    /// Authenticate every request with a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Build the URL of an object, percent-encoding each key segment
    pub fn object_url(&self, key: &str) -> Result<Url> {
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let url = format!(
            "{}/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(&self.bucket),
            encoded_key
        );

        Ok(Url::parse(&url)?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check whether an object exists
    pub async fn head(&self, key: &str) -> Result<bool> {
        let url = self.object_url(key)?;
        debug!(url = %url, "HEAD object");

        let response = self.authorize(self.client.head(url.clone())).send().await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                warn!(status = %status, url = %url, "Unexpected HEAD status");
                Err(ObjectStoreError::Status(status.as_u16(), url.to_string()))
            }
        }
    }

    /// Open an object for streaming reads
    pub async fn get(&self, key: &str) -> Result<ObjectStream> {
        let url = self.object_url(key)?;
        debug!(url = %url, "GET object");

        let response = self.authorize(self.client.get(url.clone())).send().await?;

        if !response.status().is_success() {
            return Err(ObjectStoreError::Status(
                response.status().as_u16(),
                url.to_string(),
            ));
        }

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(stream))
    }

    /// Write a whole object
    pub async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()> {
        let url = self.object_url(key)?;
        let size = data.len();
        debug!(url = %url, size, "PUT object");

        let mut request = self
            .client
            .put(url.clone())
            .header("x-amz-acl", "public-read-write")
            .body(data);
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Failed to store object");
            return Err(ObjectStoreError::Status(
                response.status().as_u16(),
                url.to_string(),
            ));
        }

        Ok(())
    }
}
