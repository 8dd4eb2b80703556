//! HTTP server for the asset cache
//!
//! Provides /ping, POST /{bucket}/upload, POST /{bucket}/url, and GET for
//! originals (`/{bucket}/{key}`) and derivatives
//! (`/{operations}/{WxH}/{bucket}/{key}`).

use crate::error::ApiError;
use crate::types::{PingResponse, UploadResponse};
use asset_cache::{
    Asset, AssetKey, Dimensions, Identifier, ImageMagickProber, ImageMagickTransformer,
    Ingestor, JpegOptimizer, Namespace, Namespaces, Optimizer, OriginCache, Prober, Stats,
    TransformCache, TransformSpec, Transformer,
};
use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Form, Multipart, Path, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const MAX_BODY_SIZE: usize = 150 * 1024 * 1024;

/// Shared state for the HTTP server
pub struct ServerState {
    pub namespaces: Namespaces,
    pub originals: OriginCache,
    pub derivatives: TransformCache,
    pub ingestor: Ingestor,
    pub stats: Arc<Stats>,
    pub cors_origins: Vec<String>,
    pub http: reqwest::Client,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(
        namespaces: Namespaces,
        cors_origins: Vec<String>,
        transformer: Arc<dyn Transformer>,
        prober: Arc<dyn Prober>,
        optimizer: Arc<dyn Optimizer>,
    ) -> Self {
        let stats = Arc::new(Stats::default());
        Self {
            namespaces,
            originals: OriginCache::new(stats.clone()),
            derivatives: TransformCache::new(transformer, optimizer.clone(), stats.clone()),
            ingestor: Ingestor::new(Identifier::new(prober), optimizer, stats.clone()),
            stats,
            cors_origins,
            http: reqwest::Client::new(),
            started_at: Utc::now(),
        }
    }

    /// State backed by the `convert`, `identify` and `jpegoptim` programs
    pub fn with_image_magick(namespaces: Namespaces, cors_origins: Vec<String>) -> Self {
        Self::new(
            namespaces,
            cors_origins,
            Arc::new(ImageMagickTransformer::new()),
            Arc::new(ImageMagickProber::new()),
            Arc::new(JpegOptimizer::new()),
        )
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/ping", get(ping))
        .route("/{bucket}/upload", post(upload))
        .route("/{bucket}/url", post(ingest_url))
        // originals and derivatives share a path shape the router cannot split
        .fallback(serve_asset)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::HEAD, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Start the HTTP server, returning after ctrl-c
pub async fn start_server(state: SharedState, bind: &str) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Starting HTTP server on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn ping(State(state): State<SharedState>) -> Json<PingResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(PingResponse {
        response: "pong".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs,
        stats: state.stats.snapshot(),
    })
}

/// A GET path resolved to what it names
#[derive(Debug, PartialEq)]
enum AssetRequest<'a> {
    Original {
        bucket: &'a str,
        key: &'a str,
    },
    Derivative {
        spec: TransformSpec,
        bucket: &'a str,
        key: &'a str,
    },
}

/// Paths whose second segment reads as dimensions are derivatives
fn parse_asset_path(path: &str) -> Result<AssetRequest<'_>, ApiError> {
    let parts: Vec<&str> = path.splitn(4, '/').collect();
    if let [operations, dimensions, bucket, key] = parts[..] {
        if !key.is_empty() && Dimensions::parse(dimensions).is_ok() {
            let spec = TransformSpec::parse(operations, dimensions)
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            return Ok(AssetRequest::Derivative { spec, bucket, key });
        }
    }

    match path.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() => Ok(AssetRequest::Original { bucket, key }),
        _ => Err(ApiError::NotFound(format!("No asset at /{}", path))),
    }
}

async fn serve_asset(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let raw = uri.path();
    let path = urlencoding::decode(raw.strip_prefix('/').unwrap_or(raw))
        .map_err(|_| ApiError::BadRequest("Invalid path encoding".to_string()))?;

    match parse_asset_path(&path)? {
        AssetRequest::Original { bucket, key } => {
            let namespace = state.namespaces.get(bucket)?;
            let key = AssetKey::new(key)?;
            let hit = is_cached(&namespace.local_path(&key)).await;

            let original = state.originals.fetch(&namespace, &key).await?;
            file_response(&original, namespace.cache_age(), hit).await
        }
        AssetRequest::Derivative { spec, bucket, key } => {
            let namespace = state.namespaces.get(bucket)?;
            let key = AssetKey::new(key)?;

            let original = state.originals.fetch(&namespace, &key).await?;
            let hit = is_cached(&spec.derived_path(&original.path)).await;
            let derived = state.derivatives.derive(&original, &spec).await;
            file_response(&derived, namespace.cache_age(), hit).await
        }
    }
}

async fn is_cached(path: &std::path::Path) -> bool {
    matches!(fs::try_exists(path).await, Ok(true))
}

/// Stream a cached file back to the client
async fn file_response(asset: &Asset, cache_age: u64, hit: bool) -> Result<Response, ApiError> {
    let file = fs::File::open(&asset.path).await.map_err(|e| {
        let msg = format!("{}: {}", asset.path.display(), e);
        match e.kind() {
            // a derivative whose transform failed is never written
            std::io::ErrorKind::NotFound => ApiError::NotFound(msg),
            _ => ApiError::Internal(msg),
        }
    })?;
    let size = file.metadata().await.map(|m| m.len()).ok();

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, format!("public, max-age={}", cache_age))
        .header("X-Cache", if hit { "HIT" } else { "MISS" });
    if let Some(mime) = &asset.mime_type {
        builder = builder.header(header::CONTENT_TYPE, mime.as_str());
    }
    if let Some(size) = size {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Receive a multipart `file` field and ingest it
async fn upload(
    State(state): State<SharedState>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let namespace = state.namespaces.get(&bucket)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let temp = temp_file_path("uploaded_file_");
        receive(&temp, field).await?;

        return ingest(&state, namespace, &temp, &filename).await;
    }

    Err(ApiError::BadRequest("Missing file field".to_string()))
}

#[derive(Debug, Deserialize)]
struct UrlForm {
    url: String,
}

/// Download a URL and ingest it like an upload
async fn ingest_url(
    State(state): State<SharedState>,
    Path(bucket): Path<String>,
    Form(form): Form<UrlForm>,
) -> Result<Json<UploadResponse>, ApiError> {
    let namespace = state.namespaces.get(&bucket)?;
    let filename = form.url.rsplit('/').next().unwrap_or_default().to_string();

    info!(url = %form.url, "Fetching");
    let response = state
        .http
        .get(&form.url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            warn!(url = %form.url, error = %e, "Failed to fetch url");
            ApiError::BadRequest(format!("Unable to fetch {}: {}", form.url, e))
        })?;

    let temp = temp_file_path("fetched_image_");
    receive(&temp, response.bytes_stream()).await?;

    ingest(&state, namespace, &temp, &filename).await
}

fn temp_file_path(prefix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{}{}", prefix, uuid::Uuid::new_v4().simple()))
}

/// Write a request or response body to `path`, removing it on failure
async fn receive<S, E>(path: &std::path::Path, body: S) -> Result<u64, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let result = write_body(path, body).await;
    if result.is_err() {
        remove_temp(path).await;
    }
    result
}

/// Best-effort removal of a received temp file
async fn remove_temp(path: &std::path::Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = ?path, error = %e, "Failed to remove temp file");
        }
    }
}

async fn write_body<S, E>(path: &std::path::Path, body: S) -> Result<u64, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut body = std::pin::pin!(body);
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| ApiError::Internal(format!("Unable to create temp file: {}", e)))?;

    let mut size = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        size += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    debug!(path = ?path, size, "Received body");
    Ok(size)
}

async fn ingest(
    state: &ServerState,
    namespace: Arc<Namespace>,
    temp: &std::path::Path,
    filename: &str,
) -> Result<Json<UploadResponse>, ApiError> {
    match state.ingestor.store(namespace, temp, filename).await {
        // replication keeps running after the response is sent
        Ok(upload) => {
            let response = UploadResponse::new(&upload.asset, filename);
            info!(id = %response.id, filename, size = %response.size, "Ingested");
            Ok(Json(response))
        }
        Err(e) => {
            remove_temp(temp).await;
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_cache::{CapabilityError, MemoryStore, Operation, ParseError, ProbeReport};
    use async_trait::async_trait;
    use axum::http::Request;
    use tempfile::tempdir;
    use tower::ServiceExt;

    /// Writes `<operation> <WxH>` instead of pixels
    struct EchoTransformer;

    #[async_trait]
    impl Transformer for EchoTransformer {
        async fn transform(
            &self,
            _source: &std::path::Path,
            operation: Operation,
            dimensions: &Dimensions,
            dest: &std::path::Path,
        ) -> Result<(), CapabilityError> {
            fs::write(dest, format!("{} {}", operation, dimensions))
                .await
                .map_err(|source| CapabilityError::Spawn {
                    program: "echo".to_string(),
                    source,
                })
        }
    }

    struct NoProber;

    #[async_trait]
    impl Prober for NoProber {
        async fn probe(&self, _path: &std::path::Path) -> Result<ProbeReport, CapabilityError> {
            Err(ParseError::new("no prober in tests").into())
        }
    }

    struct NoopOptimizer;

    #[async_trait]
    impl Optimizer for NoopOptimizer {
        async fn optimize(&self, _path: &std::path::Path) -> Result<(), CapabilityError> {
            Ok(())
        }
    }

    /// Always fails like a crashed `convert`
    struct FailingTransformer;

    #[async_trait]
    impl Transformer for FailingTransformer {
        async fn transform(
            &self,
            _source: &std::path::Path,
            _operation: Operation,
            _dimensions: &Dimensions,
            _dest: &std::path::Path,
        ) -> Result<(), CapabilityError> {
            Err(CapabilityError::Failed {
                program: "convert".to_string(),
                status: "exit status: 1".to_string(),
                output: "convert: no decode delegate".to_string(),
            })
        }
    }

    fn create_test_state(root: &std::path::Path) -> (SharedState, Arc<MemoryStore>) {
        create_test_state_with(root, Arc::new(EchoTransformer))
    }

    fn create_test_state_with(
        root: &std::path::Path,
        transformer: Arc<dyn Transformer>,
    ) -> (SharedState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut namespaces = Namespaces::new();
        namespaces.insert(Namespace::new(
            "photos",
            "photos-bucket",
            root,
            3600,
            store.clone(),
        ));
        let state = ServerState::new(
            namespaces,
            vec!["*".to_string()],
            transformer,
            Arc::new(NoProber),
            Arc::new(NoopOptimizer),
        );
        (Arc::new(state), store)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let boundary = "imagery-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[test]
    fn test_parse_original_path() {
        assert_eq!(
            parse_asset_path("photos/upload/abc.jpg").unwrap(),
            AssetRequest::Original {
                bucket: "photos",
                key: "upload/abc.jpg"
            }
        );
        assert!(parse_asset_path("photos").is_err());
        assert!(parse_asset_path("").is_err());
    }

    #[test]
    fn test_parse_derivative_path() {
        assert_eq!(
            parse_asset_path("resize/200x200/photos/upload/abc.jpg").unwrap(),
            AssetRequest::Derivative {
                spec: TransformSpec::parse("resize", "200x200").unwrap(),
                bucket: "photos",
                key: "upload/abc.jpg"
            }
        );

        // second segment is not dimensions, so this is an original
        assert_eq!(
            parse_asset_path("photos/a/b/c.jpg").unwrap(),
            AssetRequest::Original {
                bucket: "photos",
                key: "a/b/c.jpg"
            }
        );
    }

    #[tokio::test]
    async fn test_ping_endpoint() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router.oneshot(get("/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["response"], "pong");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert_eq!(json["stats"]["origin_hits"], 0);
    }

    #[tokio::test]
    async fn test_unknown_bucket_not_found() {
        let dir = tempdir().unwrap();
        let (state, store) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router.oneshot(get("/nope/a/cat.jpg")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("unknown namespace"));
        assert_eq!(store.open_calls(), 0);
    }

    #[tokio::test]
    async fn test_original_is_downloaded_then_cached() {
        let dir = tempdir().unwrap();
        let (state, store) = create_test_state(dir.path());
        store.insert("a/cat.jpg", &b"\xFF\xD8\xFFcat"[..]);
        let router = create_router(state);

        let response = router.clone().oneshot(get("/photos/a/cat.jpg")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/jpeg");
        assert_eq!(response.headers()["cache-control"], "public, max-age=3600");
        assert_eq!(response.headers()["x-cache"], "MISS");
        assert_eq!(body_bytes(response).await, b"\xFF\xD8\xFFcat");

        let response = router.oneshot(get("/photos/a/cat.jpg")).await.unwrap();
        assert_eq!(response.headers()["x-cache"], "HIT");
        assert_eq!(store.open_calls(), 1);
        assert!(dir.path().join("a/cat.jpg").exists());
    }

    #[tokio::test]
    async fn test_missing_original_not_found() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router.oneshot(get("/photos/missing.jpg")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_escaping_key_not_found() {
        let dir = tempdir().unwrap();
        let (state, store) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router
            .oneshot(get("/photos/..%2F..%2Fetc%2Fpasswd"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.open_calls(), 0);
    }

    #[tokio::test]
    async fn test_derivative_is_transformed_then_cached() {
        let dir = tempdir().unwrap();
        let (state, store) = create_test_state(dir.path());
        store.insert("a/cat.jpg", &b"\xFF\xD8\xFFcat"[..]);
        let router = create_router(state.clone());

        let response = router
            .clone()
            .oneshot(get("/resize/100x100/photos/a/cat.jpg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-cache"], "MISS");
        assert_eq!(response.headers()["content-type"], "image/jpeg");
        assert_eq!(body_bytes(response).await, b"resize 100x100");
        assert!(dir.path().join("a/cat.jpg+resize_100x100").exists());

        let response = router
            .oneshot(get("/resize/100x100/photos/a/cat.jpg"))
            .await
            .unwrap();
        assert_eq!(response.headers()["x-cache"], "HIT");

        let stats = state.stats.snapshot();
        assert_eq!(stats.derivative_misses, 1);
        assert_eq!(stats.derivative_hits, 1);
    }

    #[tokio::test]
    async fn test_failed_transform_not_found() {
        let dir = tempdir().unwrap();
        let (state, store) = create_test_state_with(dir.path(), Arc::new(FailingTransformer));
        store.insert("a/cat.jpg", &b"\xFF\xD8\xFFcat"[..]);
        let router = create_router(state);

        let response = router
            .oneshot(get("/resize/10x10/photos/a/cat.jpg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!dir.path().join("a/cat.jpg+resize_10x10").exists());
    }

    #[tokio::test]
    async fn test_remove_temp_ignores_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("uploaded_file_gone");
        remove_temp(&path).await;

        fs::write(&path, b"partial").await.unwrap();
        remove_temp(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_derivative_of_missing_original_not_found() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router
            .oneshot(get("/fill/10x10/photos/missing.jpg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_to_asset_not_allowed() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/photos/a/cat.jpg")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_upload_stores_content_addressed_file() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state.clone());

        let response = router
            .oneshot(multipart("/photos/upload", "file", "notes.txt", b"hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: UploadResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            json.id,
            "photos-bucket/upload/2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824.txt"
        );
        assert_eq!(json.filename, "notes.txt");
        assert_eq!(json.format, "text/plain; charset=utf-8");
        assert_eq!(json.size, "5");

        let local = dir
            .path()
            .join(json.id.trim_start_matches("photos-bucket/"));
        assert_eq!(std::fs::read(local).unwrap(), b"hello");
        assert_eq!(state.stats.snapshot().uploads, 1);
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router
            .oneshot(multipart("/photos/upload", "attachment", "x.txt", b"x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_to_unknown_bucket() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let response = router
            .oneshot(multipart("/nope/upload", "file", "x.txt", b"x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_url_fetch_failure_is_bad_request() {
        let dir = tempdir().unwrap();
        let (state, _) = create_test_state(dir.path());
        let router = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/photos/url")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("url=http%3A%2F%2F127.0.0.1%3A1%2Fcat.jpg"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
