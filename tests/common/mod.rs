#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use tempfile::TempDir;
use tower::ServiceExt;

use gamesite_admin::{
    config::{Config, DatabaseConfig},
    database::Database,
    web::{build_router, AppState},
};

/// Smallest byte string `image::guess_format` recognises as a GIF
pub const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub uploads: TempDir,
    /// Holds the database file for file-backed apps
    pub data: Option<TempDir>,
}

impl TestApp {
    /// Files currently in the uploads directory
    pub fn upload_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Whether a public `/uploads/...` path exists on disk
    pub fn upload_exists(&self, public_path: &str) -> bool {
        let name = public_path.trim_start_matches("/uploads/");
        self.uploads.path().join(name).exists()
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

/// App whose aggregator endpoint points at a closed local port
pub async fn test_app() -> TestApp {
    test_app_with_endpoint("http://127.0.0.1:9/getgameurl").await
}

pub async fn test_app_with_endpoint(endpoint: &str) -> TestApp {
    let database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
    };
    build_app(endpoint, database, None).await
}

/// App backed by a database file with a pool of `connections`, so that
/// concurrent requests run on separate connections
pub async fn test_app_on_disk(connections: u32) -> TestApp {
    let data = tempfile::tempdir().unwrap();
    let database = DatabaseConfig {
        url: format!("sqlite://{}", data.path().join("admin.db").display()),
        max_connections: Some(connections),
    };
    build_app("http://127.0.0.1:9/getgameurl", database, Some(data)).await
}

async fn build_app(endpoint: &str, database: DatabaseConfig, data: Option<TempDir>) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.database = database;
    config.storage.uploads_path = uploads.path().to_path_buf();
    config.game_launch.endpoint = endpoint.to_string();
    config.game_launch.token = "secret".to_string();
    config.game_launch.timeout_secs = 2;
    config.game_launch.max_attempts = 1;
    config.game_launch.initial_backoff_ms = 1;
    config.game_launch.max_backoff_ms = 1;

    let database = Database::new(&config.database).await.unwrap();
    database.migrate().await.unwrap();
    let pool = database.pool();

    let state = AppState::new(config, database).unwrap();
    TestApp {
        router: build_router(state),
        pool,
        uploads,
        data,
    }
}

async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

/// Send a request with an optional JSON body
pub async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder().method(method).uri(uri);

    let request = if let Some(body) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    into_json(app.clone().oneshot(request).await.unwrap()).await
}

/// Multipart body builder
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    const BOUNDARY: &'static str = "gamesite-test-boundary";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                Self::BOUNDARY,
                name,
                value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                Self::BOUNDARY,
                name,
                file_name,
                content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Attach the sample GIF under `name`
    pub fn image(self, name: &str) -> Self {
        self.file(name, "image.gif", "image/gif", GIF)
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
        self.body
    }
}

pub async fn send_multipart(
    app: &Router,
    method: Method,
    uri: &str,
    form: Multipart,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", Multipart::BOUNDARY),
        )
        .body(Body::from(form.finish()))
        .unwrap();

    into_json(app.clone().oneshot(request).await.unwrap()).await
}

/// Throwaway aggregator answering every call with `status` and `body`
pub struct MockAggregator {
    pub endpoint: String,
    hits: Arc<AtomicU32>,
}

impl MockAggregator {
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let hits = Arc::new(AtomicU32::new(0));

        async fn handler(
            State((hits, status, body)): State<(Arc<AtomicU32>, StatusCode, &'static str)>,
        ) -> (StatusCode, &'static str) {
            hits.fetch_add(1, Ordering::SeqCst);
            (status, body)
        }

        let app = Router::new()
            .route("/getgameurl", post(handler))
            .with_state((hits.clone(), status, body));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{}/getgameurl", addr),
            hits,
        }
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}
