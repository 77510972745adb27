use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use super::retry::{with_retry, RetryConfig};
use super::LaunchRequest;
use crate::config::GameLaunchConfig;
use crate::errors::GameLaunchError;
use crate::utils;

/// HTTP client for the aggregator's `getgameurl` endpoint
#[derive(Clone)]
pub struct GameLaunchClient {
    http: reqwest::Client,
    endpoint: url::Url,
    token: String,
    token_header: HeaderName,
    token_value: HeaderValue,
    username_suffix: String,
    retry: RetryConfig,
}

impl GameLaunchClient {
    pub fn new(config: &GameLaunchConfig) -> Result<Self, GameLaunchError> {
        let configuration = |message: String| GameLaunchError::Configuration { message };

        let endpoint = url::Url::parse(&config.endpoint)
            .map_err(|e| configuration(format!("invalid endpoint '{}': {}", config.endpoint, e)))?;
        let token_header = HeaderName::from_bytes(config.token_header.as_bytes())
            .map_err(|e| configuration(format!("invalid token header: {}", e)))?;
        let token_value = HeaderValue::from_str(&config.token)
            .map_err(|e| configuration(format!("invalid token: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("gamesite-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| configuration(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            token: config.token.clone(),
            token_header,
            token_value,
            username_suffix: config.username_suffix.clone(),
            retry: RetryConfig::from(config),
        })
    }

    /// Ask the aggregator for a launch URL, retrying transient failures
    pub async fn launch(&self, request: &LaunchRequest) -> Result<String, GameLaunchError> {
        info!(
            "Launching game {} for {} (money {})",
            request.game_id, request.username, request.money
        );

        let result = with_retry(&self.retry, || self.attempt(request), "getgameurl").await;
        if let Err(e) = &result {
            error!(
                "Game launch failed for {} / {}: {}",
                request.username, request.game_id, e
            );
        }
        result
    }

    async fn attempt(&self, request: &LaunchRequest) -> Result<String, GameLaunchError> {
        let username = format!("{}{}", request.username, self.username_suffix);
        let form = [
            ("token", self.token.as_str()),
            ("username", username.as_str()),
            ("gameID", request.game_id.as_str()),
            ("money", request.money.as_str()),
        ];

        debug!(
            "POST {} username={} gameID={} money={}",
            self.endpoint, username, request.game_id, request.money
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(self.token_header.clone(), self.token_value.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| GameLaunchError::Unreachable {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GameLaunchError::Unreachable {
                message: e.to_string(),
            })?;
        debug!("Aggregator responded {}: {}", status, body);

        if !status.is_success() {
            return Err(GameLaunchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        extract_game_url(&body).ok_or(GameLaunchError::MalformedResponse { body })
    }
}

/// Find the launch URL in an aggregator response body
///
/// Checked in order: JSON `url`, JSON `game_url`, a JSON string, then the
/// raw body if it is an absolute http(s) URL.
pub fn extract_game_url(body: &str) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["url", "game_url"]
            .iter()
            .find_map(|key| map.get(*key).and_then(non_empty)),
        Ok(Value::String(s)) if utils::is_http_url(&s) => Some(s.trim().to_string()),
        Ok(_) => None,
        Err(_) if utils::is_http_url(body) => Some(body.trim().to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Form, Router};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_extract_game_url_order() {
        assert_eq!(
            extract_game_url(r#"{"url":"https://a.example/1","game_url":"https://b.example/2"}"#),
            Some("https://a.example/1".to_string())
        );
        assert_eq!(
            extract_game_url(r#"{"code":0,"game_url":"https://b.example/2"}"#),
            Some("https://b.example/2".to_string())
        );
        assert_eq!(
            extract_game_url(r#""https://c.example/3""#),
            Some("https://c.example/3".to_string())
        );
        assert_eq!(
            extract_game_url("https://d.example/4\n"),
            Some("https://d.example/4".to_string())
        );
    }

    #[test]
    fn test_extract_game_url_rejects_unusable_bodies() {
        assert_eq!(extract_game_url("{}"), None);
        assert_eq!(extract_game_url(r#"{"url":""}"#), None);
        assert_eq!(extract_game_url(r#"{"url":42}"#), None);
        assert_eq!(extract_game_url(r#""not a url""#), None);
        assert_eq!(extract_game_url("<html>error</html>"), None);
        assert_eq!(extract_game_url(""), None);
    }

    fn config(endpoint: String) -> GameLaunchConfig {
        GameLaunchConfig {
            endpoint,
            token: "secret".to_string(),
            token_header: "x-api-key".to_string(),
            username_suffix: "45".to_string(),
            timeout_secs: 5,
            max_attempts: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
        }
    }

    fn request() -> LaunchRequest {
        LaunchRequest {
            game_id: "crash".to_string(),
            username: "player".to_string(),
            money: "100".to_string(),
        }
    }

    /// Aggregator that fails with 503 `failures` times, then echoes a URL
    /// built from the submitted form
    async fn spawn_aggregator(failures: u32) -> (String, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));

        async fn handler(
            State((hits, failures)): State<(Arc<AtomicU32>, u32)>,
            headers: axum::http::HeaderMap,
            Form(form): Form<HashMap<String, String>>,
        ) -> (StatusCode, String) {
            let n = hits.fetch_add(1, Ordering::SeqCst);
            if headers.get("x-api-key").map(|v| v.as_bytes()) != Some(&b"secret"[..]) {
                return (StatusCode::UNAUTHORIZED, "bad token".to_string());
            }
            if n < failures {
                return (StatusCode::SERVICE_UNAVAILABLE, "busy".to_string());
            }
            let url = format!(
                "https://play.example.com/{}/{}?money={}&token={}",
                form["gameID"], form["username"], form["money"], form["token"]
            );
            (StatusCode::OK, serde_json::json!({ "url": url }).to_string())
        }

        let app = Router::new()
            .route("/getgameurl", post(handler))
            .with_state((hits.clone(), failures));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/getgameurl", addr), hits)
    }

    #[tokio::test]
    async fn test_launch_sends_form_and_retries_server_errors() {
        let (endpoint, hits) = spawn_aggregator(2).await;
        let client = GameLaunchClient::new(&config(endpoint)).unwrap();

        let url = client.launch(&request()).await.unwrap();
        assert_eq!(
            url,
            "https://play.example.com/crash/player45?money=100&token=secret"
        );
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_launch_gives_up_with_rejected() {
        let (endpoint, hits) = spawn_aggregator(10).await;
        let client = GameLaunchClient::new(&config(endpoint)).unwrap();

        let err = client.launch(&request()).await.unwrap_err();
        assert!(matches!(err, GameLaunchError::Rejected { status: 503, .. }));
        assert_eq!(err.upstream_body(), Some("busy"));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut cfg = config(format!("http://{}/getgameurl", addr));
        cfg.max_attempts = 2;
        let client = GameLaunchClient::new(&cfg).unwrap();

        let err = client.launch(&request()).await.unwrap_err();
        assert_eq!(err.kind(), "upstream_unreachable");
    }

    #[test]
    fn test_invalid_configuration() {
        let mut cfg = config("not a url".to_string());
        assert!(matches!(
            GameLaunchClient::new(&cfg),
            Err(GameLaunchError::Configuration { .. })
        ));

        cfg.endpoint = "http://localhost/getgameurl".to_string();
        cfg.token_header = "bad header".to_string();
        assert!(GameLaunchClient::new(&cfg).is_err());
    }
}
