use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides, e.g. `GAMESITE__WEB__PORT=9000`
pub const ENV_PREFIX: &str = "GAMESITE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub storage: StorageConfig,
    pub game_launch: GameLaunchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// Allowed dashboard origins; empty means permissive CORS
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub uploads_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLaunchConfig {
    /// Full URL of the aggregator's `getgameurl` endpoint
    pub endpoint: String,
    pub token: String,
    pub token_header: String,
    pub username_suffix: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://./gamesite-admin.db".to_string(),
                max_connections: Some(10),
            },
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                cors_origins: Vec::new(),
                max_upload_bytes: default_max_upload_bytes(),
            },
            storage: StorageConfig {
                uploads_path: PathBuf::from("./data/uploads"),
            },
            game_launch: GameLaunchConfig::default(),
        }
    }
}

impl Default for GameLaunchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://aggregator.example.com/getgameurl".to_string(),
            token: "change-me".to_string(),
            token_header: "x-api-key".to_string(),
            username_suffix: "45".to_string(),
            timeout_secs: 15,
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
        }
    }
}

impl Config {
    /// Load configuration from `path`, layering `GAMESITE__*` environment
    /// variables on top. A default file is written when `path` is missing.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::create_dir_all(&default_config.storage.uploads_path)?;
            std::fs::write(path, contents)?;
        }

        let settings = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
