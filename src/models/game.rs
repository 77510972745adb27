use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageOwner;

/// Catalog entry shown in the game lobby
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    /// Aggregator game identifier, globally unique
    pub game_id: String,
    /// Lobby position, globally unique
    pub serial_number: i64,
    pub image_url: String,
    /// Whether the game is playable/visible
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GameCreateRequest {
    pub title: String,
    pub game_id: String,
    pub serial_number: i64,
    pub image_url: String,
    pub status: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GameUpdateRequest {
    pub title: Option<String>,
    pub game_id: Option<String>,
    pub serial_number: Option<i64>,
    pub image_url: Option<String>,
    pub status: Option<bool>,
}

/// Filters for game listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameQuery {
    pub status: Option<bool>,
}

impl ImageOwner for Game {
    fn image_paths(&self) -> Vec<&str> {
        vec![self.image_url.as_str()]
    }
}
