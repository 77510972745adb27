use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageOwner;

/// Floating contact/social button (WhatsApp, Telegram, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloatingSocial {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub link_url: String,
    pub is_active: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FloatingSocialCreateRequest {
    pub name: String,
    pub image_url: String,
    pub link_url: String,
    pub is_active: bool,
    pub order: i64,
}

#[derive(Debug, Clone, Default)]
pub struct FloatingSocialUpdateRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i64>,
}

impl ImageOwner for FloatingSocial {
    fn image_paths(&self) -> Vec<&str> {
        vec![self.image_url.as_str()]
    }
}
