use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageOwner;

/// Bilingual promotional card (Bangla / English)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Uuid,
    pub title_bn: String,
    pub title_en: String,
    pub desc_bn: String,
    pub desc_en: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PromotionCreateRequest {
    pub title_bn: String,
    pub title_en: String,
    pub desc_bn: String,
    pub desc_en: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct PromotionUpdateRequest {
    pub title_bn: Option<String>,
    pub title_en: Option<String>,
    pub desc_bn: Option<String>,
    pub desc_en: Option<String>,
    pub image_url: Option<String>,
}

impl ImageOwner for Promotion {
    fn image_paths(&self) -> Vec<&str> {
        vec![self.image_url.as_str()]
    }
}
