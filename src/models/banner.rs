use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ImageOwner;

/// Image-only collections that share one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    /// Game provider logos strip
    Provider,
    /// Main home page slider
    Slider,
    /// Secondary slider
    Slider2,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Slider => "slider",
            Self::Slider2 => "slider2",
        }
    }

    /// Human readable resource name for error messages
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Provider => "Provider",
            Self::Slider => "Slider",
            Self::Slider2 => "Slider2",
        }
    }
}

impl fmt::Display for BannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: Uuid,
    pub kind: BannerKind,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BannerCreateRequest {
    pub image_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct BannerUpdateRequest {
    pub image_url: Option<String>,
}

impl ImageOwner for Banner {
    fn image_paths(&self) -> Vec<&str> {
        vec![self.image_url.as_str()]
    }
}
