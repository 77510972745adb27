use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageOwner;

pub const DEFAULT_SITE_TITLE: &str = "My Gaming Site";

/// Browser title and favicon; only one row may be active at a time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub id: Uuid,
    pub site_title: String,
    pub favicon_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of the active site config, with defaults when none is active
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigView {
    pub id: Option<Uuid>,
    pub site_title: String,
    pub favicon_url: Option<String>,
}

impl Default for SiteConfigView {
    fn default() -> Self {
        Self {
            id: None,
            site_title: DEFAULT_SITE_TITLE.to_string(),
            favicon_url: None,
        }
    }
}

impl From<SiteConfig> for SiteConfigView {
    fn from(config: SiteConfig) -> Self {
        Self {
            id: Some(config.id),
            site_title: config.site_title,
            favicon_url: config.favicon_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfigCreateRequest {
    pub site_title: String,
    pub favicon_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SiteConfigUpdateRequest {
    pub site_title: Option<String>,
    pub favicon_url: Option<String>,
}

impl ImageOwner for SiteConfig {
    fn image_paths(&self) -> Vec<&str> {
        self.favicon_url.as_deref().into_iter().collect()
    }
}
