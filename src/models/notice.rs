use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scrolling marquee notice; the newest active row is the one shown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub text_bn: String,
    pub text_en: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shape returned by the public notice endpoint when no notice exists yet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoticeView {
    pub id: Option<Uuid>,
    pub text_bn: String,
    pub text_en: String,
    pub is_active: bool,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            id: Some(notice.id),
            text_bn: notice.text_bn,
            text_en: notice.text_en,
            is_active: notice.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeCreateRequest {
    #[serde(default)]
    pub text_bn: String,
    #[serde(default)]
    pub text_en: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeUpdateRequest {
    pub text_bn: Option<String>,
    pub text_en: Option<String>,
    pub is_active: Option<bool>,
}

fn default_active() -> bool {
    true
}
