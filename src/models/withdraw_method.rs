use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::ImageOwner;

/// Bilingual label
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocalizedText {
    pub en: String,
    pub bn: String,
}

fn default_field_type() -> String {
    "text".to_string()
}

/// One admin-defined input on the withdraw form
///
/// Keys other than `label` and `type` (`required`, `placeholder`,
/// `options`, ...) are kept verbatim in `extra`. Player submissions are not
/// validated against these definitions here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomField {
    pub label: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomField {
    pub fn validate(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("customFields entries need a non-empty label".to_string());
        }
        if self.field_type.trim().is_empty() {
            return Err(format!("customFields '{}' has an empty type", self.label));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawMethod {
    pub id: Uuid,
    pub method_name: LocalizedText,
    pub image_url: String,
    pub custom_fields: Vec<CustomField>,
    pub is_active: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WithdrawMethodCreateRequest {
    pub method_name: LocalizedText,
    pub image_url: String,
    pub custom_fields: Vec<CustomField>,
    pub is_active: bool,
    pub order: i64,
}

#[derive(Debug, Clone, Default)]
pub struct WithdrawMethodUpdateRequest {
    pub method_name_en: Option<String>,
    pub method_name_bn: Option<String>,
    pub image_url: Option<String>,
    pub custom_fields: Option<Vec<CustomField>>,
    pub is_active: Option<bool>,
    pub order: Option<i64>,
}

impl ImageOwner for WithdrawMethod {
    fn image_paths(&self) -> Vec<&str> {
        vec![self.image_url.as_str()]
    }
}
