use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageOwner;

/// Deposit channel shown on the cashier page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodCreateRequest {
    pub name: String,
    pub image_url: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentMethodUpdateRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ImageOwner for PaymentMethod {
    fn image_paths(&self) -> Vec<&str> {
        vec![self.image_url.as_str()]
    }
}
