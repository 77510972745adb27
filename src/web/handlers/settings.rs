//! Navbar, bottom navbar and theme documents
//!
//! One pair of generic handlers serves every JSON-only singleton; the route
//! picks the document type.

use axum::{extract::State, response::Response};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::{self, SettingsDocument};
use crate::web::{extractors::ValidatedJson, responses::ok, AppState};

/// Stored document, or its defaults before the first save
pub async fn get_settings<T: SettingsDocument>(
    State(state): State<AppState>,
) -> AppResult<Response> {
    Ok(ok(state.settings.get_or_default::<T>().await?))
}

/// Merge the submitted fields into the stored document
pub async fn save_settings<T: SettingsDocument>(
    State(state): State<AppState>,
    ValidatedJson(patch): ValidatedJson<Map<String, Value>>,
) -> AppResult<Response> {
    let current = state.settings.get::<T>().await?.map(|r| r.document);
    models::patched::<T>(current, &patch).map_err(AppError::validation)?;

    let saved = state.settings.upsert::<T>(&patch).await?;
    info!("Updated {} settings", T::KEY);
    Ok(ok(saved))
}
