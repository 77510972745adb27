//! Logo image set handlers

use axum::{extract::State, response::Response};

use super::save_image_set;
use crate::errors::AppResult;
use crate::models::LogoSettings;
use crate::uploads::UploadForm;
use crate::web::{responses::ok, AppState};

pub async fn get_logo(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.settings.get_or_default::<LogoSettings>().await?))
}

/// Replace any subset of the logo images
pub async fn save_logo(State(state): State<AppState>, form: UploadForm) -> AppResult<Response> {
    let logo = save_image_set(
        &state,
        &form,
        &[],
        &LogoSettings::IMAGE_FIELDS,
        LogoSettings::image_field,
    )
    .await?;
    Ok(ok(logo))
}
