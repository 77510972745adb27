//! Footer handlers: text, badge images and social links

use axum::{extract::State, response::Response};
use tracing::info;
use uuid::Uuid;

use super::save_image_set;
use crate::errors::{AppError, AppResult};
use crate::models::{FooterSettings, SocialLink};
use crate::uploads::{UploadBatch, UploadForm};
use crate::utils;
use crate::web::{
    extractors::ValidatedUuid,
    responses::{created, deleted, ok},
    AppState,
};

pub async fn get_footer(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.settings.get_or_default::<FooterSettings>().await?))
}

pub async fn save_footer(State(state): State<AppState>, form: UploadForm) -> AppResult<Response> {
    let footer = save_image_set(
        &state,
        &form,
        &FooterSettings::TEXT_FIELDS,
        &FooterSettings::IMAGE_FIELDS,
        FooterSettings::image_field,
    )
    .await?;
    Ok(ok(footer))
}

pub async fn add_social_link(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Response> {
    let link_url = form.required_text("linkUrl")?;
    if !utils::is_http_url(&link_url) {
        return Err(AppError::validation("linkUrl must be an absolute http(s) URL"));
    }
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let link = SocialLink {
            id: Uuid::new_v4(),
            image_url: uploads.store(image).await?,
            link_url,
        };
        Ok::<_, AppError>(state.settings.append_social_link(&link).await?)
    }
    .await;

    let footer = uploads.finish(result).await?;
    info!("Added footer social link ({} total)", footer.social_links.len());
    Ok(created(footer))
}

pub async fn remove_social_link(
    State(state): State<AppState>,
    ValidatedUuid(link_id): ValidatedUuid,
) -> AppResult<Response> {
    let removed = state
        .settings
        .remove_social_link(link_id)
        .await?
        .ok_or_else(|| AppError::not_found("SocialLink", link_id.to_string()))?;

    state.storage.delete_best_effort(&removed.image_url).await;
    Ok(deleted(link_id))
}
