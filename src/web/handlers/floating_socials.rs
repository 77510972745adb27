//! Floating social button handlers

use axum::{extract::State, response::Response};

use super::{fetch, missing, remove_with_images, toggle};
use crate::errors::{AppError, AppResult};
use crate::models::{CollectionQuery, FloatingSocialCreateRequest, FloatingSocialUpdateRequest};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::utils;
use crate::web::{
    extractors::{StatusToggle, ValidatedUuid},
    responses::{created, ok},
    AppState,
};

const RESOURCE: &str = "FloatingSocial";

fn check_link(link_url: &str) -> AppResult<()> {
    if utils::is_http_url(link_url) {
        Ok(())
    } else {
        Err(AppError::validation("linkUrl must be an absolute http(s) URL"))
    }
}

pub async fn list_floating_socials(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.floating_socials.find_all(CollectionQuery::active()).await?))
}

pub async fn list_all_floating_socials(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.floating_socials.find_all(CollectionQuery::all()).await?))
}

pub async fn get_floating_social(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.floating_socials, RESOURCE, id).await?))
}

pub async fn create_floating_social(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Response> {
    let name = form.required_text("name")?;
    let link_url = form.required_text("linkUrl")?;
    check_link(&link_url)?;
    let is_active = form.bool("isActive")?.unwrap_or(true);
    let order = form.i64("order")?.unwrap_or(0);
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store(image).await?;
        let social = state
            .floating_socials
            .create(FloatingSocialCreateRequest {
                name,
                image_url,
                link_url,
                is_active,
                order,
            })
            .await?;
        Ok::<_, AppError>(social)
    }
    .await;

    Ok(created(uploads.finish(result).await?))
}

pub async fn update_floating_social(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let current = fetch(&state.floating_socials, RESOURCE, id).await?;
    let link_url = form.text_owned("linkUrl");
    if let Some(link) = &link_url {
        check_link(link)?;
    }
    let mut request = FloatingSocialUpdateRequest {
        name: form.text_owned("name"),
        link_url,
        is_active: form.bool("isActive")?,
        order: form.i64("order")?,
        image_url: None,
    };

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        request.image_url = uploads.store_optional(form.file("image")).await?;
        if request.image_url.is_some() {
            uploads.retire(current.image_url);
        }
        let social = state
            .floating_socials
            .update(id, request)
            .await
            .map_err(missing(RESOURCE, id))?;
        Ok::<_, AppError>(social)
    }
    .await;

    Ok(ok(uploads.finish(result).await?))
}

pub async fn delete_floating_social(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(&state.floating_socials, &state.storage, RESOURCE, id).await
}

pub async fn toggle_floating_social_status(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    StatusToggle(value): StatusToggle,
) -> AppResult<Response> {
    toggle(&state.floating_socials, RESOURCE, id, value).await
}
