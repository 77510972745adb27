//! Site title and favicon handlers
//!
//! Several configurations may be stored; at most one is active and that one
//! is what the public site reads.

use axum::{extract::State, response::Response};

use super::{fetch, missing, remove_with_images};
use crate::errors::{AppError, AppResult};
use crate::models::{SiteConfigCreateRequest, SiteConfigUpdateRequest, SiteConfigView};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::web::{
    extractors::ValidatedUuid,
    responses::{created, ok},
    AppState,
};

const RESOURCE: &str = "SiteConfig";

/// Active configuration, or the built-in defaults
pub async fn active_site_config(State(state): State<AppState>) -> AppResult<Response> {
    let view = state
        .site_configs
        .find_active()
        .await?
        .map(SiteConfigView::from)
        .unwrap_or_default();
    Ok(ok(view))
}

pub async fn list_site_configs(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.site_configs.find_all(()).await?))
}

pub async fn get_site_config(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.site_configs, RESOURCE, id).await?))
}

pub async fn create_site_config(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Response> {
    let site_title = form.required_text("siteTitle")?;
    let is_active = form.bool("isActive")?.unwrap_or(false);

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let favicon_url = uploads.store_optional(form.file("favicon")).await?;
        let config = state
            .site_configs
            .create(SiteConfigCreateRequest {
                site_title,
                favicon_url,
                is_active,
            })
            .await?;
        Ok::<_, AppError>(config)
    }
    .await;

    Ok(created(uploads.finish(result).await?))
}

pub async fn update_site_config(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let current = fetch(&state.site_configs, RESOURCE, id).await?;
    let mut request = SiteConfigUpdateRequest {
        site_title: form.text_owned("siteTitle"),
        favicon_url: None,
    };

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        request.favicon_url = uploads.store_optional(form.file("favicon")).await?;
        if request.favicon_url.is_some() {
            if let Some(old) = current.favicon_url {
                uploads.retire(old);
            }
        }
        let config = state
            .site_configs
            .update(id, request)
            .await
            .map_err(missing(RESOURCE, id))?;
        Ok::<_, AppError>(config)
    }
    .await;

    Ok(ok(uploads.finish(result).await?))
}

pub async fn delete_site_config(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(&state.site_configs, &state.storage, RESOURCE, id).await
}

/// Make one configuration the active one, deactivating the rest
pub async fn activate_site_config(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    let config = state
        .site_configs
        .activate(id)
        .await
        .map_err(missing(RESOURCE, id))?;
    Ok(ok(config))
}
