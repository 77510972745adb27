//! Provider, slider and slider2 image handlers
//!
//! The three collections share one set of handlers; the mount point adds the
//! [`BannerKind`] as a request extension.

use axum::{
    extract::State,
    response::Response,
    Extension,
};

use super::{fetch, missing, remove_with_images};
use crate::errors::{AppError, AppResult};
use crate::models::{BannerCreateRequest, BannerKind, BannerUpdateRequest};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::web::{
    extractors::ValidatedUuid,
    responses::{created, ok},
    AppState,
};

pub async fn list_banners(
    State(state): State<AppState>,
    Extension(kind): Extension<BannerKind>,
) -> AppResult<Response> {
    Ok(ok(state.banners(kind).find_all(()).await?))
}

pub async fn get_banner(
    State(state): State<AppState>,
    Extension(kind): Extension<BannerKind>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(state.banners(kind), kind.resource_name(), id).await?))
}

pub async fn create_banner(
    State(state): State<AppState>,
    Extension(kind): Extension<BannerKind>,
    form: UploadForm,
) -> AppResult<Response> {
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store(image).await?;
        let banner = state
            .banners(kind)
            .create(BannerCreateRequest { image_url })
            .await?;
        Ok::<_, AppError>(banner)
    }
    .await;

    Ok(created(uploads.finish(result).await?))
}

/// Replace the image of a banner
pub async fn update_banner(
    State(state): State<AppState>,
    Extension(kind): Extension<BannerKind>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let repo = state.banners(kind);
    let resource = kind.resource_name();
    let current = fetch(repo, resource, id).await?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store_optional(form.file("image")).await?;
        if image_url.is_some() {
            uploads.retire(current.image_url);
        }
        let banner = repo
            .update(id, BannerUpdateRequest { image_url })
            .await
            .map_err(missing(resource, id))?;
        Ok::<_, AppError>(banner)
    }
    .await;

    Ok(ok(uploads.finish(result).await?))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    Extension(kind): Extension<BannerKind>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(state.banners(kind), &state.storage, kind.resource_name(), id).await
}
