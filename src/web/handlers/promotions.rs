//! Promotion handlers

use axum::{extract::State, response::Response};

use super::{fetch, missing, remove_with_images};
use crate::errors::{AppError, AppResult};
use crate::models::{PromotionCreateRequest, PromotionUpdateRequest};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::web::{
    extractors::ValidatedUuid,
    responses::{created, ok},
    AppState,
};

const RESOURCE: &str = "Promotion";

pub async fn list_promotions(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.promotions.find_all(()).await?))
}

pub async fn get_promotion(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.promotions, RESOURCE, id).await?))
}

pub async fn create_promotion(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Response> {
    let title_bn = form.required_text("titleBn")?;
    let title_en = form.required_text("titleEn")?;
    let desc_bn = form.required_text("descBn")?;
    let desc_en = form.required_text("descEn")?;
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store(image).await?;
        let promotion = state
            .promotions
            .create(PromotionCreateRequest {
                title_bn,
                title_en,
                desc_bn,
                desc_en,
                image_url,
            })
            .await?;
        Ok::<_, AppError>(promotion)
    }
    .await;

    Ok(created(uploads.finish(result).await?))
}

pub async fn update_promotion(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let current = fetch(&state.promotions, RESOURCE, id).await?;
    let mut request = PromotionUpdateRequest {
        title_bn: form.text_owned("titleBn"),
        title_en: form.text_owned("titleEn"),
        desc_bn: form.text_owned("descBn"),
        desc_en: form.text_owned("descEn"),
        image_url: None,
    };

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        request.image_url = uploads.store_optional(form.file("image")).await?;
        if request.image_url.is_some() {
            uploads.retire(current.image_url);
        }
        let promotion = state
            .promotions
            .update(id, request)
            .await
            .map_err(missing(RESOURCE, id))?;
        Ok::<_, AppError>(promotion)
    }
    .await;

    Ok(ok(uploads.finish(result).await?))
}

pub async fn delete_promotion(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(&state.promotions, &state.storage, RESOURCE, id).await
}
