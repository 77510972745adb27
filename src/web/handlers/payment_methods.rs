//! Payment method handlers

use axum::{extract::State, response::Response};

use super::{fetch, missing, remove_with_images, toggle};
use crate::errors::{AppError, AppResult};
use crate::models::{CollectionQuery, PaymentMethodCreateRequest, PaymentMethodUpdateRequest};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::web::{
    extractors::{StatusToggle, ValidatedUuid},
    responses::{created, ok},
    AppState,
};

const RESOURCE: &str = "PaymentMethod";

/// Active methods for the deposit page
pub async fn list_payment_methods(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.payment_methods.find_all(CollectionQuery::active()).await?))
}

pub async fn list_all_payment_methods(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.payment_methods.find_all(CollectionQuery::all()).await?))
}

pub async fn get_payment_method(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.payment_methods, RESOURCE, id).await?))
}

pub async fn create_payment_method(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Response> {
    let name = form.required_text("name")?;
    let is_active = form.bool("isActive")?.unwrap_or(true);
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store(image).await?;
        let method = state
            .payment_methods
            .create(PaymentMethodCreateRequest {
                name,
                image_url,
                is_active,
            })
            .await?;
        Ok::<_, AppError>(method)
    }
    .await;

    Ok(created(uploads.finish(result).await?))
}

pub async fn update_payment_method(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let current = fetch(&state.payment_methods, RESOURCE, id).await?;
    let mut request = PaymentMethodUpdateRequest {
        name: form.text_owned("name"),
        is_active: form.bool("isActive")?,
        image_url: None,
    };

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        request.image_url = uploads.store_optional(form.file("image")).await?;
        if request.image_url.is_some() {
            uploads.retire(current.image_url);
        }
        let method = state
            .payment_methods
            .update(id, request)
            .await
            .map_err(missing(RESOURCE, id))?;
        Ok::<_, AppError>(method)
    }
    .await;

    Ok(ok(uploads.finish(result).await?))
}

pub async fn delete_payment_method(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(&state.payment_methods, &state.storage, RESOURCE, id).await
}

pub async fn toggle_payment_method_status(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    StatusToggle(value): StatusToggle,
) -> AppResult<Response> {
    toggle(&state.payment_methods, RESOURCE, id, value).await
}
