//! Withdraw method handlers
//!
//! `customFields` arrives as a JSON array in a text part and is stored as
//! given.

use axum::{extract::State, response::Response};

use super::{fetch, missing, remove_with_images, toggle};
use crate::errors::{AppError, AppResult};
use crate::models::{
    CollectionQuery, CustomField, LocalizedText, WithdrawMethodCreateRequest,
    WithdrawMethodUpdateRequest,
};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::web::{
    extractors::{StatusToggle, ValidatedUuid},
    responses::{created, ok},
    AppState,
};

const RESOURCE: &str = "WithdrawMethod";

fn custom_fields(form: &UploadForm) -> AppResult<Option<Vec<CustomField>>> {
    let fields = form.json::<Vec<CustomField>>("customFields")?;
    for field in fields.iter().flatten() {
        field.validate().map_err(AppError::validation)?;
    }
    Ok(fields)
}

pub async fn list_withdraw_methods(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.withdraw_methods.find_all(CollectionQuery::active()).await?))
}

pub async fn list_all_withdraw_methods(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.withdraw_methods.find_all(CollectionQuery::all()).await?))
}

pub async fn get_withdraw_method(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.withdraw_methods, RESOURCE, id).await?))
}

pub async fn create_withdraw_method(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Response> {
    let method_name = LocalizedText {
        en: form.required_text("methodNameEn")?,
        bn: form.required_text("methodNameBn")?,
    };
    let custom_fields = custom_fields(&form)?.unwrap_or_default();
    let is_active = form.bool("isActive")?.unwrap_or(true);
    let order = form.i64("order")?.unwrap_or(0);
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store(image).await?;
        let method = state
            .withdraw_methods
            .create(WithdrawMethodCreateRequest {
                method_name,
                image_url,
                custom_fields,
                is_active,
                order,
            })
            .await?;
        Ok::<_, AppError>(method)
    }
    .await;

    Ok(created(uploads.finish(result).await?))
}

pub async fn update_withdraw_method(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let current = fetch(&state.withdraw_methods, RESOURCE, id).await?;
    let mut request = WithdrawMethodUpdateRequest {
        method_name_en: form.text_owned("methodNameEn"),
        method_name_bn: form.text_owned("methodNameBn"),
        custom_fields: custom_fields(&form)?,
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
        let method = state
            .withdraw_methods
            .update(id, request)
            .await
            .map_err(missing(RESOURCE, id))?;
        Ok::<_, AppError>(method)
    }
    .await;

    Ok(ok(uploads.finish(result).await?))
}

pub async fn delete_withdraw_method(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(&state.withdraw_methods, &state.storage, RESOURCE, id).await
}

pub async fn toggle_withdraw_method_status(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    StatusToggle(value): StatusToggle,
) -> AppResult<Response> {
    toggle(&state.withdraw_methods, RESOURCE, id, value).await
}
