//! Notice (marquee text) handlers

use axum::{extract::State, response::Response};

use super::{fetch, missing, toggle};
use crate::errors::{AppError, AppResult};
use crate::models::{CollectionQuery, NoticeCreateRequest, NoticeUpdateRequest, NoticeView};
use crate::repositories::Repository;
use crate::web::{
    extractors::{StatusToggle, ValidatedJson, ValidatedUuid},
    responses::{created, deleted, ok},
    AppState,
};

const RESOURCE: &str = "Notice";

/// Newest active notice, or an empty one
pub async fn current_notice(State(state): State<AppState>) -> AppResult<Response> {
    let notice = state
        .notices
        .find_latest_active()
        .await?
        .map(NoticeView::from)
        .unwrap_or_default();
    Ok(ok(notice))
}

pub async fn list_notices(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.notices.find_all(CollectionQuery::all()).await?))
}

pub async fn get_notice(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.notices, RESOURCE, id).await?))
}

pub async fn create_notice(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NoticeCreateRequest>,
) -> AppResult<Response> {
    if request.text_bn.trim().is_empty() && request.text_en.trim().is_empty() {
        return Err(AppError::validation("textBn or textEn is required"));
    }
    Ok(created(state.notices.create(request).await?))
}

pub async fn update_notice(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    ValidatedJson(request): ValidatedJson<NoticeUpdateRequest>,
) -> AppResult<Response> {
    let notice = state
        .notices
        .update(id, request)
        .await
        .map_err(missing(RESOURCE, id))?;
    Ok(ok(notice))
}

pub async fn delete_notice(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    state
        .notices
        .delete(id)
        .await
        .map_err(missing(RESOURCE, id))?;
    Ok(deleted(id))
}

pub async fn toggle_notice_status(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    StatusToggle(value): StatusToggle,
) -> AppResult<Response> {
    toggle(&state.notices, RESOURCE, id, value).await
}
