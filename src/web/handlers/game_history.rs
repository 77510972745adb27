//! Bet history handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::info;

use super::{fetch, missing};
use crate::errors::{AppError, AppResult};
use crate::models::{BetStatus, GameHistoryCreateRequest, GameHistoryQuery};
use crate::repositories::{PaginatedRepository, Repository};
use crate::web::{
    extractors::{PaginationParams, ValidatedJson, ValidatedUuid},
    responses::{created, ok, PaginatedResponse},
    AppState,
};

const RESOURCE: &str = "GameHistory";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    pub status: BetStatus,
}

/// Paged history, newest first, filterable by username, status and provider
pub async fn list_game_history(
    State(state): State<AppState>,
    pagination: PaginationParams,
    filters: Result<Query<GameHistoryQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(filters) = filters.map_err(|e| AppError::validation(e.body_text()))?;

    let page = state
        .game_history
        .find_paginated(filters, pagination.page, pagination.limit)
        .await?;

    Ok(ok(PaginatedResponse::new(
        page.items,
        page.total_count,
        page.page,
        page.limit,
    )))
}

pub async fn get_game_history(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.game_history, RESOURCE, id).await?))
}

/// Record a bet reported by the game client
pub async fn create_game_history(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GameHistoryCreateRequest>,
) -> AppResult<Response> {
    if request.username.trim().is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if request.provider_code.trim().is_empty() || request.game_code.trim().is_empty() {
        return Err(AppError::validation("providerCode and gameCode are required"));
    }
    if !request.amount.is_finite() || request.amount < 0.0 {
        return Err(AppError::validation("amount must be a non-negative number"));
    }

    let record = state.game_history.create(request).await?;
    Ok(created(record))
}

/// Set any status value; there is no transition graph
pub async fn update_game_history_status(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    ValidatedJson(update): ValidatedJson<StatusUpdate>,
) -> AppResult<Response> {
    let record = state
        .game_history
        .set_status(id, update.status)
        .await
        .map_err(missing(RESOURCE, id))?;

    info!("Game history {} status set to {}", id, update.status.as_str());
    Ok(ok(record))
}
