//! Game catalog handlers

use axum::{
    extract::{Query, State},
    response::Response,
};

use super::{fetch, missing, remove_with_images, toggle};
use crate::errors::{AppError, AppResult};
use crate::models::{GameCreateRequest, GameQuery, GameUpdateRequest};
use crate::repositories::Repository;
use crate::uploads::{UploadBatch, UploadForm};
use crate::web::{
    extractors::{StatusToggle, ValidatedUuid},
    responses::{created, ok},
    AppState,
};

const RESOURCE: &str = "Game";

/// Lobby listing: enabled games unless `?status=` asks otherwise
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> AppResult<Response> {
    let query = GameQuery {
        status: Some(query.status.unwrap_or(true)),
    };
    Ok(ok(state.games.find_all(query).await?))
}

pub async fn list_all_games(State(state): State<AppState>) -> AppResult<Response> {
    Ok(ok(state.games.find_all(GameQuery::default()).await?))
}

pub async fn get_game(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    Ok(ok(fetch(&state.games, RESOURCE, id).await?))
}

pub async fn create_game(State(state): State<AppState>, form: UploadForm) -> AppResult<Response> {
    let title = form.required_text("title")?;
    let game_id = form.required_text("gameId")?;
    let serial_number = form
        .i64("serialNumber")?
        .ok_or_else(|| AppError::validation("serialNumber is required"))?;
    let status = form.bool("status")?.unwrap_or(true);
    let image = form.required_file("image")?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let image_url = uploads.store(image).await?;
        let game = state
            .games
            .create(GameCreateRequest {
                title,
                game_id,
                serial_number,
                image_url,
                status,
            })
            .await?;
        Ok::<_, AppError>(game)
    }
    .await;

    let game = uploads.finish(result).await?;
    Ok(created(game))
}

pub async fn update_game(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    form: UploadForm,
) -> AppResult<Response> {
    let current = fetch(&state.games, RESOURCE, id).await?;
    let mut request = GameUpdateRequest {
        title: form.text_owned("title"),
        game_id: form.text_owned("gameId"),
        serial_number: form.i64("serialNumber")?,
        status: form.bool("status")?,
        image_url: None,
    };

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        request.image_url = uploads.store_optional(form.file("image")).await?;
        if request.image_url.is_some() {
            uploads.retire(current.image_url);
        }
        let game = state
            .games
            .update(id, request)
            .await
            .map_err(missing(RESOURCE, id))?;
        Ok::<_, AppError>(game)
    }
    .await;

    let game = uploads.finish(result).await?;
    Ok(ok(game))
}

pub async fn delete_game(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Response> {
    remove_with_images(&state.games, &state.storage, RESOURCE, id).await
}

pub async fn toggle_game_status(
    State(state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    StatusToggle(value): StatusToggle,
) -> AppResult<Response> {
    toggle(&state.games, RESOURCE, id, value).await
}
