//! Game launch relay handler

use axum::{extract::State, response::Response};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::game_launch::{LaunchRequest, LaunchResponse};
use crate::web::{extractors::ValidatedJson, responses::ok, AppState};

/// Validate the launch request and relay it to the aggregator
///
/// Invalid input is rejected before any outbound call is made.
pub async fn play_game(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> AppResult<Response> {
    let request = LaunchRequest::from_json(&body).map_err(AppError::validation)?;
    let game_url = state.game_launch.launch(&request).await?;
    Ok(ok(LaunchResponse { game_url }))
}
