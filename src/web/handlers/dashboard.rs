//! Admin dashboard summary

use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::errors::AppResult;
use crate::models::{BetStatus, CollectionQuery, GameHistoryQuery, GameQuery};
use crate::repositories::Repository;
use crate::web::{responses::ok, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_games: u64,
    pub active_games: u64,
    pub promotions: u64,
    pub providers: u64,
    pub sliders: u64,
    pub active_payment_methods: u64,
    pub active_withdraw_methods: u64,
    pub floating_socials: u64,
    pub total_bets: u64,
    pub pending_bets: u64,
}

pub async fn summary(State(state): State<AppState>) -> AppResult<Response> {
    let pending = GameHistoryQuery {
        status: Some(BetStatus::Pending),
        ..Default::default()
    };

    let (
        total_games,
        active_games,
        promotions,
        providers,
        sliders,
        active_payment_methods,
        active_withdraw_methods,
        floating_socials,
        total_bets,
        pending_bets,
    ) = futures::try_join!(
        state.games.count(GameQuery::default()),
        state.games.count(GameQuery { status: Some(true) }),
        state.promotions.count(()),
        state.providers.count(()),
        state.sliders.count(()),
        state.payment_methods.count(CollectionQuery::active()),
        state.withdraw_methods.count(CollectionQuery::active()),
        state.floating_socials.count(CollectionQuery::all()),
        state.game_history.count(GameHistoryQuery::default()),
        state.game_history.count(pending),
    )?;

    Ok(ok(DashboardSummary {
        total_games,
        active_games,
        promotions,
        providers,
        sliders,
        active_payment_methods,
        active_withdraw_methods,
        floating_socials,
        total_bets,
        pending_bets,
    }))
}
