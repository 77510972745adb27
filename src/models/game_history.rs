use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of wallet movement reported by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BetType {
    Bet,
    Win,
    Refund,
    Bonus,
}

/// Round status
///
/// Provisional and terminal values live side by side and any value may be
/// written at any time; no transition order is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Bet,
    Won,
    Lost,
    Settled,
    Refunded,
    Cancelled,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Bet => "bet",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Settled => "settled",
            Self::Refunded => "refunded",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "bet" => Ok(Self::Bet),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            "settled" => Ok(Self::Settled),
            "refunded" => Ok(Self::Refunded),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown bet status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameHistory {
    pub id: Uuid,
    pub username: String,
    pub provider_code: String,
    pub game_code: String,
    pub bet_type: BetType,
    pub amount: f64,
    pub status: BetStatus,
    pub win_amount: f64,
    pub balance_after: Option<f64>,
    /// Opaque provider payload
    pub bet_details: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHistoryCreateRequest {
    pub username: String,
    pub provider_code: String,
    pub game_code: String,
    pub bet_type: BetType,
    pub amount: f64,
    #[serde(default = "default_status")]
    pub status: BetStatus,
    #[serde(default)]
    pub win_amount: f64,
    pub balance_after: Option<f64>,
    #[serde(default)]
    pub bet_details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHistoryUpdateRequest {
    pub status: Option<BetStatus>,
    pub win_amount: Option<f64>,
    pub balance_after: Option<f64>,
}

/// Filters for history listings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHistoryQuery {
    pub username: Option<String>,
    pub status: Option<BetStatus>,
    #[serde(alias = "provider_code")]
    pub provider_code: Option<String>,
}

fn default_status() -> BetStatus {
    BetStatus::Pending
}
