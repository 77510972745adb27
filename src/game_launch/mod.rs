//! Game launch relay
//!
//! Validates a player's launch request, forwards it to the external game
//! aggregator and returns the launch URL the aggregator hands back.

pub mod client;
pub mod retry;

pub use client::{extract_game_url, GameLaunchClient};
pub use retry::RetryConfig;

use serde::Serialize;
use serde_json::Value;

/// A validated launch request
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub game_id: String,
    pub username: String,
    /// Amount as forwarded to the aggregator
    pub money: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchResponse {
    pub game_url: String,
}

impl LaunchRequest {
    /// Validate the raw JSON body sent by the game client
    ///
    /// `gameID` may be a string or a number, `username` must be a non-empty
    /// string and `money` a number (or numeric string) greater than zero.
    pub fn from_json(body: &Value) -> Result<Self, String> {
        let game_id = match body.get("gameID") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err("gameID is required".to_string()),
        };

        let username = match body.get("username") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err("username is required".to_string()),
        };

        let money = match body.get("money") {
            Some(Value::Number(n)) => (n.as_f64(), n.to_string()),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                (s.trim().parse::<f64>().ok(), s.trim().to_string())
            }
            _ => return Err("money is required".to_string()),
        };
        let money = match money {
            (Some(amount), raw) if amount.is_finite() && amount > 0.0 => raw,
            _ => return Err("money must be a positive number".to_string()),
        };

        Ok(Self {
            game_id,
            username,
            money,
        })
    }
}
