//! Repository pattern implementation for data access
//!
//! Each collection gets a repository over the shared SQLite pool. Rows store
//! ids as UUID strings and timestamps as RFC3339 text; the helpers below turn
//! those columns back into typed values.

pub mod banner;
pub mod floating_social;
pub mod game;
pub mod game_history;
pub mod notice;
pub mod payment_method;
pub mod promotion;
pub mod settings;
pub mod site_config;
pub mod traits;
pub mod withdraw_method;

pub use banner::BannerRepository;
pub use floating_social::FloatingSocialRepository;
pub use game::GameRepository;
pub use game_history::GameHistoryRepository;
pub use notice::NoticeRepository;
pub use payment_method::PaymentMethodRepository;
pub use promotion::PromotionRepository;
pub use settings::{SettingsRecord, SettingsRepository};
pub use site_config::SiteConfigRepository;
pub use traits::*;
pub use withdraw_method::WithdrawMethodRepository;

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::errors::{RepositoryError, RepositoryResult};
use crate::utils;

pub(crate) fn row_uuid(row: &SqliteRow, column: &str) -> RepositoryResult<Uuid> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| RepositoryError::decode(column, e.to_string()))
}

pub(crate) fn row_datetime(row: &SqliteRow, column: &str) -> RepositoryResult<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    Ok(utils::parse_datetime(&raw)?)
}

/// Timestamp string for the current instant
pub(crate) fn now_string() -> String {
    utils::format_datetime(&Utc::now())
}

/// Migrated in-memory pool for repository unit tests
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::Pool<sqlx::Sqlite> {
    let db = crate::database::Database::new(&crate::config::DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
    })
    .await
    .expect("in-memory database");
    db.migrate().await.expect("migrations");
    db.pool()
}
