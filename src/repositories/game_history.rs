//! Bet/round history reported by the game aggregator

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::traits::{PaginatedRepository, PaginatedResult, Repository};
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{
    BetStatus, GameHistory, GameHistoryCreateRequest, GameHistoryQuery, GameHistoryUpdateRequest,
};
use crate::utils;

const COLUMNS: &str = "id, username, provider_code, game_code, bet_type, amount, status, win_amount, balance_after, bet_details, created_at, updated_at";

#[derive(Clone)]
pub struct GameHistoryRepository {
    pool: Pool<Sqlite>,
}

impl GameHistoryRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<GameHistory> {
        let raw_details: String = row.try_get("bet_details")?;
        let bet_details = serde_json::from_str(&raw_details)
            .map_err(|e| RepositoryError::decode("bet_details", e.to_string()))?;

        Ok(GameHistory {
            id: row_uuid(row, "id")?,
            username: row.try_get("username")?,
            provider_code: row.try_get("provider_code")?,
            game_code: row.try_get("game_code")?,
            bet_type: row.try_get("bet_type")?,
            amount: row.try_get("amount")?,
            status: row.try_get("status")?,
            win_amount: row.try_get("win_amount")?,
            balance_after: row.try_get("balance_after")?,
            bet_details,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<GameHistory> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("game_history", "id", id.to_string()))
    }

    /// Append `WHERE ...` for the populated filters
    fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, query: &'a GameHistoryQuery) {
        let mut separated = false;
        let mut next_clause = |builder: &mut QueryBuilder<'a, Sqlite>| {
            builder.push(if separated { " AND " } else { " WHERE " });
            separated = true;
        };

        if let Some(username) = &query.username {
            next_clause(builder);
            builder.push("username = ").push_bind(username);
        }
        if let Some(status) = query.status {
            next_clause(builder);
            builder.push("status = ").push_bind(status.as_str());
        }
        if let Some(provider_code) = &query.provider_code {
            next_clause(builder);
            builder.push("provider_code = ").push_bind(provider_code);
        }
    }

    /// Record a new status for a round. Any status may follow any other.
    pub async fn set_status(&self, id: Uuid, status: BetStatus) -> RepositoryResult<GameHistory> {
        self.update(
            id,
            GameHistoryUpdateRequest {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl Repository<GameHistory, Uuid> for GameHistoryRepository {
    type CreateRequest = GameHistoryCreateRequest;
    type UpdateRequest = GameHistoryUpdateRequest;
    type Query = GameHistoryQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<GameHistory>> {
        let row = sqlx::query(&format!("SELECT {} FROM game_history WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, query: GameHistoryQuery) -> RepositoryResult<Vec<GameHistory>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM game_history", COLUMNS));
        Self::push_filters(&mut builder, &query);
        builder.push(" ORDER BY created_at DESC, rowid DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(&self, request: GameHistoryCreateRequest) -> RepositoryResult<GameHistory> {
        let now = now_string();
        let id = Uuid::new_v4();
        let bet_details = serde_json::to_string(&request.bet_details)?;

        sqlx::query(
            "INSERT INTO game_history (id, username, provider_code, game_code, bet_type, amount, status,
                 win_amount, balance_after, bet_details, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.username)
        .bind(&request.provider_code)
        .bind(&request.game_code)
        .bind(request.bet_type)
        .bind(request.amount)
        .bind(request.status)
        .bind(request.win_amount)
        .bind(request.balance_after)
        .bind(bet_details)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.require(id).await
    }

    async fn update(
        &self,
        id: Uuid,
        request: GameHistoryUpdateRequest,
    ) -> RepositoryResult<GameHistory> {
        let mut record = self.require(id).await?;

        if let Some(status) = request.status {
            record.status = status;
        }
        if let Some(win_amount) = request.win_amount {
            record.win_amount = win_amount;
        }
        if let Some(balance_after) = request.balance_after {
            record.balance_after = Some(balance_after);
        }
        record.updated_at = Utc::now();

        sqlx::query(
            "UPDATE game_history SET status = ?, win_amount = ?, balance_after = ?, updated_at = ? WHERE id = ?",
        )
        .bind(record.status)
        .bind(record.win_amount)
        .bind(record.balance_after)
        .bind(utils::format_datetime(&record.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<GameHistory> {
        let record = self.require(id).await?;
        sqlx::query("DELETE FROM game_history WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    async fn count(&self, query: GameHistoryQuery) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM game_history");
        Self::push_filters(&mut builder, &query);

        let count: i64 = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl PaginatedRepository<GameHistory, Uuid> for GameHistoryRepository {
    async fn find_paginated(
        &self,
        query: GameHistoryQuery,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<PaginatedResult<GameHistory>> {
        let page = page.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);

        let total_count = self.count(query.clone()).await?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM game_history", COLUMNS));
        Self::push_filters(&mut builder, &query);
        builder
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder.build().fetch_all(&self.pool).await?;
        let items = rows.iter().map(Self::map_row).collect::<RepositoryResult<Vec<_>>>()?;

        Ok(PaginatedResult {
            items,
            total_count,
            page,
            limit,
        })
    }
}
