//! Game catalog repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::{Repository, ToggleRepository};
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Game, GameCreateRequest, GameQuery, GameUpdateRequest};
use crate::utils;

const COLUMNS: &str = "id, title, game_id, serial_number, image_url, status, created_at, updated_at";

#[derive(Clone)]
pub struct GameRepository {
    pool: Pool<Sqlite>,
}

impl GameRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<Game> {
        Ok(Game {
            id: row_uuid(row, "id")?,
            title: row.try_get("title")?,
            game_id: row.try_get("game_id")?,
            serial_number: row.try_get("serial_number")?,
            image_url: row.try_get("image_url")?,
            status: row.try_get("status")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn write(&self, game: &Game) -> RepositoryResult<()> {
        sqlx::query(
            "UPDATE games SET title = ?, game_id = ?, serial_number = ?, image_url = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&game.title)
        .bind(&game.game_id)
        .bind(game.serial_number)
        .bind(&game.image_url)
        .bind(game.status)
        .bind(utils::format_datetime(&game.updated_at))
        .bind(game.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;
        Ok(())
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<Game> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("games", "id", id.to_string()))
    }
}

#[async_trait]
impl Repository<Game, Uuid> for GameRepository {
    type CreateRequest = GameCreateRequest;
    type UpdateRequest = GameUpdateRequest;
    type Query = GameQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Game>> {
        let row = sqlx::query(&format!("SELECT {} FROM games WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, query: GameQuery) -> RepositoryResult<Vec<Game>> {
        let rows = match query.status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {} FROM games WHERE status = ? ORDER BY serial_number ASC",
                    COLUMNS
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM games ORDER BY serial_number ASC", COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(&self, request: GameCreateRequest) -> RepositoryResult<Game> {
        let now = now_string();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO games (id, title, game_id, serial_number, image_url, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.title)
        .bind(&request.game_id)
        .bind(request.serial_number)
        .bind(&request.image_url)
        .bind(request.status)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.require(id).await
    }

    async fn update(&self, id: Uuid, request: GameUpdateRequest) -> RepositoryResult<Game> {
        let mut game = self.require(id).await?;

        if let Some(title) = request.title {
            game.title = title;
        }
        if let Some(game_id) = request.game_id {
            game.game_id = game_id;
        }
        if let Some(serial_number) = request.serial_number {
            game.serial_number = serial_number;
        }
        if let Some(image_url) = request.image_url {
            game.image_url = image_url;
        }
        if let Some(status) = request.status {
            game.status = status;
        }
        game.updated_at = Utc::now();

        self.write(&game).await?;
        Ok(game)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Game> {
        let game = self.require(id).await?;
        sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(game)
    }

    async fn count(&self, query: GameQuery) -> RepositoryResult<u64> {
        let count: i64 = match query.status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM games WHERE status = ?")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM games")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count as u64)
    }
}

#[async_trait]
impl ToggleRepository<Game, Uuid> for GameRepository {
    async fn set_active(&self, id: Uuid, value: Option<bool>) -> RepositoryResult<Game> {
        let current = self.require(id).await?;
        let status = value.unwrap_or(!current.status);
        self.update(
            id,
            GameUpdateRequest {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}
