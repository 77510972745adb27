use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::{Repository, ToggleRepository};
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{CollectionQuery, Notice, NoticeCreateRequest, NoticeUpdateRequest};
use crate::utils;

const COLUMNS: &str = "id, text_bn, text_en, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct NoticeRepository {
    pool: Pool<Sqlite>,
}

impl NoticeRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<Notice> {
        Ok(Notice {
            id: row_uuid(row, "id")?,
            text_bn: row.try_get("text_bn")?,
            text_en: row.try_get("text_en")?,
            is_active: row.try_get("is_active")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<Notice> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("notices", "id", id.to_string()))
    }

    /// The notice the site currently shows: newest active row
    pub async fn find_latest_active(&self) -> RepositoryResult<Option<Notice>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM notices WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
            COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::map_row).transpose()
    }
}

#[async_trait]
impl Repository<Notice, Uuid> for NoticeRepository {
    type CreateRequest = NoticeCreateRequest;
    type UpdateRequest = NoticeUpdateRequest;
    type Query = CollectionQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Notice>> {
        let row = sqlx::query(&format!("SELECT {} FROM notices WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, query: CollectionQuery) -> RepositoryResult<Vec<Notice>> {
        let filter = if query.active_only { "WHERE is_active = 1" } else { "" };
        let rows = sqlx::query(&format!(
            "SELECT {} FROM notices {} ORDER BY created_at DESC, rowid DESC",
            COLUMNS, filter
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(&self, request: NoticeCreateRequest) -> RepositoryResult<Notice> {
        let now = now_string();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO notices (id, text_bn, text_en, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.text_bn)
        .bind(&request.text_en)
        .bind(request.is_active)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.require(id).await
    }

    async fn update(&self, id: Uuid, request: NoticeUpdateRequest) -> RepositoryResult<Notice> {
        let mut notice = self.require(id).await?;

        if let Some(text_bn) = request.text_bn {
            notice.text_bn = text_bn;
        }
        if let Some(text_en) = request.text_en {
            notice.text_en = text_en;
        }
        if let Some(is_active) = request.is_active {
            notice.is_active = is_active;
        }
        notice.updated_at = Utc::now();

        sqlx::query(
            "UPDATE notices SET text_bn = ?, text_en = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&notice.text_bn)
        .bind(&notice.text_en)
        .bind(notice.is_active)
        .bind(utils::format_datetime(&notice.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(notice)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Notice> {
        let notice = self.require(id).await?;
        sqlx::query("DELETE FROM notices WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(notice)
    }

    async fn count(&self, query: CollectionQuery) -> RepositoryResult<u64> {
        let sql = if query.active_only {
            "SELECT COUNT(*) FROM notices WHERE is_active = 1"
        } else {
            "SELECT COUNT(*) FROM notices"
        };
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ToggleRepository<Notice, Uuid> for NoticeRepository {
    async fn set_active(&self, id: Uuid, value: Option<bool>) -> RepositoryResult<Notice> {
        let current = self.require(id).await?;
        self.update(
            id,
            NoticeUpdateRequest {
                is_active: Some(value.unwrap_or(!current.is_active)),
                ..Default::default()
            },
        )
        .await
    }
}
