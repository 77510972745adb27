use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::Repository;
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Promotion, PromotionCreateRequest, PromotionUpdateRequest};
use crate::utils;

const COLUMNS: &str =
    "id, title_bn, title_en, desc_bn, desc_en, image_url, created_at, updated_at";

#[derive(Clone)]
pub struct PromotionRepository {
    pool: Pool<Sqlite>,
}

impl PromotionRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<Promotion> {
        Ok(Promotion {
            id: row_uuid(row, "id")?,
            title_bn: row.try_get("title_bn")?,
            title_en: row.try_get("title_en")?,
            desc_bn: row.try_get("desc_bn")?,
            desc_en: row.try_get("desc_en")?,
            image_url: row.try_get("image_url")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<Promotion> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("promotions", "id", id.to_string()))
    }
}

#[async_trait]
impl Repository<Promotion, Uuid> for PromotionRepository {
    type CreateRequest = PromotionCreateRequest;
    type UpdateRequest = PromotionUpdateRequest;
    type Query = ();

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Promotion>> {
        let row = sqlx::query(&format!("SELECT {} FROM promotions WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, _query: ()) -> RepositoryResult<Vec<Promotion>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM promotions ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(&self, request: PromotionCreateRequest) -> RepositoryResult<Promotion> {
        let now = now_string();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO promotions (id, title_bn, title_en, desc_bn, desc_en, image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.title_bn)
        .bind(&request.title_en)
        .bind(&request.desc_bn)
        .bind(&request.desc_en)
        .bind(&request.image_url)
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
        request: PromotionUpdateRequest,
    ) -> RepositoryResult<Promotion> {
        let mut promotion = self.require(id).await?;

        if let Some(v) = request.title_bn {
            promotion.title_bn = v;
        }
        if let Some(v) = request.title_en {
            promotion.title_en = v;
        }
        if let Some(v) = request.desc_bn {
            promotion.desc_bn = v;
        }
        if let Some(v) = request.desc_en {
            promotion.desc_en = v;
        }
        if let Some(v) = request.image_url {
            promotion.image_url = v;
        }
        promotion.updated_at = Utc::now();

        sqlx::query(
            "UPDATE promotions SET title_bn = ?, title_en = ?, desc_bn = ?, desc_en = ?, image_url = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&promotion.title_bn)
        .bind(&promotion.title_en)
        .bind(&promotion.desc_bn)
        .bind(&promotion.desc_en)
        .bind(&promotion.image_url)
        .bind(utils::format_datetime(&promotion.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(promotion)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Promotion> {
        let promotion = self.require(id).await?;
        sqlx::query("DELETE FROM promotions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(promotion)
    }

    async fn count(&self, _query: ()) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promotions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
