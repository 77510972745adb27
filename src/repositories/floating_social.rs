use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::{Repository, ToggleRepository};
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{
    CollectionQuery, FloatingSocial, FloatingSocialCreateRequest, FloatingSocialUpdateRequest,
};
use crate::utils;

const COLUMNS: &str = "id, name, image_url, link_url, is_active, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct FloatingSocialRepository {
    pool: Pool<Sqlite>,
}

impl FloatingSocialRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<FloatingSocial> {
        Ok(FloatingSocial {
            id: row_uuid(row, "id")?,
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            link_url: row.try_get("link_url")?,
            is_active: row.try_get("is_active")?,
            order: row.try_get("sort_order")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<FloatingSocial> {
        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::record_not_found("floating_socials", "id", id.to_string())
        })
    }
}

#[async_trait]
impl Repository<FloatingSocial, Uuid> for FloatingSocialRepository {
    type CreateRequest = FloatingSocialCreateRequest;
    type UpdateRequest = FloatingSocialUpdateRequest;
    type Query = CollectionQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<FloatingSocial>> {
        let row = sqlx::query(&format!("SELECT {} FROM floating_socials WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, query: CollectionQuery) -> RepositoryResult<Vec<FloatingSocial>> {
        let filter = if query.active_only { "WHERE is_active = 1" } else { "" };
        let rows = sqlx::query(&format!(
            "SELECT {} FROM floating_socials {} ORDER BY sort_order ASC, created_at DESC, rowid DESC",
            COLUMNS, filter
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(
        &self,
        request: FloatingSocialCreateRequest,
    ) -> RepositoryResult<FloatingSocial> {
        let now = now_string();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO floating_socials (id, name, image_url, link_url, is_active, sort_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.image_url)
        .bind(&request.link_url)
        .bind(request.is_active)
        .bind(request.order)
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
        request: FloatingSocialUpdateRequest,
    ) -> RepositoryResult<FloatingSocial> {
        let mut social = self.require(id).await?;

        if let Some(name) = request.name {
            social.name = name;
        }
        if let Some(image_url) = request.image_url {
            social.image_url = image_url;
        }
        if let Some(link_url) = request.link_url {
            social.link_url = link_url;
        }
        if let Some(is_active) = request.is_active {
            social.is_active = is_active;
        }
        if let Some(order) = request.order {
            social.order = order;
        }
        social.updated_at = Utc::now();

        sqlx::query(
            "UPDATE floating_socials SET name = ?, image_url = ?, link_url = ?, is_active = ?, sort_order = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&social.name)
        .bind(&social.image_url)
        .bind(&social.link_url)
        .bind(social.is_active)
        .bind(social.order)
        .bind(utils::format_datetime(&social.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(social)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<FloatingSocial> {
        let social = self.require(id).await?;
        sqlx::query("DELETE FROM floating_socials WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(social)
    }

    async fn count(&self, query: CollectionQuery) -> RepositoryResult<u64> {
        let sql = if query.active_only {
            "SELECT COUNT(*) FROM floating_socials WHERE is_active = 1"
        } else {
            "SELECT COUNT(*) FROM floating_socials"
        };
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ToggleRepository<FloatingSocial, Uuid> for FloatingSocialRepository {
    async fn set_active(&self, id: Uuid, value: Option<bool>) -> RepositoryResult<FloatingSocial> {
        let current = self.require(id).await?;
        self.update(
            id,
            FloatingSocialUpdateRequest {
                is_active: Some(value.unwrap_or(!current.is_active)),
                ..Default::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_pool;

    fn request(name: &str, order: i64) -> FloatingSocialCreateRequest {
        FloatingSocialCreateRequest {
            name: name.to_string(),
            image_url: format!("/uploads/{}.png", name),
            link_url: format!("https://example.com/{}", name),
            is_active: true,
            order,
        }
    }

    #[tokio::test]
    async fn test_sorted_by_order_then_recency() {
        let repo = FloatingSocialRepository::new(test_pool().await);
        repo.create(request("telegram", 2)).await.unwrap();
        repo.create(request("whatsapp", 1)).await.unwrap();
        repo.create(request("messenger", 1)).await.unwrap();

        let names: Vec<String> = repo
            .find_all(CollectionQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["messenger", "whatsapp", "telegram"]);
    }

    #[tokio::test]
    async fn test_update_order_moves_item() {
        let repo = FloatingSocialRepository::new(test_pool().await);
        let telegram = repo.create(request("telegram", 5)).await.unwrap();
        repo.create(request("whatsapp", 1)).await.unwrap();

        repo.update(
            telegram.id,
            FloatingSocialUpdateRequest {
                order: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let first = &repo.find_all(CollectionQuery::active()).await.unwrap()[0];
        assert_eq!(first.name, "telegram");
        assert_eq!(first.order, 0);
    }
}
