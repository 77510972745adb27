//! Shared repository for image-only collections (providers, sliders)

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::Repository;
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Banner, BannerCreateRequest, BannerKind, BannerUpdateRequest};
use crate::utils;

/// Repository scoped to one [`BannerKind`]
///
/// Rows of other kinds are invisible through this repository, including
/// by id.
#[derive(Clone)]
pub struct BannerRepository {
    pool: Pool<Sqlite>,
    kind: BannerKind,
}

impl BannerRepository {
    pub fn new(pool: Pool<Sqlite>, kind: BannerKind) -> Self {
        Self { pool, kind }
    }

    fn map_row(&self, row: &SqliteRow) -> RepositoryResult<Banner> {
        Ok(Banner {
            id: row_uuid(row, "id")?,
            kind: self.kind,
            image_url: row.try_get("image_url")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<Banner> {
        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::record_not_found(self.kind.as_str(), "id", id.to_string())
        })
    }
}

#[async_trait]
impl Repository<Banner, Uuid> for BannerRepository {
    type CreateRequest = BannerCreateRequest;
    type UpdateRequest = BannerUpdateRequest;
    type Query = ();

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Banner>> {
        let row = sqlx::query(
            "SELECT id, image_url, created_at, updated_at FROM banners WHERE id = ? AND kind = ?",
        )
        .bind(id.to_string())
        .bind(self.kind.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(|r| self.map_row(r)).transpose()
    }

    async fn find_all(&self, _query: ()) -> RepositoryResult<Vec<Banner>> {
        let rows = sqlx::query(
            "SELECT id, image_url, created_at, updated_at FROM banners WHERE kind = ?
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(self.kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|r| self.map_row(r)).collect()
    }

    async fn create(&self, request: BannerCreateRequest) -> RepositoryResult<Banner> {
        let now = now_string();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO banners (id, kind, image_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(self.kind.as_str())
        .bind(&request.image_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.require(id).await
    }

    async fn update(&self, id: Uuid, request: BannerUpdateRequest) -> RepositoryResult<Banner> {
        let mut banner = self.require(id).await?;

        if let Some(image_url) = request.image_url {
            banner.image_url = image_url;
        }
        banner.updated_at = Utc::now();

        sqlx::query("UPDATE banners SET image_url = ?, updated_at = ? WHERE id = ? AND kind = ?")
            .bind(&banner.image_url)
            .bind(utils::format_datetime(&banner.updated_at))
            .bind(id.to_string())
            .bind(self.kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        Ok(banner)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Banner> {
        let banner = self.require(id).await?;
        sqlx::query("DELETE FROM banners WHERE id = ? AND kind = ?")
            .bind(id.to_string())
            .bind(self.kind.as_str())
            .execute(&self.pool)
            .await?;
        Ok(banner)
    }

    async fn count(&self, _query: ()) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM banners WHERE kind = ?")
            .bind(self.kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_pool;

    #[tokio::test]
    async fn test_kinds_are_isolated() {
        let pool = test_pool().await;
        let sliders = BannerRepository::new(pool.clone(), BannerKind::Slider);
        let providers = BannerRepository::new(pool, BannerKind::Provider);

        let slide = sliders
            .create(BannerCreateRequest {
                image_url: "/uploads/slide.png".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(sliders.count(()).await.unwrap(), 1);
        assert_eq!(providers.count(()).await.unwrap(), 0);
        assert!(providers.find_by_id(slide.id).await.unwrap().is_none());
        assert!(matches!(
            providers.delete(slide.id).await,
            Err(RepositoryError::RecordNotFound { .. })
        ));
        assert!(sliders.exists(slide.id).await.unwrap());
    }
}
