//! Site title/favicon configurations
//!
//! Many rows may exist but at most one is active. A partial unique index
//! backs that up; [`SiteConfigRepository::activate`] and active creates
//! clear the previous active row inside the same transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite, Transaction};
use tracing::info;
use uuid::Uuid;

use super::traits::Repository;
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{SiteConfig, SiteConfigCreateRequest, SiteConfigUpdateRequest};
use crate::utils;

const COLUMNS: &str = "id, site_title, favicon_url, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct SiteConfigRepository {
    pool: Pool<Sqlite>,
}

impl SiteConfigRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<SiteConfig> {
        Ok(SiteConfig {
            id: row_uuid(row, "id")?,
            site_title: row.try_get("site_title")?,
            favicon_url: row.try_get("favicon_url")?,
            is_active: row.try_get("is_active")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<SiteConfig> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("site_configs", "id", id.to_string()))
    }

    async fn deactivate_all(tx: &mut Transaction<'_, Sqlite>, now: &str) -> RepositoryResult<()> {
        sqlx::query("UPDATE site_configs SET is_active = 0, updated_at = ? WHERE is_active = 1")
            .bind(now)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// The active configuration, if any
    pub async fn find_active(&self) -> RepositoryResult<Option<SiteConfig>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM site_configs WHERE is_active = 1 LIMIT 1",
            COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    /// Make `id` the only active configuration
    pub async fn activate(&self, id: Uuid) -> RepositoryResult<SiteConfig> {
        let now = now_string();
        let mut tx = self.pool.begin().await?;

        Self::deactivate_all(&mut tx, &now).await?;
        let result =
            sqlx::query("UPDATE site_configs SET is_active = 1, updated_at = ? WHERE id = ?")
                .bind(&now)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::record_not_found(
                "site_configs",
                "id",
                id.to_string(),
            ));
        }

        tx.commit().await?;
        info!("Activated site config {}", id);
        self.require(id).await
    }
}

#[async_trait]
impl Repository<SiteConfig, Uuid> for SiteConfigRepository {
    type CreateRequest = SiteConfigCreateRequest;
    type UpdateRequest = SiteConfigUpdateRequest;
    type Query = ();

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<SiteConfig>> {
        let row = sqlx::query(&format!("SELECT {} FROM site_configs WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, _query: ()) -> RepositoryResult<Vec<SiteConfig>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM site_configs ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(&self, request: SiteConfigCreateRequest) -> RepositoryResult<SiteConfig> {
        let now = now_string();
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        if request.is_active {
            Self::deactivate_all(&mut tx, &now).await?;
        }

        sqlx::query(
            "INSERT INTO site_configs (id, site_title, favicon_url, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.site_title)
        .bind(&request.favicon_url)
        .bind(request.is_active)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;
        self.require(id).await
    }

    async fn update(
        &self,
        id: Uuid,
        request: SiteConfigUpdateRequest,
    ) -> RepositoryResult<SiteConfig> {
        let mut config = self.require(id).await?;

        if let Some(site_title) = request.site_title {
            config.site_title = site_title;
        }
        if let Some(favicon_url) = request.favicon_url {
            config.favicon_url = Some(favicon_url);
        }
        config.updated_at = Utc::now();

        sqlx::query(
            "UPDATE site_configs SET site_title = ?, favicon_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&config.site_title)
        .bind(&config.favicon_url)
        .bind(utils::format_datetime(&config.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(config)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<SiteConfig> {
        let config = self.require(id).await?;
        sqlx::query("DELETE FROM site_configs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(config)
    }

    async fn count(&self, _query: ()) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_configs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
