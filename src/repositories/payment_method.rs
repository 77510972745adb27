use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::{Repository, ToggleRepository};
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{
    CollectionQuery, PaymentMethod, PaymentMethodCreateRequest, PaymentMethodUpdateRequest,
};
use crate::utils;

const COLUMNS: &str = "id, name, image_url, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentMethodRepository {
    pool: Pool<Sqlite>,
}

impl PaymentMethodRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<PaymentMethod> {
        Ok(PaymentMethod {
            id: row_uuid(row, "id")?,
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            is_active: row.try_get("is_active")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<PaymentMethod> {
        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::record_not_found("payment_methods", "id", id.to_string())
        })
    }

    fn where_clause(query: CollectionQuery) -> &'static str {
        if query.active_only {
            "WHERE is_active = 1"
        } else {
            ""
        }
    }
}

#[async_trait]
impl Repository<PaymentMethod, Uuid> for PaymentMethodRepository {
    type CreateRequest = PaymentMethodCreateRequest;
    type UpdateRequest = PaymentMethodUpdateRequest;
    type Query = CollectionQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<PaymentMethod>> {
        let row = sqlx::query(&format!("SELECT {} FROM payment_methods WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, query: CollectionQuery) -> RepositoryResult<Vec<PaymentMethod>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM payment_methods {} ORDER BY created_at DESC, rowid DESC",
            COLUMNS,
            Self::where_clause(query)
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(&self, request: PaymentMethodCreateRequest) -> RepositoryResult<PaymentMethod> {
        let now = now_string();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO payment_methods (id, name, image_url, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.image_url)
        .bind(request.is_active)
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
        request: PaymentMethodUpdateRequest,
    ) -> RepositoryResult<PaymentMethod> {
        let mut method = self.require(id).await?;

        if let Some(name) = request.name {
            method.name = name;
        }
        if let Some(image_url) = request.image_url {
            method.image_url = image_url;
        }
        if let Some(is_active) = request.is_active {
            method.is_active = is_active;
        }
        method.updated_at = Utc::now();

        sqlx::query(
            "UPDATE payment_methods SET name = ?, image_url = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&method.name)
        .bind(&method.image_url)
        .bind(method.is_active)
        .bind(utils::format_datetime(&method.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(method)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<PaymentMethod> {
        let method = self.require(id).await?;
        sqlx::query("DELETE FROM payment_methods WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(method)
    }

    async fn count(&self, query: CollectionQuery) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM payment_methods {}",
            Self::where_clause(query)
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ToggleRepository<PaymentMethod, Uuid> for PaymentMethodRepository {
    async fn set_active(&self, id: Uuid, value: Option<bool>) -> RepositoryResult<PaymentMethod> {
        let current = self.require(id).await?;
        self.update(
            id,
            PaymentMethodUpdateRequest {
                is_active: Some(value.unwrap_or(!current.is_active)),
                ..Default::default()
            },
        )
        .await
    }
}
