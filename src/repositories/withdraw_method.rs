//! Withdraw method repository
//!
//! `custom_fields` is persisted as a JSON array column and decoded back into
//! typed [`CustomField`] definitions on read.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::traits::{Repository, ToggleRepository};
use super::{now_string, row_datetime, row_uuid};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{
    CollectionQuery, CustomField, LocalizedText, WithdrawMethod, WithdrawMethodCreateRequest,
    WithdrawMethodUpdateRequest,
};
use crate::utils;

const COLUMNS: &str = "id, method_name_en, method_name_bn, image_url, custom_fields, is_active, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct WithdrawMethodRepository {
    pool: Pool<Sqlite>,
}

impl WithdrawMethodRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> RepositoryResult<WithdrawMethod> {
        let raw_fields: String = row.try_get("custom_fields")?;
        let custom_fields: Vec<CustomField> = serde_json::from_str(&raw_fields)
            .map_err(|e| RepositoryError::decode("custom_fields", e.to_string()))?;

        Ok(WithdrawMethod {
            id: row_uuid(row, "id")?,
            method_name: LocalizedText {
                en: row.try_get("method_name_en")?,
                bn: row.try_get("method_name_bn")?,
            },
            image_url: row.try_get("image_url")?,
            custom_fields,
            is_active: row.try_get("is_active")?,
            order: row.try_get("sort_order")?,
            created_at: row_datetime(row, "created_at")?,
            updated_at: row_datetime(row, "updated_at")?,
        })
    }

    async fn require(&self, id: Uuid) -> RepositoryResult<WithdrawMethod> {
        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::record_not_found("withdraw_methods", "id", id.to_string())
        })
    }
}

#[async_trait]
impl Repository<WithdrawMethod, Uuid> for WithdrawMethodRepository {
    type CreateRequest = WithdrawMethodCreateRequest;
    type UpdateRequest = WithdrawMethodUpdateRequest;
    type Query = CollectionQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<WithdrawMethod>> {
        let row = sqlx::query(&format!("SELECT {} FROM withdraw_methods WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_all(&self, query: CollectionQuery) -> RepositoryResult<Vec<WithdrawMethod>> {
        let filter = if query.active_only { "WHERE is_active = 1" } else { "" };
        let rows = sqlx::query(&format!(
            "SELECT {} FROM withdraw_methods {} ORDER BY sort_order ASC, created_at DESC, rowid DESC",
            COLUMNS, filter
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn create(
        &self,
        request: WithdrawMethodCreateRequest,
    ) -> RepositoryResult<WithdrawMethod> {
        let now = now_string();
        let id = Uuid::new_v4();
        let custom_fields = serde_json::to_string(&request.custom_fields)?;

        sqlx::query(
            "INSERT INTO withdraw_methods (id, method_name_en, method_name_bn, image_url, custom_fields, is_active, sort_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.method_name.en)
        .bind(&request.method_name.bn)
        .bind(&request.image_url)
        .bind(custom_fields)
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
        request: WithdrawMethodUpdateRequest,
    ) -> RepositoryResult<WithdrawMethod> {
        let mut method = self.require(id).await?;

        if let Some(en) = request.method_name_en {
            method.method_name.en = en;
        }
        if let Some(bn) = request.method_name_bn {
            method.method_name.bn = bn;
        }
        if let Some(image_url) = request.image_url {
            method.image_url = image_url;
        }
        if let Some(custom_fields) = request.custom_fields {
            method.custom_fields = custom_fields;
        }
        if let Some(is_active) = request.is_active {
            method.is_active = is_active;
        }
        if let Some(order) = request.order {
            method.order = order;
        }
        method.updated_at = Utc::now();

        sqlx::query(
            "UPDATE withdraw_methods SET method_name_en = ?, method_name_bn = ?, image_url = ?, custom_fields = ?,
                 is_active = ?, sort_order = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&method.method_name.en)
        .bind(&method.method_name.bn)
        .bind(&method.image_url)
        .bind(serde_json::to_string(&method.custom_fields)?)
        .bind(method.is_active)
        .bind(method.order)
        .bind(utils::format_datetime(&method.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(method)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<WithdrawMethod> {
        let method = self.require(id).await?;
        sqlx::query("DELETE FROM withdraw_methods WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(method)
    }

    async fn count(&self, query: CollectionQuery) -> RepositoryResult<u64> {
        let sql = if query.active_only {
            "SELECT COUNT(*) FROM withdraw_methods WHERE is_active = 1"
        } else {
            "SELECT COUNT(*) FROM withdraw_methods"
        };
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ToggleRepository<WithdrawMethod, Uuid> for WithdrawMethodRepository {
    async fn set_active(&self, id: Uuid, value: Option<bool>) -> RepositoryResult<WithdrawMethod> {
        let current = self.require(id).await?;
        self.update(
            id,
            WithdrawMethodUpdateRequest {
                is_active: Some(value.unwrap_or(!current.is_active)),
                ..Default::default()
            },
        )
        .await
    }
}
