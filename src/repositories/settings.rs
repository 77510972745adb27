//! Singleton settings documents
//!
//! Every [`SettingsDocument`] type owns exactly one row in
//! `settings_documents`, keyed by `T::KEY`. Writes are single-statement
//! upserts on that primary key, so concurrent first saves cannot produce a
//! second row. Partial updates are applied inside SQLite with `json_patch`,
//! which uses the same merge rules as [`crate::models::merge_patch`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;
use uuid::Uuid;

use super::{now_string, row_datetime};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{FooterSettings, SettingsDocument, SocialLink};

/// A stored settings document with its timestamps
#[derive(Debug, Clone)]
pub struct SettingsRecord<T> {
    pub document: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Sqlite>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn decode<T: SettingsDocument>(raw: &str) -> RepositoryResult<T> {
        serde_json::from_str(raw).map_err(|e| RepositoryError::decode(T::KEY, e.to_string()))
    }

    /// Stored document, or `None` before the first save
    pub async fn get<T: SettingsDocument>(&self) -> RepositoryResult<Option<SettingsRecord<T>>> {
        let row = sqlx::query(
            "SELECT document, created_at, updated_at FROM settings_documents WHERE key = ?",
        )
        .bind(T::KEY)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> RepositoryResult<SettingsRecord<T>> {
            let raw: String = row.try_get("document")?;
            Ok(SettingsRecord {
                document: Self::decode(&raw)?,
                created_at: row_datetime(&row, "created_at")?,
                updated_at: row_datetime(&row, "updated_at")?,
            })
        })
        .transpose()
    }

    /// Stored document, or the type's defaults. Never writes.
    pub async fn get_or_default<T: SettingsDocument>(&self) -> RepositoryResult<T> {
        Ok(self.get::<T>().await?.map(|r| r.document).unwrap_or_default())
    }

    /// Merge `patch` into the stored document, creating it from the
    /// defaults when absent, and return the result.
    ///
    /// Callers validate the patch first (see [`crate::models::patched`]).
    pub async fn upsert<T: SettingsDocument>(
        &self,
        patch: &Map<String, Value>,
    ) -> RepositoryResult<T> {
        let raw = Self::upsert_raw::<T, _>(&self.pool, patch).await?;
        debug!("Saved settings document '{}'", T::KEY);
        Self::decode(&raw)
    }

    /// Same as [`Self::upsert`], also returning the document as it was right
    /// before this write.
    ///
    /// The row is write-locked before it is read, so concurrent callers are
    /// serialized and each sees the result of the previous write.
    pub async fn replace<T: SettingsDocument>(
        &self,
        patch: &Map<String, Value>,
    ) -> RepositoryResult<(Option<T>, T)> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE settings_documents SET updated_at = updated_at WHERE key = ?")
            .bind(T::KEY)
            .execute(&mut *tx)
            .await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT document FROM settings_documents WHERE key = ?")
                .bind(T::KEY)
                .fetch_optional(&mut *tx)
                .await?;
        let previous = previous.as_deref().map(Self::decode::<T>).transpose()?;

        let raw = Self::upsert_raw::<T, _>(&mut *tx, patch).await?;
        tx.commit().await?;

        debug!("Replaced settings document '{}'", T::KEY);
        Ok((previous, Self::decode(&raw)?))
    }

    async fn upsert_raw<'e, T, E>(
        executor: E,
        patch: &Map<String, Value>,
    ) -> RepositoryResult<String>
    where
        T: SettingsDocument,
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let defaults = serde_json::to_string(&T::default())?;
        let patch = serde_json::to_string(patch)?;
        let now = now_string();

        sqlx::query_scalar(
            "INSERT INTO settings_documents (key, document, created_at, updated_at)
             VALUES (?1, json_patch(?2, ?3), ?4, ?4)
             ON CONFLICT(key) DO UPDATE SET
                 document = json_patch(settings_documents.document, ?3),
                 updated_at = ?4
             RETURNING document",
        )
        .bind(T::KEY)
        .bind(defaults)
        .bind(patch)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// Append a social link to the footer document
    pub async fn append_social_link(&self, link: &SocialLink) -> RepositoryResult<FooterSettings> {
        let defaults = serde_json::to_string(&FooterSettings::default())?;
        let link = serde_json::to_string(link)?;
        let now = now_string();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO settings_documents (key, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(key) DO NOTHING",
        )
        .bind(FooterSettings::KEY)
        .bind(defaults)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let raw: String = sqlx::query_scalar(
            "UPDATE settings_documents SET
                 document = json_set(
                     document,
                     '$.socialLinks',
                     json_insert(COALESCE(json_extract(document, '$.socialLinks'), '[]'), '$[#]', json(?1))
                 ),
                 updated_at = ?2
             WHERE key = ?3
             RETURNING document",
        )
        .bind(link)
        .bind(&now)
        .bind(FooterSettings::KEY)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Self::decode(&raw)
    }

    /// Remove the footer social link with `id`, returning it when present
    pub async fn remove_social_link(&self, id: Uuid) -> RepositoryResult<Option<SocialLink>> {
        let mut tx = self.pool.begin().await?;

        let raw: Option<String> =
            sqlx::query_scalar("SELECT document FROM settings_documents WHERE key = ?")
                .bind(FooterSettings::KEY)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let mut footer: FooterSettings = Self::decode(&raw)?;
        let Some(index) = footer.social_links.iter().position(|l| l.id == id) else {
            return Ok(None);
        };
        let removed = footer.social_links.remove(index);

        sqlx::query("UPDATE settings_documents SET document = ?, updated_at = ? WHERE key = ?")
            .bind(serde_json::to_string(&footer)?)
            .bind(now_string())
            .bind(FooterSettings::KEY)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(removed))
    }
}
