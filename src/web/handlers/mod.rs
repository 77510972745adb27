//! HTTP request handlers organized by resource
//!
//! The helpers here cover the parts every collection shares: lookups that
//! turn a missing row into a 404, deletes that also drop the row's images,
//! and `is_active`/`status` toggles.

use axum::response::Response;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, RepositoryError};
use crate::models::{self, ImageOwner, SettingsDocument};
use crate::repositories::{Repository, ToggleRepository};
use crate::uploads::{UploadBatch, UploadForm, UploadStorage};
use crate::web::{
    responses::{deleted, ok},
    AppState,
};

pub mod banners;
pub mod dashboard;
pub mod floating_socials;
pub mod footer;
pub mod game_history;
pub mod games;
pub mod health;
pub mod logo;
pub mod notices;
pub mod payment_methods;
pub mod play_game;
pub mod promotions;
pub mod settings;
pub mod site_configs;
pub mod withdraw_methods;

/// Map a repository "no such row" onto a 404 for `resource`
pub(crate) fn missing(
    resource: &str,
    id: Uuid,
) -> impl FnOnce(RepositoryError) -> AppError + '_ {
    move |err| match err {
        RepositoryError::RecordNotFound { .. } => AppError::not_found(resource, id.to_string()),
        other => AppError::Repository(other),
    }
}

/// Load one row or fail with 404
pub(crate) async fn fetch<T, R>(repo: &R, resource: &str, id: Uuid) -> AppResult<T>
where
    R: Repository<T, Uuid>,
{
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(resource, id.to_string()))
}

/// Delete a row, then its files
pub(crate) async fn remove_with_images<T, R>(
    repo: &R,
    storage: &UploadStorage,
    resource: &str,
    id: Uuid,
) -> AppResult<Response>
where
    T: ImageOwner,
    R: Repository<T, Uuid>,
{
    let removed = repo.delete(id).await.map_err(missing(resource, id))?;

    for path in removed.image_paths() {
        storage.delete_best_effort(path).await;
    }

    Ok(deleted(id))
}

/// Set or flip the flag on a row
pub(crate) async fn toggle<T, R>(
    repo: &R,
    resource: &str,
    id: Uuid,
    value: Option<bool>,
) -> AppResult<Response>
where
    T: Serialize,
    R: ToggleRepository<T, Uuid>,
{
    let updated = repo
        .set_active(id, value)
        .await
        .map_err(missing(resource, id))?;
    Ok(ok(updated))
}

/// Apply a multipart update to a singleton document made of text and image
/// fields. Only submitted parts change, and a submitted blank text part
/// clears its field. Each replaced image is retired once the document is
/// written.
pub(crate) async fn save_image_set<T: SettingsDocument>(
    state: &AppState,
    form: &UploadForm,
    text_fields: &[&str],
    image_fields: &[&str],
    image_field: for<'a> fn(&'a T, &str) -> Option<&'a str>,
) -> AppResult<T> {
    let mut patch = Map::new();
    for name in text_fields {
        if let Some(value) = form.raw_text(name) {
            patch.insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    let current = state.settings.get::<T>().await?.map(|r| r.document);
    models::patched::<T>(current, &patch).map_err(AppError::validation)?;

    let mut uploads = UploadBatch::new(&state.storage);
    let result = async {
        let mut replaced = Vec::new();
        for name in image_fields {
            let Some(file) = form.file(name) else {
                continue;
            };
            let path = uploads.store(file).await?;
            patch.insert(name.to_string(), Value::String(path));
            replaced.push(*name);
        }

        // Retire against the document this write actually replaced
        let (previous, saved) = state.settings.replace::<T>(&patch).await?;
        if let Some(previous) = &previous {
            for name in replaced {
                if let Some(old) = image_field(previous, name) {
                    uploads.retire(old);
                }
            }
        }
        Ok::<_, AppError>(saved)
    }
    .await;

    uploads.finish(result).await
}
