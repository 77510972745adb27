//! Request extractors
//!
//! Rejections are turned into [`AppError`] so malformed input gets the same
//! 400 envelope as any other validation failure.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Pagination parameters from query string
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::validation("page must be >= 1"));
        }
        if !(1..=100).contains(&self.limit) {
            return Err(AppError::validation("limit must be between 1 and 100"));
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PaginationParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid pagination parameters"))?;

        params.validate()?;
        Ok(params)
    }
}

/// UUID path parameter
#[derive(Debug, Clone, Copy)]
pub struct ValidatedUuid(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ValidatedUuid
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        Uuid::parse_str(&raw)
            .map(Self)
            .map_err(|_| AppError::validation(format!("Invalid id '{}'", raw)))
    }
}

/// JSON body whose rejections are reported as validation errors
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(Self(value))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ToggleBody {
    is_active: Option<bool>,
    status: Option<bool>,
}

/// Optional `{ "isActive": bool }` (or `{ "status": bool }`) body of a
/// status toggle. An empty body means "flip the current value".
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusToggle(pub Option<bool>);

#[async_trait]
impl<S> FromRequest<S> for StatusToggle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        let parsed: ToggleBody = serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid status body: {}", e)))?;
        Ok(Self(parsed.is_active.or(parsed.status)))
    }
}
