//! HTTP response types and utilities
//!
//! Every JSON endpoint answers with [`ApiResponse`], success or not, so the
//! dashboard and the game client only ever parse one shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::error;

use crate::errors::{AppError, RepositoryError, StorageError};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_with_details(
        message: String,
        details: HashMap<String, String>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            details: Some(details),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page number (1-based)
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(u64::from(per_page)) as u32
        } else {
            1
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

/// Body of a successful delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse<I> {
    pub id: I,
}

/// Convert AppError to appropriate HTTP response
pub fn handle_error(error: AppError) -> Response {
    let (status, message, details) = match &error {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone(), None),
        AppError::NotFound { resource, id } => (
            StatusCode::NOT_FOUND,
            format!("{} with id '{}' not found", resource, id),
            None,
        ),
        AppError::Repository(RepositoryError::ConstraintViolation { message, .. }) => {
            (StatusCode::BAD_REQUEST, message.clone(), None)
        }
        AppError::Repository(RepositoryError::RecordNotFound { table, value, .. }) => (
            StatusCode::NOT_FOUND,
            format!("{} with id '{}' not found", table, value),
            None,
        ),
        AppError::Repository(e) => {
            error!("Repository error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Data access failed".to_string(),
                None,
            )
        }
        AppError::Storage(StorageError::Io(e)) => {
            error!("Upload storage error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "File storage failed".to_string(),
                None,
            )
        }
        AppError::Storage(e) => (StatusCode::BAD_REQUEST, e.to_string(), None),
        AppError::GameLaunch(e) => {
            let mut details = HashMap::new();
            details.insert("kind".to_string(), e.kind().to_string());
            if let Some(body) = e.upstream_body() {
                details.insert("upstream_body".to_string(), body.to_string());
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get game URL: {}", e),
                Some(details),
            )
        }
        AppError::Internal { message } => {
            error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            )
        }
    };

    let response = match details {
        Some(details) => ApiResponse::<()>::error_with_details(message, details),
        None => ApiResponse::<()>::error(message),
    };

    (status, Json(response)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(self)
    }
}

/// Success response helpers
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::success(data))).into_response()
}

pub fn deleted<I: Serialize>(id: I) -> Response {
    ok(DeletedResponse { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GameLaunchError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::validation("bad"), StatusCode::BAD_REQUEST),
            (AppError::not_found("Game", "1"), StatusCode::NOT_FOUND),
            (
                RepositoryError::constraint_violation("game_id", "game_id already exists").into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                RepositoryError::record_not_found("games", "id", "1").into(),
                StatusCode::NOT_FOUND,
            ),
            (
                RepositoryError::decode("status", "bad").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StorageError::UnsupportedContentType {
                    content_type: "text/plain".to_string(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                GameLaunchError::MalformedResponse {
                    body: "{}".to_string(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_error(error).status(), expected);
        }
    }

    #[test]
    fn test_pagination_math() {
        let page = PaginatedResponse::new(vec![1, 2], 5, 2, 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);

        let empty = PaginatedResponse::<u8>::new(Vec::new(), 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }
}
