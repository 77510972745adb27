//! Error type definitions for the gamesite admin service

use thiserror::Error;

/// Top-level application error type
///
/// Handlers return `AppResult<T>`; the web layer maps each variant onto an
/// HTTP status in `web::responses::handle_error`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Repository layer errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Upload storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Game aggregator errors
    #[error("Game launch error: {0}")]
    GameLaunch(#[from] GameLaunchError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Repository layer specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Underlying SQLx failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON column serialization/deserialization failures
    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Constraint violations (unique, check)
    #[error("Constraint violation: {constraint} - {message}")]
    ConstraintViolation { constraint: String, message: String },

    /// Record not found
    #[error("Record not found: {table} with {field} = {value}")]
    RecordNotFound {
        table: String,
        field: String,
        value: String,
    },

    /// Stored value could not be decoded into its model type
    #[error("Invalid stored value in {column}: {message}")]
    Decode { column: String, message: String },
}

/// Upload storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path escapes the uploads directory or does not use the public prefix
    #[error("Invalid upload path: {path}")]
    InvalidPath { path: String },

    /// Uploaded part is not an image
    #[error("Unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("Uploaded file is empty")]
    Empty,
}

/// Classified failures of the outbound game launch call
#[derive(Error, Debug, Clone)]
pub enum GameLaunchError {
    /// Connection refused, DNS failure or timeout
    #[error("Game aggregator unreachable: {message}")]
    Unreachable { message: String },

    /// Aggregator answered with a non-success status
    #[error("Game aggregator rejected request with HTTP {status}")]
    Rejected { status: u16, body: String },

    /// Aggregator answered 2xx but no launch URL could be found
    #[error("Game aggregator returned no launch URL")]
    MalformedResponse { body: String },

    /// HTTP client could not be constructed
    #[error("Game launch client misconfigured: {message}")]
    Configuration { message: String },
}

impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl RepositoryError {
    /// Create a record not found error
    pub fn record_not_found<T: Into<String>, F: Into<String>, V: Into<String>>(
        table: T,
        field: F,
        value: V,
    ) -> Self {
        Self::RecordNotFound {
            table: table.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint_violation<C: Into<String>, M: Into<String>>(
        constraint: C,
        message: M,
    ) -> Self {
        Self::ConstraintViolation {
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a column holding an unexpected value
    pub fn decode<C: Into<String>, M: Into<String>>(column: C, message: M) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Classify a write error, turning SQLite unique violations into
    /// `ConstraintViolation` keyed by the offending column.
    ///
    /// SQLite reports these as `UNIQUE constraint failed: games.game_id`.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let column = db_err
                    .message()
                    .rsplit(['.', ' '])
                    .next()
                    .unwrap_or("value")
                    .to_string();
                let message = format!("{} already exists", column);
                return Self::constraint_violation(column, message);
            }
        }
        Self::Database(err)
    }
}

impl GameLaunchError {
    /// Stable machine-readable name for the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "upstream_unreachable",
            Self::Rejected { .. } => "upstream_rejected",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// Upstream body to relay back to the caller, when one was received
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } | Self::MalformedResponse { body } => Some(body),
            _ => None,
        }
    }

    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::MalformedResponse { .. } | Self::Configuration { .. } => false,
        }
    }
}
