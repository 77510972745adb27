//! Centralized error handling for the gamesite admin service
//!
//! Every layer reports failures through the types in [`types`]. The web layer
//! converts an [`AppError`] into an HTTP response with a status code chosen
//! from the error category, so handlers only ever propagate with `?`.
//!
//! # Error Categories
//!
//! - **Repository Errors**: SQLite operations, constraint violations, decoding
//! - **Storage Errors**: upload directory reads, writes and path checks
//! - **Game Launch Errors**: failures talking to the external game aggregator
//! - **Validation Errors**: malformed or incomplete requests

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for upload storage Results
pub type StorageResult<T> = Result<T, StorageError>;
