//! Uploaded image handling
//!
//! Files are written under the configured uploads directory with generated
//! names and referenced from documents by their public `/uploads/...` path.

pub mod batch;
pub mod form;
pub mod storage;

pub use batch::UploadBatch;
pub use form::UploadForm;
pub use storage::{UploadStorage, UploadedFile, PUBLIC_PREFIX};
