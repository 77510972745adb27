//! Keeps uploaded files consistent with the rows that reference them
//!
//! New files are written before the row, old files are removed after it:
//!
//! * the row write fails: the files written for it are deleted
//! * the row write succeeds: the files it no longer references are deleted
//!
//! Deletes are best-effort; a failure is logged with the orphaned path.

use super::storage::{UploadStorage, UploadedFile};
use crate::errors::StorageResult;

pub struct UploadBatch<'a> {
    storage: &'a UploadStorage,
    written: Vec<String>,
    retired: Vec<String>,
}

impl<'a> UploadBatch<'a> {
    pub fn new(storage: &'a UploadStorage) -> Self {
        Self {
            storage,
            written: Vec::new(),
            retired: Vec::new(),
        }
    }

    /// Store `file` and remember it for rollback
    pub async fn store(&mut self, file: &UploadedFile) -> StorageResult<String> {
        let path = self.storage.store(file).await?;
        self.written.push(path.clone());
        Ok(path)
    }

    /// Store `file` if present
    pub async fn store_optional(
        &mut self,
        file: Option<&UploadedFile>,
    ) -> StorageResult<Option<String>> {
        match file {
            Some(file) => self.store(file).await.map(Some),
            None => Ok(None),
        }
    }

    /// Schedule `path` for deletion once the row write succeeds
    pub fn retire(&mut self, path: impl Into<String>) {
        self.retired.push(path.into());
    }

    /// Row write succeeded: drop the files it replaced
    pub async fn commit(self) {
        for path in &self.retired {
            self.storage.delete_best_effort(path).await;
        }
    }

    /// Row write failed: drop the files written for it
    pub async fn rollback(self) {
        for path in &self.written {
            self.storage.delete_best_effort(path).await;
        }
    }

    /// Commit or roll back depending on `result`, then pass it through
    pub async fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        if result.is_ok() {
            self.commit().await;
        } else {
            self.rollback().await;
        }
        result
    }
}
