use axum::body::Bytes;
use image::ImageFormat;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{StorageError, StorageResult};

/// URL prefix under which stored files are served
pub const PUBLIC_PREFIX: &str = "/uploads/";

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    fn looks_like_svg(&self) -> bool {
        let declared = self.content_type.as_deref() == Some("image/svg+xml")
            || self
                .file_name
                .as_deref()
                .map(|n| n.to_ascii_lowercase().ends_with(".svg"))
                .unwrap_or(false);
        let head = &self.data[..self.data.len().min(1024)];
        declared && String::from_utf8_lossy(head).contains("<svg")
    }
}

#[derive(Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_storage_dir(&self) -> Result<(), std::io::Error> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
        }
        Ok(())
    }

    /// File extension for the upload, from its magic bytes
    ///
    /// SVG has no magic number, so it is accepted when both the declared
    /// type (or file name) and the content agree.
    fn extension_for(file: &UploadedFile) -> StorageResult<&'static str> {
        if let Ok(format) = image::guess_format(&file.data) {
            let extension = match format {
                ImageFormat::Png => "png",
                ImageFormat::Jpeg => "jpg",
                ImageFormat::Gif => "gif",
                ImageFormat::WebP => "webp",
                ImageFormat::Ico => "ico",
                ImageFormat::Bmp => "bmp",
                other => other.extensions_str().first().copied().unwrap_or("img"),
            };
            return Ok(extension);
        }

        if file.looks_like_svg() {
            return Ok("svg");
        }

        Err(StorageError::UnsupportedContentType {
            content_type: file
                .content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        })
    }

    /// Write `file` under a generated name and return its public path
    pub async fn store(&self, file: &UploadedFile) -> StorageResult<String> {
        if file.data.is_empty() {
            return Err(StorageError::Empty);
        }
        let extension = Self::extension_for(file)?;

        self.ensure_storage_dir().await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        fs::write(self.root.join(&file_name), &file.data).await?;

        debug!("Stored upload {} ({} bytes)", file_name, file.data.len());
        Ok(format!("{}{}", PUBLIC_PREFIX, file_name))
    }

    /// Map a public `/uploads/<name>` path to its location on disk
    pub fn resolve(&self, public_path: &str) -> StorageResult<PathBuf> {
        let invalid = || StorageError::InvalidPath {
            path: public_path.to_string(),
        };

        let name = public_path.strip_prefix(PUBLIC_PREFIX).ok_or_else(invalid)?;
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => Ok(self.root.join(part)),
            _ => Err(invalid()),
        }
    }

    pub async fn exists(&self, public_path: &str) -> bool {
        match self.resolve(public_path) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Delete a stored file. A file that is already gone is not an error.
    pub async fn delete(&self, public_path: &str) -> StorageResult<()> {
        let path = self.resolve(public_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file, logging instead of failing
    pub async fn delete_best_effort(&self, public_path: &str) {
        match self.delete(public_path).await {
            Ok(()) => debug!("Deleted upload {}", public_path),
            Err(StorageError::InvalidPath { .. }) => {
                debug!("Not deleting {}: not a stored upload", public_path)
            }
            Err(e) => warn!("Orphaned upload {}: delete failed: {}", public_path, e),
        }
    }
}
