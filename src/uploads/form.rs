//! Multipart form extractor shared by the image-bearing endpoints

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::storage::UploadedFile;
use crate::errors::{AppError, AppResult};
use crate::utils;

/// Parsed multipart body: text parts by name, file parts by name
///
/// File parts with no content are treated as absent, which is what browsers
/// send for an untouched `<input type="file">`. The typed accessors treat
/// blank text parts as absent too; [`UploadForm::raw_text`] does not.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read '{}': {}", name, e)))?;

            if file_name.is_some() {
                if !data.is_empty() {
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            data,
                        },
                    );
                }
            } else {
                let value = String::from_utf8(data.to_vec())
                    .map_err(|_| AppError::validation(format!("{} must be UTF-8 text", name)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

impl UploadForm {
    /// Text value of `name`, if present and not blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Text value of `name` exactly as submitted, blank included
    pub fn raw_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn text_owned(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    pub fn required_text(&self, name: &str) -> AppResult<String> {
        self.text_owned(name)
            .ok_or_else(|| AppError::validation(format!("{} is required", name)))
    }

    pub fn bool(&self, name: &str) -> AppResult<Option<bool>> {
        self.text(name)
            .map(|raw| {
                utils::parse_form_bool(raw)
                    .ok_or_else(|| AppError::validation(format!("{} must be true or false", name)))
            })
            .transpose()
    }

    pub fn i64(&self, name: &str) -> AppResult<Option<i64>> {
        self.text(name)
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::validation(format!("{} must be an integer", name)))
            })
            .transpose()
    }

    /// Parse a text part holding JSON
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                serde_json::from_str(raw)
                    .map_err(|e| AppError::validation(format!("{} is not valid: {}", name, e)))
            })
            .transpose()
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn required_file(&self, name: &str) -> AppResult<&UploadedFile> {
        self.file(name)
            .ok_or_else(|| AppError::validation(format!("{} file is required", name)))
    }
}
