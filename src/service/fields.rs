//! Request payload and typed field access: presence checks plus parsing at the boundary.

use crate::error::AppError;
use crate::model::PaymentStatus;
use axum::body::Bytes;
use chrono::NaiveDate;
use std::collections::HashMap;

/// A file part of a multipart body.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Form fields (urlencoded or multipart) plus any file parts, keyed by field name.
#[derive(Clone, Debug, Default)]
pub struct Payload {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl Payload {
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        Payload {
            fields,
            files: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    pub fn insert_field(&mut self, name: String, value: String) {
        self.fields.insert(name, value);
    }

    pub fn insert_file(&mut self, name: String, file: UploadedFile) {
        self.files.insert(name, file);
    }

    /// Trimmed text; absent and blank are both `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn int(&self, name: &'static str) -> Result<Option<i64>, AppError> {
        self.parsed(name, |s| s.parse::<i64>().map_err(|_| "must be an integer".to_string()))
    }

    /// `YYYY-MM-DD`.
    pub fn date(&self, name: &'static str) -> Result<Option<NaiveDate>, AppError> {
        self.parsed(name, |s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| "must be a date (YYYY-MM-DD)".to_string())
        })
    }

    pub fn status(&self, name: &'static str) -> Result<Option<PaymentStatus>, AppError> {
        self.parsed(name, |s| s.parse::<PaymentStatus>())
    }

    /// Non-empty file part.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files
            .get(name)
            .filter(|f| !f.file_name.is_empty() && !f.bytes.is_empty())
    }

    /// Error listing which of `names` are absent or blank.
    pub fn missing(&self, names: &[&'static str]) -> AppError {
        let missing = names.iter().copied().filter(|n| self.text(n).is_none()).collect();
        AppError::MissingFields(missing)
    }

    fn parsed<T>(
        &self,
        name: &'static str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<Option<T>, AppError> {
        match self.text(name) {
            None => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .map_err(|reason| AppError::InvalidField { field: name, reason }),
        }
    }
}
