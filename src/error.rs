//! Typed errors and HTTP mapping.

use crate::response::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("entity & action are required")]
    MissingSelector,
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    #[error("unknown action for {entity}: {action}")]
    UnknownAction { entity: &'static str, action: String },
    #[error("missing required field: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request body exceeds the configured upload size limit")]
    BodyTooLarge,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("duplicate key: {message}")]
    DuplicateKey {
        constraint: Option<String>,
        message: String,
    },
    #[error("corrupt stored key: {0}")]
    CorruptKey(String),
    #[error("upload failed: {0}")]
    Upload(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingSelector
            | AppError::UnknownEntity(_)
            | AppError::UnknownAction { .. }
            | AppError::MissingFields(_)
            | AppError::InvalidField { .. }
            | AppError::BadRequest(_)
            | AppError::BodyTooLarge => StatusCode::BAD_REQUEST,
            AppError::Db(_)
            | AppError::DuplicateKey { .. }
            | AppError::CorruptKey(_)
            | AppError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
        } else {
            tracing::warn!(error = %message, "request rejected");
        }
        (status, Json(Envelope::failure(message))).into_response()
    }
}
