//! Extract the request payload from an urlencoded or multipart body.

use crate::error::AppError;
use crate::service::{Payload, UploadedFile};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use std::collections::HashMap;

/// Body rejections become 400s; a body cut off by the size limit gets its own message.
fn rejected(status: StatusCode, body_text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BodyTooLarge
    } else {
        AppError::BadRequest(body_text)
    }
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Bodies of any other content type (or none, e.g. a GET) yield an empty payload.
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state).await.map_err(|e| rejected(e.status(), e.body_text()))?;
            let mut payload = Payload::default();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| rejected(e.status(), e.body_text()))?
            {
                let name = field.name().unwrap_or_default().to_string();
                match field.file_name().map(str::to_string) {
                    Some(file_name) => {
                        let bytes = field.bytes().await.map_err(|e| rejected(e.status(), e.body_text()))?;
                        payload.insert_file(name, UploadedFile { file_name, bytes });
                    }
                    None => {
                        let text = field.text().await.map_err(|e| rejected(e.status(), e.body_text()))?;
                        payload.insert_field(name, text);
                    }
                }
            }
            Ok(payload)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| rejected(e.status(), e.body_text()))?;
            Ok(Payload::from_fields(fields))
        } else {
            Ok(Payload::default())
        }
    }
}
