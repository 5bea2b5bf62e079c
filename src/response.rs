//! Standard response envelope: `{success, message, data}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
}

impl Envelope {
    pub fn failure(message: String) -> Self {
        Envelope {
            success: false,
            message,
            data: Value::Null,
        }
    }
}

/// Outcome of a successful entity operation, before it is wrapped for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub message: String,
    pub data: Value,
}

impl Reply {
    pub fn new(message: impl Into<String>, data: Value) -> Self {
        Reply {
            message: message.into(),
            data,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(message, Value::Null)
    }

    pub fn rows(message: impl Into<String>, rows: Vec<Value>) -> Self {
        Self::new(message, Value::Array(rows))
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            Json(Envelope {
                success: true,
                message: self.message,
                data: self.data,
            }),
        )
            .into_response()
    }
}
