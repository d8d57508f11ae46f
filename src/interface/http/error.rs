use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::{EngineError, StackError};

/// Every failure a proxy request can end with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPath(String),

    #[error("{0}")]
    EndpointNotFound(String),

    #[error("{0}")]
    ActionNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error("{0}")]
    Internal(String),
}

/// Failure envelope: `{ "error": <classification>, "message": <detail> }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::EndpointNotFound(_) | Self::ActionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Engine(_) | Self::Stack(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "InvalidPath",
            Self::EndpointNotFound(_) => "EndpointNotFound",
            Self::ActionNotFound(_) => "ActionNotFound",
            Self::Engine(EngineError::Socket { .. }) => "SocketError",
            Self::Engine(EngineError::ResponseParse(_)) => "ResponseParseError",
            Self::Engine(EngineError::Api { .. }) => "EngineError",
            Self::Stack(StackError::NotFound(_)) => "StackNotFound",
            Self::Stack(StackError::Execution { .. }) => "ComposeExecutionError",
            Self::Stack(StackError::Inventory { .. }) | Self::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };

        if status.is_server_error() {
            let engine_status = match &self {
                Self::Engine(EngineError::Api { status, .. }) => Some(*status),
                _ => None,
            };
            error!(kind = body.error, ?engine_status, message = %body.message, "proxy request failed");
        } else {
            warn!(kind = body.error, message = %body.message, "proxy request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into the `InternalError` envelope
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    ApiError::Internal(detail).into_response()
}
