use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{Method, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::dispatch::{split_segments, Route};
use super::error::ApiError;
use crate::application::DockerProxy;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<DockerProxy>,
}

/// Response for container and stack actions
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Handler for GET /api/health
pub async fn health_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "dockge-proxy"
        })),
    )
}

/// Handler for /api/docker and /api/docker/ with no route tail
pub async fn empty_path_handler() -> ApiError {
    ApiError::InvalidPath("Path must not be empty".to_string())
}

/// Handler for /api/docker/{*path}
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let Path(raw) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let Query(query) = query.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let segments = split_segments(&raw)?;
    let route = Route::resolve(&method, &segments)?;
    let proxy = &state.proxy;

    let value = match route {
        Route::Containers => {
            let all = query
                .get("all")
                .is_some_and(|v| v == "true" || v == "1");
            proxy.list_containers(all).await?
        }
        Route::Images => proxy.list_images().await?,
        Route::Volumes => proxy.list_volumes().await?,
        Route::Networks => proxy.list_networks().await?,
        Route::Info => proxy.system_info().await?,
        Route::Stacks => to_json(&proxy.list_stacks().await?)?,
        Route::ContainerAction { id, action } => {
            let timeout = query.get("t").and_then(|t| t.parse().ok());
            let body = (!body.is_empty()).then(|| body.to_vec());
            let message = proxy.container_action(&id, action, timeout, body).await?;
            to_json(&ActionResponse::ok(message))?
        }
        Route::StackAction { name, action } => {
            let message = proxy.stack_action(&name, action).await?;
            to_json(&ActionResponse::ok(message))?
        }
    };

    Ok(Json(value))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}
