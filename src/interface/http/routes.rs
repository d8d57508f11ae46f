use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::application::DockerProxy;

use super::error::panic_response;
use super::handlers::{empty_path_handler, health_handler, proxy_handler, AppState};

pub fn create_router(proxy: Arc<DockerProxy>, static_dir: Option<&Path>) -> Router {
    let state = AppState { proxy };

    let router = Router::new()
        // API routes
        .route("/api/health", get(health_handler))
        .route("/api/docker", any(empty_path_handler))
        .route("/api/docker/", any(empty_path_handler))
        .route("/api/docker/{*path}", any(proxy_handler));

    // Dashboard assets
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
