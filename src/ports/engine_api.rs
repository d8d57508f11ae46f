use async_trait::async_trait;
use hyper::Method;
use serde_json::Value;

use crate::error::EngineError;

/// Port for one request/response cycle against the Docker engine
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// Send `method path` (engine-relative, without the version prefix).
    ///
    /// Returns `None` when the engine answered with an empty body.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Option<Value>, EngineError>;
}
