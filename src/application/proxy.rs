use std::sync::Arc;

use hyper::Method;
use serde_json::Value;
use tracing::info;

use super::{StackExecutor, StackScanner};
use crate::domain::{ContainerAction, ContainerId, StackAction, StackDescriptor};
use crate::error::{EngineError, StackError};
use crate::ports::EngineApi;

/// Main application service behind the proxy routes
pub struct DockerProxy {
    engine: Arc<dyn EngineApi>,
    scanner: StackScanner,
    executor: StackExecutor,
}

impl DockerProxy {
    pub fn new(engine: Arc<dyn EngineApi>, scanner: StackScanner, executor: StackExecutor) -> Self {
        Self {
            engine,
            scanner,
            executor,
        }
    }

    /// Container list; `all` includes stopped containers
    pub async fn list_containers(&self, all: bool) -> Result<Value, EngineError> {
        self.fetch(&format!("/containers/json?all={all}")).await
    }

    pub async fn list_images(&self) -> Result<Value, EngineError> {
        self.fetch("/images/json").await
    }

    /// Volume list, unwrapped from the engine's `{"Volumes": [...]}` envelope
    pub async fn list_volumes(&self) -> Result<Value, EngineError> {
        let response = self.engine.request(Method::GET, "/volumes", None).await?;
        Ok(unwrap_volumes(response))
    }

    pub async fn list_networks(&self) -> Result<Value, EngineError> {
        self.fetch("/networks").await
    }

    pub async fn system_info(&self) -> Result<Value, EngineError> {
        self.fetch("/info").await
    }

    /// Start, stop or restart one container. Returns the success message.
    pub async fn container_action(
        &self,
        id: &ContainerId,
        action: ContainerAction,
        timeout_secs: Option<u32>,
        body: Option<Vec<u8>>,
    ) -> Result<String, EngineError> {
        let mut path = format!("/containers/{}/{}", id, action.as_str());
        if let Some(t) = timeout_secs.filter(|_| action.accepts_timeout()) {
            path.push_str(&format!("?t={t}"));
        }

        self.engine.request(Method::POST, &path, body).await?;
        info!(container = %id, action = action.as_str(), "container action completed");

        Ok(format!("Container {} {}", id, action.past_tense()))
    }

    pub async fn list_stacks(&self) -> Result<Vec<StackDescriptor>, StackError> {
        self.scanner.scan().await
    }

    /// Apply a lifecycle action to a stack. Returns the success message.
    pub async fn stack_action(&self, name: &str, action: StackAction) -> Result<String, StackError> {
        self.executor.apply(name, action).await?;
        Ok(format!("Stack {} {}", name, action.past_tense()))
    }

    async fn fetch(&self, path: &str) -> Result<Value, EngineError> {
        let response = self.engine.request(Method::GET, path, None).await?;
        Ok(response.unwrap_or(Value::Null))
    }
}

fn unwrap_volumes(response: Option<Value>) -> Value {
    match response {
        Some(Value::Object(mut envelope)) => match envelope.remove("Volumes") {
            Some(volumes @ Value::Array(_)) => volumes,
            _ => Value::Array(Vec::new()),
        },
        _ => Value::Array(Vec::new()),
    }
}
