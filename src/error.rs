use thiserror::Error;

/// Failures talking to the Docker engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot reach Docker engine at {socket}: {reason}")]
    Socket { socket: String, reason: String },

    #[error("Docker engine returned invalid JSON: {0}")]
    ResponseParse(#[from] serde_json::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl EngineError {
    pub fn socket(socket: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::Socket {
            socket: socket.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failures scanning or operating on compose stacks
#[derive(Debug, Error)]
pub enum StackError {
    #[error("Stack {0} not found")]
    NotFound(String),

    #[error("Compose command failed for stack {stack}: {stderr}")]
    Execution { stack: String, stderr: String },

    #[error("Cannot list stacks directory {path}: {source}")]
    Inventory {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
