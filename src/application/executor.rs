use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, error, info, warn};

use super::locks::StackLocks;
use crate::domain::{CommandOutcome, StackAction, COMPOSE_FILE_NAMES};
use crate::error::StackError;
use crate::ports::ComposeRunner;

/// Applies lifecycle actions to stacks through the compose tool
pub struct StackExecutor {
    stacks_root: PathBuf,
    runner: Arc<dyn ComposeRunner>,
    locks: StackLocks,
}

impl StackExecutor {
    pub fn new(stacks_root: impl Into<PathBuf>, runner: Arc<dyn ComposeRunner>) -> Self {
        Self {
            stacks_root: stacks_root.into(),
            runner,
            locks: StackLocks::new(),
        }
    }

    /// Run `action` against stack `name`, holding that stack's lock for the whole invocation
    pub async fn apply(&self, name: &str, action: StackAction) -> Result<CommandOutcome, StackError> {
        let dir = self.stack_dir(name).await?;
        let _guard = self.locks.acquire(name).await;

        let compose_file = resolve_compose_file(&dir).await;
        let args = action.compose_args();
        info!(
            stack = name,
            compose_file,
            command = %args.join(" "),
            "running compose"
        );

        let outcome = self.runner.run(&dir, compose_file, args).await;

        if !outcome.succeeded {
            error!(stack = name, stderr = %outcome.standard_error.trim(), "compose command failed");
            return Err(StackError::Execution {
                stack: name.to_string(),
                stderr: outcome.standard_error,
            });
        }

        debug!(stack = name, stdout = %outcome.standard_output.trim(), "compose finished");

        if outcome.has_warnings() {
            warn!(stack = name, stderr = %outcome.standard_error.trim(), "compose reported warnings");
        }

        Ok(outcome)
    }

    async fn stack_dir(&self, name: &str) -> Result<PathBuf, StackError> {
        let not_found = || StackError::NotFound(name.to_string());

        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(not_found());
        }

        let dir = self.stacks_root.join(name);
        match fs::metadata(&dir).await {
            Ok(metadata) if metadata.is_dir() => Ok(dir),
            _ => Err(not_found()),
        }
    }
}

/// Prefer `compose.yaml`; use `docker-compose.yml` only when it alone exists
pub async fn resolve_compose_file(dir: &Path) -> &'static str {
    let [preferred, fallback] = COMPOSE_FILE_NAMES;

    if !exists(&dir.join(preferred)).await && exists(&dir.join(fallback)).await {
        fallback
    } else {
        preferred
    }
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}
