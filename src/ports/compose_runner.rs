use std::path::Path;

use async_trait::async_trait;

use crate::domain::CommandOutcome;

/// Port for invoking the compose tool
#[async_trait]
pub trait ComposeRunner: Send + Sync {
    /// Run `compose -f <compose_file> <args...>` inside `working_dir` and wait for it.
    ///
    /// Never fails: a process that cannot be launched is reported as an
    /// unsuccessful outcome carrying the launch error.
    async fn run(&self, working_dir: &Path, compose_file: &str, args: &[&str]) -> CommandOutcome;
}
