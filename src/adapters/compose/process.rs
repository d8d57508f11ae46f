use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::CommandOutcome;
use crate::ports::ComposeRunner;

/// Runs the compose tool as a child process
#[derive(Debug, Clone)]
pub struct ProcessComposeRunner {
    program: String,
    base_args: Vec<String>,
}

impl ProcessComposeRunner {
    /// `program` plus leading arguments, e.g. `("docker", ["compose"])`
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }
}

#[async_trait]
impl ComposeRunner for ProcessComposeRunner {
    async fn run(&self, working_dir: &Path, compose_file: &str, args: &[&str]) -> CommandOutcome {
        debug!(
            program = %self.program,
            dir = %working_dir.display(),
            compose_file,
            ?args,
            "spawning compose"
        );

        let result = Command::new(&self.program)
            .args(&self.base_args)
            .arg("-f")
            .arg(compose_file)
            .args(args)
            .current_dir(working_dir)
            .output()
            .await;

        match result {
            Ok(output) => CommandOutcome::new(
                output.status.success(),
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ),
            Err(e) => CommandOutcome::launch_failure(format!(
                "failed to launch {}: {}",
                self.program, e
            )),
        }
    }
}
