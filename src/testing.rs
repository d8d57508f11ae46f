//! In-memory fakes for the engine and compose ports

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hyper::Method;
use serde_json::Value;

use crate::domain::CommandOutcome;
use crate::error::EngineError;
use crate::ports::{ComposeRunner, EngineApi};

/// Canned engine answer for one path
#[derive(Debug, Clone)]
pub enum FakeReply {
    Json(Value),
    Empty,
    Status(u16, String),
    SocketDown,
    Garbage,
}

/// Engine fake keyed by engine-relative path (query included)
#[derive(Default)]
pub struct FakeEngine {
    replies: HashMap<String, FakeReply>,
    requests: Mutex<Vec<(Method, String, Option<Vec<u8>>)>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, path: &str, reply: FakeReply) -> Self {
        self.replies.insert(path.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<(Method, String, Option<Vec<u8>>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EngineApi for FakeEngine {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Option<Value>, EngineError> {
        self.requests
            .lock()
            .unwrap()
            .push((method, path.to_string(), body));

        match self.replies.get(path) {
            Some(FakeReply::Json(value)) => Ok(Some(value.clone())),
            Some(FakeReply::Empty) => Ok(None),
            Some(FakeReply::Status(status, message)) => Err(EngineError::Api {
                status: *status,
                message: message.clone(),
            }),
            Some(FakeReply::SocketDown) => Err(EngineError::socket(
                Path::new("/var/run/docker.sock"),
                "connection refused",
            )),
            Some(FakeReply::Garbage) => Err(serde_json::from_str::<Value>("<html>").unwrap_err().into()),
            None => Err(EngineError::Api {
                status: 404,
                message: format!("page not found: {path}"),
            }),
        }
    }
}

/// One recorded compose invocation
#[derive(Debug, Clone)]
pub struct RunnerCall {
    pub working_dir: PathBuf,
    pub compose_file: String,
    pub args: Vec<String>,
}

/// Compose fake returning a fixed outcome, tracking overlap between calls
pub struct FakeRunner {
    outcome: CommandOutcome,
    delay: Duration,
    calls: Mutex<Vec<RunnerCall>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeRunner {
    pub fn with_outcome(outcome: CommandOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_outcome(CommandOutcome::new(true, String::new(), String::new()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComposeRunner for FakeRunner {
    async fn run(&self, working_dir: &Path, compose_file: &str, args: &[&str]) -> CommandOutcome {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        self.calls.lock().unwrap().push(RunnerCall {
            working_dir: working_dir.to_path_buf(),
            compose_file: compose_file.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
