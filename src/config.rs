use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";
const DEFAULT_STACKS_DIR: &str = "/opt/stacks";
const DEFAULT_COMPOSE_COMMAND: &str = "docker compose";

/// Application configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub docker_socket: PathBuf,
    pub stacks_dir: PathBuf,
    pub compose_command: String,
    pub static_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (used by `from_env` and tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("DOCKGE_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            docker_socket: lookup("DOCKER_SOCKET")
                .map(|s| PathBuf::from(s.trim_start_matches("unix://")))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCKER_SOCKET)),
            stacks_dir: lookup("DOCKGE_STACKS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STACKS_DIR)),
            compose_command: lookup("DOCKGE_COMPOSE_COMMAND")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COMPOSE_COMMAND.to_string()),
            static_dir: lookup("DOCKGE_STATIC_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            log_level: lookup("DOCKGE_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Split the compose command into program and leading arguments
    pub fn compose_program(&self) -> (String, Vec<String>) {
        let mut parts = self.compose_command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .unwrap_or_else(|| "docker".to_string());
        (program, parts.collect())
    }
}
