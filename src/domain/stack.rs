use chrono::{DateTime, Utc};
use serde::Serialize;

/// Compose filenames recognised inside a stack directory, in order of preference
pub const COMPOSE_FILE_NAMES: [&str; 2] = ["compose.yaml", "docker-compose.yml"];

/// One subdirectory of the stacks root
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackDescriptor {
    pub name: String,
    pub path: String,
    /// `None` when neither compose filename exists
    pub compose_file_text: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Lifecycle action applied to a compose stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAction {
    Start,
    Stop,
    Restart,
    Pull,
}

impl StackAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "restart" => Some(Self::Restart),
            "pull" => Some(Self::Pull),
            _ => None,
        }
    }

    /// Compose subcommand this action maps to
    pub fn compose_args(&self) -> &'static [&'static str] {
        match self {
            Self::Start => &["up", "-d"],
            Self::Stop => &["down"],
            Self::Restart => &["restart"],
            Self::Pull => &["pull"],
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
            Self::Pull => "pulled",
        }
    }
}

/// Result of one compose invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub succeeded: bool,
    pub standard_output: String,
    pub standard_error: String,
}

impl CommandOutcome {
    pub fn new(succeeded: bool, standard_output: String, standard_error: String) -> Self {
        Self {
            succeeded,
            standard_output,
            standard_error,
        }
    }

    /// The process never ran; the launch error stands in for stderr
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self::new(false, String::new(), message.into())
    }

    /// Compose prints pull/progress notices prefixed with `WARN` on stderr
    pub fn has_warnings(&self) -> bool {
        self.standard_error.contains("WARN")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_action_compose_args() {
        assert_eq!(StackAction::parse("start").map(|a| a.compose_args()), Some(&["up", "-d"][..]));
        assert_eq!(StackAction::Stop.compose_args(), &["down"]);
        assert_eq!(StackAction::Pull.past_tense(), "pulled");
        assert_eq!(StackAction::parse("destroy"), None);
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let descriptor = StackDescriptor {
            name: "db".to_string(),
            path: "/opt/stacks/db".to_string(),
            compose_file_text: None,
            last_updated: Utc::now(),
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert!(value["composeFileText"].is_null());
        assert!(value["lastUpdated"].is_string());
    }
}
