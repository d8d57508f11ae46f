use axum::http::Method;

use super::error::ApiError;
use crate::domain::{ContainerAction, ContainerId, StackAction};

/// Every proxy route, resolved from `(method, segments)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Containers,
    Images,
    Volumes,
    Networks,
    Info,
    Stacks,
    ContainerAction {
        id: ContainerId,
        action: ContainerAction,
    },
    StackAction {
        name: String,
        action: StackAction,
    },
}

impl Route {
    /// Literal routes match before the three-segment action routes.
    /// A bad verb is reported before the method is checked.
    pub fn resolve(method: &Method, segments: &[&str]) -> Result<Self, ApiError> {
        let (expected, route) = match segments {
            ["containers", "json"] => (Method::GET, Self::Containers),
            ["images", "json"] => (Method::GET, Self::Images),
            ["volumes"] => (Method::GET, Self::Volumes),
            ["networks"] => (Method::GET, Self::Networks),
            ["info"] => (Method::GET, Self::Info),
            ["stacks"] => (Method::GET, Self::Stacks),
            ["containers", id, action] => {
                let action = ContainerAction::parse(action)
                    .ok_or_else(|| ApiError::ActionNotFound(format!("Unknown container action: {action}")))?;
                let id = ContainerId::parse(id)
                    .ok_or_else(|| ApiError::InvalidPath(format!("Invalid container id: {id}")))?;
                (Method::POST, Self::ContainerAction { id, action })
            }
            ["stacks", name, action] => {
                let action = StackAction::parse(action)
                    .ok_or_else(|| ApiError::ActionNotFound(format!("Unknown stack action: {action}")))?;
                (
                    Method::POST,
                    Self::StackAction {
                        name: name.to_string(),
                        action,
                    },
                )
            }
            _ => return Err(not_found(method, segments)),
        };

        if *method != expected {
            return Err(not_found(method, segments));
        }

        Ok(route)
    }
}

/// Split the wildcard tail into segments, rejecting empty, `.` and `..` segments.
/// A single trailing slash is tolerated; a leading one is an empty segment.
pub fn split_segments(raw: &str) -> Result<Vec<&str>, ApiError> {
    let trimmed = raw.strip_suffix('/').unwrap_or(raw);
    if trimmed.is_empty() {
        return Err(ApiError::InvalidPath("Path must not be empty".to_string()));
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
        return Err(ApiError::InvalidPath(format!("Malformed path: {raw}")));
    }

    Ok(segments)
}

fn not_found(method: &Method, segments: &[&str]) -> ApiError {
    ApiError::EndpointNotFound(format!("No endpoint for {} {}", method, segments.join("/")))
}
