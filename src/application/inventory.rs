use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::{StackDescriptor, COMPOSE_FILE_NAMES};
use crate::error::StackError;

/// Lists the stacks root; every subdirectory is one stack
#[derive(Debug, Clone)]
pub struct StackScanner {
    root: PathBuf,
}

impl StackScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the stacks root. A missing root yields an empty list.
    pub async fn scan(&self) -> Result<Vec<StackDescriptor>, StackError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "stacks directory does not exist");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StackError::Inventory {
                    path: self.root.display().to_string(),
                    source,
                })
            }
        };

        let mut stacks = Vec::new();

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "stopped listing stacks directory early");
                    break;
                }
            };

            let path = entry.path();
            // Follows symlinks so linked stack directories are included
            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !metadata.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let compose_file_text = read_compose_file(&name, &path).await;
            let last_updated = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            stacks.push(StackDescriptor {
                name,
                path: path.display().to_string(),
                compose_file_text,
                last_updated,
            });
        }

        stacks.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = stacks.len(), "scanned stacks");

        Ok(stacks)
    }
}

async fn read_compose_file(stack: &str, dir: &Path) -> Option<String> {
    for file_name in COMPOSE_FILE_NAMES {
        match fs::read_to_string(dir.join(file_name)).await {
            Ok(text) => return Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(stack, file = file_name, error = %e, "cannot read compose file");
            }
        }
    }
    None
}
