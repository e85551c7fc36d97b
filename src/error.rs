use crate::hierarchy::CategoryPath;
use std::path::PathBuf;

/// Errors surfaced by the hierarchy store and the target opener boundary.
///
/// Ranking, matching, the column stack and context detection never produce
/// these; they are total over well-formed input.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("a sibling named '{0}' already exists")]
    DuplicateName(String),
    #[error("invalid name '{0}'")]
    InvalidName(String),
    #[error("category '{0}' does not exist")]
    InvalidParent(CategoryPath),
    #[error("'{0}' was not found")]
    NotFound(String),
    #[error("target '{}' is already registered", .0.display())]
    DuplicateTarget(PathBuf),
    #[error("target '{}' no longer exists", .0.display())]
    TargetMissing(PathBuf),
    #[error("failed to persist launcher state: {0}")]
    Persistence(#[source] anyhow::Error),
    #[error("failed to open '{}': {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl LauncherError {
    pub(crate) fn not_found(what: impl std::fmt::Display) -> Self {
        LauncherError::NotFound(what.to_string())
    }

    /// Structural errors the caller can fix by choosing different input.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LauncherError::DuplicateName(_)
                | LauncherError::InvalidName(_)
                | LauncherError::InvalidParent(_)
                | LauncherError::NotFound(_)
                | LauncherError::DuplicateTarget(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
