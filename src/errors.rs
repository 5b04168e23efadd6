//! Error taxonomy for repository operations
//!
//! Commands return `anyhow::Result`; the variants below are raised through it
//! so callers can `downcast_ref::<RepositoryError>()` to decide how to react.
//! Merge conflicts are not errors: they are part of a successful
//! [`MergeOutcome`](crate::artifacts::merge::outcome::MergeOutcome).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A ref, branch, object or commit digest does not resolve
    #[error("{0}")]
    NotFound(String),

    /// An abbreviated digest matches more than one object
    #[error("ambiguous reference '{prefix}': candidates are {}", candidates.join(", "))]
    AmbiguousReference {
        prefix: String,
        candidates: Vec<String>,
    },

    /// The repository is not in a state that allows the operation
    #[error("{0}")]
    InvalidState(String),

    /// A working tree file named by the user does not exist
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("i/o error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Build a closure that wraps an `io::Error` raised while touching `path`
    pub fn file_system(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::FileSystem { path, source }
    }
}
