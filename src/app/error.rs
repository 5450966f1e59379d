use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`SelectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid roots, patterns or alias rules. Detected before walking.
    Configuration,
    /// A subtree could not be traversed or a file could not be read.
    Io,
    /// Two source files resolved to the same manifest key.
    KeyCollision,
}

/// Every failure the selection engine can report. All of them are fatal.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Import root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Import root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Alias for '{original}' declared twice: '{first}' and '{second}'")]
    DuplicateAlias {
        original: String,
        first: String,
        second: String,
    },

    #[error("Invalid alias '{original}' -> '{replacement}': {reason}")]
    InvalidAlias {
        original: String,
        replacement: String,
        reason: &'static str,
    },

    #[error("Failed to walk {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Manifest key '{key}' produced by both {} and {}",
        existing.display(),
        incoming.display()
    )]
    KeyCollision {
        key: String,
        existing: PathBuf,
        incoming: PathBuf,
    },
}

impl SelectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RootNotFound(_)
            | Self::RootNotDirectory(_)
            | Self::InvalidPattern { .. }
            | Self::DuplicateAlias { .. }
            | Self::InvalidAlias { .. } => ErrorKind::Configuration,
            Self::Walk { .. } | Self::Read { .. } => ErrorKind::Io,
            Self::KeyCollision { .. } => ErrorKind::KeyCollision,
        }
    }
}

pub type SelectionResult<T> = std::result::Result<T, SelectionError>;
