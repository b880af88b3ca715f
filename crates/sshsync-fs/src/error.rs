//! Error types for sshsync-fs

use std::path::PathBuf;

/// Result type for sshsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sshsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't back up config to {path}: file exists")]
    BackupExists { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Failed to parse settings at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the failed operation was working on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::BackupExists { path }
            | Self::LockFailed { path }
            | Self::ConfigParse { path, .. } => path,
        }
    }
}
