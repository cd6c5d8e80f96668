//! Error types for bc-deploy

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem step performed by the directory synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    CreateDir,
    ReadDir,
    Stat,
    Copy,
    Move,
    RemoveDir,
}

impl FsOperation {
    /// Short label used in logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            FsOperation::CreateDir => "create directory",
            FsOperation::ReadDir => "list directory",
            FsOperation::Stat => "read metadata",
            FsOperation::Copy => "copy",
            FsOperation::Move => "move",
            FsOperation::RemoveDir => "remove directory",
        }
    }
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error types for deployment operations
#[derive(Debug, Error)]
pub enum DeployError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required local path does not exist
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Manifest missing, unreadable or malformed
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Version string is not a `major.minor.patch` triplet
    #[error("Invalid version: {0:?}")]
    InvalidVersion(String),

    /// External command exited unsuccessfully
    #[error("Command `{command}` failed with exit code {}", exit_code_label(.code))]
    ExternalCommand { command: String, code: Option<i32> },

    /// A single move/copy/remove step failed
    #[error("Failed to {operation} {path}: {source}")]
    FilesystemOperation {
        operation: FsOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote transfer session error
    #[error("Transfer failed: {0}")]
    Transfer(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "<signal>".to_string())
}

impl DeployError {
    pub(crate) fn fs(operation: FsOperation, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::FilesystemOperation {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Check if this error reports a missing path
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeployError::NotFound { .. })
    }

    /// Check if this error comes from reading or interpreting the manifest
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DeployError::Parse { .. } | DeployError::InvalidVersion(_)
        )
    }

    /// Check if this error is a failed external command
    pub fn is_external_command_error(&self) -> bool {
        matches!(self, DeployError::ExternalCommand { .. })
    }

    /// Check if this error is a single failed filesystem step
    pub fn is_filesystem_error(&self) -> bool {
        matches!(self, DeployError::FilesystemOperation { .. })
    }
}
