//! # bc-deploy - deployment helpers
//!
//! Small building blocks for shipping a project:
//!
//! - [`manifest`] reads and bumps the `version` in `package.json`
//! - [`release`] stages, commits, tags and pushes with git
//! - [`publish`] uploads a directory over FTP
//! - [`sync`] copies or moves directory trees, skipping entries that fail
//!
//! Every entry point takes the project root or paths explicitly; nothing
//! depends on the process working directory.

// Module declarations
pub mod commands;
pub mod config;
pub mod manifest;
pub mod publish;
pub mod release;
pub mod sync;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{CommitOptions, FtpConfig};
pub use manifest::{current_version, update_version};
pub use publish::upload_to_ftp;
pub use release::{git_commit, ReleaseError, ReleaseOutcome, ReleaseStep};
pub use sync::{copy_directory, move_files, SyncReport};
pub use types::{DeployError, Version};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
