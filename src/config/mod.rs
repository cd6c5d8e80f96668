//! Configuration management

mod cli;

pub use cli::{Cli, Command, CommitArgs, FtpArgs, TreeArgs};

use crate::types::DeployError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default commit message prefix
pub const DEFAULT_COMMIT_PREFIX: &str = "other: Auto-commit";

/// Options for the release committer, built fresh for every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    /// Branch pushed after committing
    pub branch: String,

    /// Text placed before `: build on <timestamp>`
    pub prefix: String,

    /// Skip creating and pushing the `v<version>` tag
    pub skip_tag: bool,

    /// Remote that receives tag and branch pushes
    pub remote: String,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            prefix: DEFAULT_COMMIT_PREFIX.to_string(),
            skip_tag: false,
            remote: "origin".to_string(),
        }
    }
}

/// Connection parameters for the remote publisher
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Passive data connections (the default for most servers behind NAT)
    pub passive: bool,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 21,
            user: "anonymous".to_string(),
            password: String::new(),
            passive: true,
        }
    }
}

impl FtpConfig {
    /// Load connection parameters from a TOML file
    ///
    /// Missing keys fall back to [`FtpConfig::default`].
    pub fn from_file(path: &Path) -> Result<Self, DeployError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DeployError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| DeployError::Config(format!("Invalid {}: {}", path.display(), e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.host.trim().is_empty() {
            return Err(DeployError::Config("FTP host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(DeployError::Config("FTP port must not be 0".to_string()));
        }
        Ok(())
    }

    /// `host:port` address for the control connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_options_defaults() {
        let options = CommitOptions::default();
        assert_eq!(options.branch, "main");
        assert_eq!(options.prefix, DEFAULT_COMMIT_PREFIX);
        assert!(!options.skip_tag);
        assert_eq!(options.remote, "origin");
    }

    #[test]
    fn test_ftp_config_from_file_with_defaults() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("ftp.toml");
        fs::write(&path, "host = \"ftp.example.com\"\nuser = \"deploy\"\n").expect("write config");

        let config = FtpConfig::from_file(&path).expect("load config");
        assert_eq!(config.host, "ftp.example.com");
        assert_eq!(config.user, "deploy");
        assert_eq!(config.port, 21);
        assert!(config.passive);
        assert_eq!(config.address(), "ftp.example.com:21");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ftp_config_rejects_unknown_keys() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("ftp.toml");
        fs::write(&path, "host = \"h\"\nsecure = true\n").expect("write config");

        let err = FtpConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_ftp_config_missing_file() {
        let dir = TempDir::new().expect("create temp dir");
        let err = FtpConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_ftp_config_validate_requires_host() {
        let err = FtpConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("host"));
    }
}
