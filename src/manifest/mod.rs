//! Manifest version management
//!
//! Reads and bumps the `version` field of `package.json` in an explicit
//! project root. Other fields and their order are preserved on rewrite.
//! There is no locking: two concurrent bumps may both read the same version
//! and the last write wins.

use crate::sync::write_file_atomic;
use crate::types::{DeployError, Version};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name, resolved against the project root
pub const MANIFEST_FILE: &str = "package.json";

/// Path of the manifest inside `project_root`
pub fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(MANIFEST_FILE)
}

/// Parsed manifest document
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: Value,
    trailing_newline: bool,
}

impl Manifest {
    /// Read and parse the manifest in `project_root`
    ///
    /// A missing or unreadable file is reported as [`DeployError::Parse`],
    /// like malformed JSON.
    pub fn load(project_root: &Path) -> Result<Self, DeployError> {
        let path = manifest_path(project_root);
        let content = fs::read_to_string(&path).map_err(|e| DeployError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|e| DeployError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if !document.is_object() {
            return Err(DeployError::Parse {
                path,
                message: "expected a JSON object".to_string(),
            });
        }

        Ok(Self {
            path,
            document,
            trailing_newline: content.ends_with('\n'),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `version` field, verbatim
    pub fn version(&self) -> Result<&str, DeployError> {
        match self.document.get("version") {
            Some(Value::String(version)) => Ok(version),
            Some(_) => Err(self.parse_error("\"version\" is not a string")),
            None => Err(self.parse_error("missing \"version\" field")),
        }
    }

    pub fn set_version(&mut self, version: &Version) {
        if let Value::Object(map) = &mut self.document {
            map.insert("version".to_string(), Value::String(version.to_string()));
        }
    }

    /// Rewrite the whole file with 2-space indentation
    pub fn save(&self) -> Result<(), DeployError> {
        let mut content = serde_json::to_string_pretty(&self.document).map_err(|e| {
            DeployError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        if self.trailing_newline {
            content.push('\n');
        }
        write_file_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    fn parse_error(&self, message: &str) -> DeployError {
        DeployError::Parse {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

/// Current manifest version, returned verbatim
pub fn current_version(project_root: &Path) -> Result<String, DeployError> {
    Manifest::load(project_root)?.version().map(str::to_string)
}

/// Increment the patch component and write the manifest back
///
/// # Returns
/// The new version string.
///
/// # Errors
/// * [`DeployError::Parse`] if the manifest is missing or malformed
/// * [`DeployError::InvalidVersion`] if the version is not `major.minor.patch`
///   or its patch number cannot be incremented
pub fn update_version(project_root: &Path) -> Result<String, DeployError> {
    let mut manifest = Manifest::load(project_root)?;
    let next = manifest.version()?.parse::<Version>()?.bump_patch()?;

    manifest.set_version(&next);
    manifest.save()?;

    tracing::info!("Version updated to {}", next);
    Ok(next.to_string())
}
