//! Semantic version triplet stored in the manifest

use super::DeployError;
use std::fmt;
use std::str::FromStr;

/// `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Next patch release; major and minor are left untouched
    ///
    /// # Errors
    /// [`DeployError::InvalidVersion`] when the patch number is already `u64::MAX`
    pub fn bump_patch(self) -> Result<Self, DeployError> {
        let patch = self
            .patch
            .checked_add(1)
            .ok_or_else(|| DeployError::InvalidVersion(self.to_string()))?;
        Ok(Self { patch, ..self })
    }

    /// Tag name used for this release (`v1.2.3`)
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }
}

impl FromStr for Version {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeployError::InvalidVersion(s.to_string());

        let mut parts = s.split('.');
        let mut next = || -> Result<u64, DeployError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
