//! Transfer session abstraction

use crate::config::FtpConfig;
use crate::types::DeployError;
use std::path::Path;

/// Counters for one directory upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// A connected, authenticated transfer session
pub trait TransferSession {
    /// Make sure `remote` exists, creating missing components, and make it
    /// the working directory for later uploads
    fn ensure_dir(&mut self, remote: &str) -> Result<(), DeployError>;

    /// Upload the contents of `local` recursively into the working directory
    fn upload_dir(&mut self, local: &Path) -> Result<UploadStats, DeployError>;

    /// Close the session; called exactly once
    fn close(&mut self);
}

/// Opens transfer sessions
pub trait Connector {
    type Session: TransferSession;

    fn open(&self, config: &FtpConfig) -> Result<Self::Session, DeployError>;
}

/// Owns a session for one upload and closes it when dropped
pub struct SessionGuard<S: TransferSession> {
    session: S,
}

impl<S: TransferSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn session(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: TransferSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}
