//! Remote publisher
//!
//! Uploads a local directory into a remote directory over one transfer
//! session. The session is opened per call, never shared, and closed on
//! every exit path.

pub mod ftp;
pub mod session;

pub use ftp::{FtpConnector, FtpSession};
pub use session::{Connector, SessionGuard, TransferSession, UploadStats};

use crate::config::FtpConfig;
use crate::types::DeployError;
use std::path::Path;

/// Upload the contents of `local` into `remote` using `connector`
///
/// Order of operations: open session, check that `local` exists, ensure
/// `remote` exists, upload, close. The session is closed before the result
/// is logged and returned, on success and on failure alike.
///
/// # Errors
/// * [`DeployError::NotFound`] if `local` does not exist (no remote
///   directory is created and nothing is uploaded)
/// * [`DeployError::Transfer`] for session failures
pub fn publish_dir<C: Connector>(
    connector: &C,
    config: &FtpConfig,
    local: &Path,
    remote: &str,
) -> Result<UploadStats, DeployError> {
    let result = (|| -> Result<UploadStats, DeployError> {
        let mut guard = SessionGuard::new(connector.open(config)?);

        if !local.exists() {
            return Err(DeployError::NotFound {
                path: local.to_path_buf(),
            });
        }

        guard.session().ensure_dir(remote)?;
        let stats = guard.session().upload_dir(local)?;
        Ok(stats)
    })();

    match &result {
        Ok(stats) => tracing::info!(
            files = stats.files,
            bytes = stats.bytes,
            "Upload completed successfully"
        ),
        Err(e) => tracing::error!("Upload failed: {}", e),
    }
    result
}

/// Upload `local` into `remote` on the FTP server described by `config`
///
/// The blocking FTP session runs on tokio's blocking pool; the returned
/// future resolves when the session has been closed.
pub async fn upload_to_ftp(
    config: &FtpConfig,
    local: &Path,
    remote: &str,
) -> Result<UploadStats, DeployError> {
    config.validate()?;

    let config = config.clone();
    let local = local.to_path_buf();
    let remote = remote.to_string();

    tokio::task::spawn_blocking(move || publish_dir(&FtpConnector, &config, &local, &remote))
        .await
        .map_err(map_join_error)?
}

fn map_join_error(error: tokio::task::JoinError) -> DeployError {
    DeployError::Transfer(format!("upload task failed: {}", error))
}
