//! FTP transfer session backed by `suppaftp`

use super::session::{Connector, TransferSession, UploadStats};
use crate::config::FtpConfig;
use crate::types::DeployError;
use std::fs::{self, File};
use std::path::Path;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Mode};

/// Opens plain FTP sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct FtpConnector;

impl Connector for FtpConnector {
    type Session = FtpSession;

    fn open(&self, config: &FtpConfig) -> Result<FtpSession, DeployError> {
        tracing::info!("Connecting to {} as {}", config.address(), config.user);

        let mut stream =
            FtpStream::connect(config.address()).map_err(|e| transfer_error("connect", e))?;
        stream
            .login(config.user.as_str(), config.password.as_str())
            .map_err(|e| transfer_error("login", e))?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| transfer_error("set binary mode", e))?;
        stream.set_mode(if config.passive {
            Mode::Passive
        } else {
            Mode::Active
        });

        Ok(FtpSession {
            stream: Some(stream),
        })
    }
}

/// Connected FTP control channel
pub struct FtpSession {
    stream: Option<FtpStream>,
}

impl FtpSession {
    fn stream(&mut self) -> Result<&mut FtpStream, DeployError> {
        self.stream
            .as_mut()
            .ok_or_else(|| DeployError::Transfer("session already closed".to_string()))
    }

    /// Change into `name`, creating it first when the server says it is missing
    fn enter_dir(&mut self, name: &str) -> Result<(), DeployError> {
        let stream = self.stream()?;
        if stream.cwd(name).is_ok() {
            return Ok(());
        }
        stream
            .mkdir(name)
            .map_err(|e| transfer_error(&format!("create directory {}", name), e))?;
        stream
            .cwd(name)
            .map_err(|e| transfer_error(&format!("enter directory {}", name), e))
    }

    fn upload_tree(&mut self, local: &Path, stats: &mut UploadStats) -> Result<(), DeployError> {
        let mut entries = fs::read_dir(local)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let file_name = entry.file_name();
            let name = file_name.to_str().ok_or_else(|| {
                DeployError::Transfer(format!("non UTF-8 file name: {}", path.display()))
            })?;

            if fs::metadata(&path)?.is_dir() {
                self.enter_dir(name)?;
                self.upload_tree(&path, stats)?;
                self.stream()?
                    .cdup()
                    .map_err(|e| transfer_error("leave directory", e))?;
                stats.directories += 1;
            } else {
                tracing::debug!("Uploading {}", path.display());
                let mut file = File::open(&path)?;
                let bytes = self
                    .stream()?
                    .put_file(name, &mut file)
                    .map_err(|e| transfer_error(&format!("upload {}", path.display()), e))?;
                stats.files += 1;
                stats.bytes += bytes;
            }
        }
        Ok(())
    }
}

impl TransferSession for FtpSession {
    fn ensure_dir(&mut self, remote: &str) -> Result<(), DeployError> {
        if remote.starts_with('/') {
            self.stream()?
                .cwd("/")
                .map_err(|e| transfer_error("enter root directory", e))?;
        }
        for component in remote.split('/').filter(|c| !c.is_empty()) {
            self.enter_dir(component)?;
        }
        Ok(())
    }

    fn upload_dir(&mut self, local: &Path) -> Result<UploadStats, DeployError> {
        let mut stats = UploadStats::default();
        self.upload_tree(local, &mut stats)?;
        Ok(stats)
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.quit() {
                tracing::debug!("FTP quit failed: {}", e);
            }
        }
    }
}

fn transfer_error(context: &str, error: FtpError) -> DeployError {
    DeployError::Transfer(format!("{}: {}", context, error))
}
