//! External command execution

use crate::types::DeployError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs external programs on behalf of the release committer
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd` and wait for it to exit
    ///
    /// A non-zero exit must be reported as [`DeployError::ExternalCommand`].
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<(), DeployError>;
}

/// Runs commands as child processes sharing the caller's stdin/stdout/stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl CommandRunner for GitCli {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<(), DeployError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::debug!("Running: {:?}", cmd);

        let status = cmd.status()?;
        if !status.success() {
            return Err(DeployError::ExternalCommand {
                command: render_command(program, args),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// Human-readable command line for logs and errors
pub fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(|part| {
            if part.contains(char::is_whitespace) {
                format!("{:?}", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
