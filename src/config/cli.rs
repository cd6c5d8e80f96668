//! Command-line interface definition

use super::{CommitOptions, FtpConfig, DEFAULT_COMMIT_PREFIX};
use crate::types::DeployError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// bc-deploy - bump, tag and ship a project
#[derive(Debug, Parser)]
#[command(name = "bc-deploy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root holding package.json and the git checkout
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the manifest version
    Version,

    /// Increment the patch version in package.json
    Bump,

    /// Stage, commit, tag and push
    Commit(CommitArgs),

    /// Bump the patch version, then commit, tag and push
    Release(CommitArgs),

    /// Upload a local directory to an FTP server
    Upload(FtpArgs),

    /// Recursively copy a directory tree
    Copy(TreeArgs),

    /// Recursively move a directory tree
    Move(TreeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Branch to push
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Commit message prefix
    #[arg(short, long, visible_alias = "prefix", default_value = DEFAULT_COMMIT_PREFIX)]
    pub message: String,

    /// Do not create or push a version tag
    #[arg(long)]
    pub skip_tag: bool,

    /// Remote receiving the pushes
    #[arg(long, default_value = "origin")]
    pub remote: String,
}

impl From<CommitArgs> for CommitOptions {
    fn from(args: CommitArgs) -> Self {
        Self {
            branch: args.branch,
            prefix: args.message,
            skip_tag: args.skip_tag,
            remote: args.remote,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FtpArgs {
    /// Local directory to upload
    pub local: PathBuf,

    /// Remote directory receiving the contents
    pub remote: String,

    /// TOML file with connection parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, env = "BC_DEPLOY_FTP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Use active instead of passive data connections
    #[arg(long)]
    pub active: bool,
}

impl TryFrom<&FtpArgs> for FtpConfig {
    type Error = DeployError;

    /// Layer CLI flags over the optional config file, then validate
    fn try_from(args: &FtpArgs) -> Result<Self, Self::Error> {
        let mut config = match &args.config {
            Some(path) => FtpConfig::from_file(path)?,
            None => FtpConfig::default(),
        };

        if let Some(host) = &args.host {
            config.host = host.clone();
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(user) = &args.user {
            config.user = user.clone();
        }
        if let Some(password) = &args.password {
            config.password = password.clone();
        }
        if args.active {
            config.passive = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct TreeArgs {
    /// Source directory
    pub source: PathBuf,

    /// Target directory (created when missing)
    pub target: PathBuf,
}
