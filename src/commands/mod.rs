//! CLI subcommands

pub mod release;
pub mod tree;
pub mod upload;
pub mod version;

use crate::config::{Cli, Command};

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let root = cli.root;
    match cli.command {
        Command::Version => version::run_version(&root),
        Command::Bump => version::run_bump(&root),
        Command::Commit(args) => release::run(&root, args, false),
        Command::Release(args) => release::run(&root, args, true),
        Command::Upload(args) => upload::run(&args),
        Command::Copy(args) => tree::run(&args, tree::TreeMode::Copy),
        Command::Move(args) => tree::run(&args, tree::TreeMode::Move),
    }
}
