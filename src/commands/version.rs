//! `version` and `bump` commands

use crate::manifest::{current_version, update_version};
use std::path::Path;

/// Print the manifest version
pub fn run_version(root: &Path) -> anyhow::Result<()> {
    println!("{}", current_version(root)?);
    Ok(())
}

/// Increment the patch version and print the result
pub fn run_bump(root: &Path) -> anyhow::Result<()> {
    println!("{}", update_version(root)?);
    Ok(())
}
