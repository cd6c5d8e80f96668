//! Core type definitions for bc-deploy

mod error;
mod version;

pub use error::{DeployError, FsOperation};
pub use version::Version;
