//! Release committer
//!
//! Runs a fixed sequence of git commands in the project root:
//!
//! 1. `git add .`
//! 2. `git commit -m "<prefix>: build on <timestamp>"`
//! 3. unless skipped: `git tag -a v<version> -m "Release v<version>"` and
//!    `git push <remote> v<version>`
//! 4. `git push <remote> <branch>`
//!
//! Each command waits for the previous one. Nothing is rolled back when a
//! later step fails, so the repository can be left committed but untagged or
//! tagged but unpushed; [`ReleaseError::step`] says how far it got.

pub mod git;

pub use git::{CommandRunner, GitCli};

use crate::config::CommitOptions;
use crate::manifest::current_version;
use crate::types::DeployError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Stage of the release sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
    Stage,
    Commit,
    Tag,
    Push,
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReleaseStep::Stage => "stage",
            ReleaseStep::Commit => "commit",
            ReleaseStep::Tag => "tag",
            ReleaseStep::Push => "push",
        })
    }
}

/// Failure of one release step; earlier steps have already taken effect
#[derive(Debug, Error)]
#[error("Git {step} step failed: {source}")]
pub struct ReleaseError {
    pub step: ReleaseStep,
    #[source]
    pub source: DeployError,
}

/// What a successful release did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub commit_message: String,
    /// `None` when tagging was skipped
    pub tag: Option<String>,
    pub branch: String,
}

/// Optional side-effect hook invoked once when a release fails.
pub type ReleaseHook<'a> = dyn Fn(&ReleaseError) + 'a;

/// Commit message for a build at `timestamp`
pub fn commit_message(prefix: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{}: build on {}",
        prefix,
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Stage, commit, optionally tag, and push
///
/// On failure `on_error` is called once with the error (or, without a hook,
/// the error is logged) and the error is returned so the caller can decide
/// whether a partial release is fatal.
pub fn git_commit(
    project_root: &Path,
    options: &CommitOptions,
    runner: &dyn CommandRunner,
    on_error: Option<&ReleaseHook<'_>>,
) -> Result<ReleaseOutcome, ReleaseError> {
    let result = run_sequence(project_root, options, runner, Utc::now());

    if let Err(err) = &result {
        match on_error {
            Some(hook) => hook(err),
            None => tracing::error!("Git operation failed: {}", err),
        }
    }
    result
}

fn run_sequence(
    project_root: &Path,
    options: &CommitOptions,
    runner: &dyn CommandRunner,
    now: DateTime<Utc>,
) -> Result<ReleaseOutcome, ReleaseError> {
    let git = |step: ReleaseStep, args: &[&str]| {
        runner
            .run("git", args, project_root)
            .map_err(|source| ReleaseError { step, source })
    };

    git(ReleaseStep::Stage, &["add", "."])?;

    let message = commit_message(&options.prefix, now);
    git(ReleaseStep::Commit, &["commit", "-m", message.as_str()])?;

    let tag = if options.skip_tag {
        None
    } else {
        let version = current_version(project_root).map_err(|source| ReleaseError {
            step: ReleaseStep::Tag,
            source,
        })?;
        let tag = format!("v{}", version);
        let tag_message = format!("Release {}", tag);

        git(ReleaseStep::Tag, &["tag", "-a", tag.as_str(), "-m", tag_message.as_str()])?;
        git(ReleaseStep::Push, &["push", options.remote.as_str(), tag.as_str()])?;
        tracing::info!("Created tag {}", tag);
        Some(tag)
    };

    git(ReleaseStep::Push, &["push", options.remote.as_str(), options.branch.as_str()])?;
    tracing::info!("Pushed to {}", options.branch);

    Ok(ReleaseOutcome {
        commit_message: message,
        tag,
        branch: options.branch.clone(),
    })
}
