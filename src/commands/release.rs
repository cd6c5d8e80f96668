//! `commit` and `release` commands

use crate::config::{CommitArgs, CommitOptions};
use crate::manifest::update_version;
use crate::release::{git_commit, GitCli, ReleaseError, ReleaseOutcome};
use console::style;
use std::path::Path;

/// Commit, tag and push; with `bump` the patch version is incremented first
pub fn run(root: &Path, args: CommitArgs, bump: bool) -> anyhow::Result<()> {
    if bump {
        let version = update_version(root)?;
        println!("Version bumped to {}", version);
    }

    let options = CommitOptions::from(args);
    let report = |err: &ReleaseError| eprintln!("{}", format_failure(err));
    let outcome = git_commit(root, &options, &GitCli, Some(&report))?;

    println!("{}", format_outcome(&outcome));
    Ok(())
}

fn format_outcome(outcome: &ReleaseOutcome) -> String {
    let mut lines = vec![format!("Committed: {}", outcome.commit_message)];
    if let Some(tag) = &outcome.tag {
        lines.push(format!("Tagged:    {}", tag));
    }
    lines.push(format!("Pushed:    {}", outcome.branch));
    lines.join("\n")
}

fn format_failure(err: &ReleaseError) -> String {
    format!(
        "{} stopped at the {} step. Earlier steps were not rolled back; check `git status` and `git log` before retrying.",
        style("Release").red().bold(),
        err.step
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::ReleaseStep;
    use crate::types::DeployError;

    #[test]
    fn test_format_outcome_with_tag() {
        let outcome = ReleaseOutcome {
            commit_message: "other: Auto-commit: build on 2024-01-01T00:00:00.000Z".to_string(),
            tag: Some("v1.0.1".to_string()),
            branch: "main".to_string(),
        };
        let text = format_outcome(&outcome);
        assert!(text.contains("Committed: other: Auto-commit"));
        assert!(text.contains("Tagged:    v1.0.1"));
        assert!(text.contains("Pushed:    main"));
    }

    #[test]
    fn test_format_outcome_without_tag() {
        let outcome = ReleaseOutcome {
            commit_message: "m".to_string(),
            tag: None,
            branch: "release".to_string(),
        };
        assert!(!format_outcome(&outcome).contains("Tagged"));
    }

    #[test]
    fn test_format_failure_mentions_step() {
        let err = ReleaseError {
            step: ReleaseStep::Tag,
            source: DeployError::InvalidVersion("x".to_string()),
        };
        let text = format_failure(&err);
        assert!(text.contains("the tag step"));
        assert!(text.contains("not rolled back"));
    }
}
