//! `copy` and `move` commands

use crate::config::TreeArgs;
use crate::sync::{copy_directory, move_files, SyncCallback, SyncEvent, SyncReport};
use crate::ui::ProgressReporter;
use anyhow::bail;
use std::sync::{Arc, Mutex};

/// Which tree operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMode {
    Copy,
    Move,
}

/// Run a best-effort copy or move and report skipped entries
///
/// Exits with an error when any entry was skipped, after printing them.
pub fn run(args: &TreeArgs, mode: TreeMode) -> anyhow::Result<()> {
    let reporter = Arc::new(Mutex::new(ProgressReporter::for_stderr()));
    if let Ok(mut progress) = reporter.lock() {
        let verb = match mode {
            TreeMode::Copy => "Copying",
            TreeMode::Move => "Moving",
        };
        progress.start(&format!(
            "{} {} -> {}",
            verb,
            args.source.display(),
            args.target.display()
        ));
    }

    let on_event = {
        let reporter = Arc::clone(&reporter);
        move |event: &SyncEvent<'_>| {
            let Ok(mut progress) = reporter.lock() else {
                return;
            };
            match event {
                SyncEvent::EntryStart { operation, path } => {
                    progress.set_current_file(operation.label(), path)
                }
                SyncEvent::EntryDone { bytes, .. } => progress.complete_file(*bytes),
                SyncEvent::EntryFailed { failure } => progress.entry_error(
                    failure.operation.label(),
                    &failure.path,
                    &failure.source.to_string(),
                ),
                SyncEvent::Complete { report } => {
                    progress.finish(report.files, report.failures.len(), report.bytes)
                }
            }
        }
    };
    let callback: &SyncCallback = &on_event;

    let result = match mode {
        TreeMode::Copy => copy_directory(&args.source, &args.target, Some(callback)),
        TreeMode::Move => move_files(&args.source, &args.target, Some(callback)),
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Ok(progress) = reporter.lock() {
                progress.abandon(&e.to_string());
            }
            return Err(e.into());
        }
    };

    if !report.is_complete() {
        println!("{}", format_failures(&report));
        bail!("{} entr(ies) could not be processed", report.failures.len());
    }
    Ok(())
}

fn format_failures(report: &SyncReport) -> String {
    format!(
        "Skipped entries ({}):\n{}",
        report.failures.len(),
        report.failure_summary(10)
    )
}
