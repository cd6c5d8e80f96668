//! `upload` command

use crate::config::{FtpArgs, FtpConfig};
use crate::publish::{upload_to_ftp, UploadStats};
use crate::ui::ProgressReporter;
use indicatif::HumanBytes;
use tokio::runtime::Builder;

/// Upload a local directory to the configured FTP server
pub fn run(args: &FtpArgs) -> anyhow::Result<()> {
    let config = FtpConfig::try_from(args)?;
    let runtime = Builder::new_current_thread().enable_all().build()?;

    let mut progress = ProgressReporter::for_stderr();
    progress.start(&format!(
        "Uploading {} to {}:{}",
        args.local.display(),
        config.host,
        args.remote
    ));

    match runtime.block_on(upload_to_ftp(&config, &args.local, &args.remote)) {
        Ok(stats) => {
            progress.finish(stats.files, 0, stats.bytes);
            println!("{}", format_summary(&stats));
            Ok(())
        }
        Err(e) => {
            progress.abandon(&e.to_string());
            Err(e.into())
        }
    }
}

fn format_summary(stats: &UploadStats) -> String {
    format!(
        "Uploaded {} file(s) in {} director(ies), {}",
        stats.files,
        stats.directories,
        HumanBytes(stats.bytes)
    )
}
