//! delete-all-files command - Empty a bucket
//!
//! Deletes objects one by one. A key that cannot be deleted is reported but
//! does not fail the command.

use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use s3m_core::{ObjectStore, StorageManager, SweepReport};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete all files from S3 bucket
#[derive(Args, Debug)]
pub struct DeleteAllFilesArgs {
    /// S3 bucket name
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub bucket_name: String,
}

/// Execute the delete-all-files command
pub async fn execute<S: ObjectStore>(
    args: DeleteAllFilesArgs,
    manager: &StorageManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    match manager.delete_all_objects(&args.bucket_name).await {
        Ok(report) => {
            print_sweep(&args.bucket_name, &report, formatter);
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::Failure
        }
    }
}

/// Print one line per key, then a warning if any key survived
pub(crate) fn print_sweep(bucket: &str, report: &SweepReport, formatter: &Formatter) {
    for key in &report.deleted {
        formatter.success(&format!(
            "File: {} deleted successfully",
            formatter.style_path(key)
        ));
    }
    for (_, error) in &report.failed {
        formatter.error(&error.to_string());
    }

    if !report.is_clean() {
        formatter.warning(&format!(
            "{} of {} file(s) in bucket {} could not be deleted",
            report.failure_count(),
            report.failure_count() + report.deleted.len(),
            formatter.style_name(bucket)
        ));
    }
}
