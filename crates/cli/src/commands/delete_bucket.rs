//! delete-bucket command - Delete a bucket
//!
//! Refuses to delete a non-empty bucket unless forced.

use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use s3m_core::{Error, ObjectStore, StorageManager};

use super::delete_all_files::print_sweep;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete S3 bucket
#[derive(Args, Debug)]
pub struct DeleteBucketArgs {
    /// Delete every file in the bucket first if it is not empty
    #[arg(short, long)]
    pub force: bool,

    /// S3 bucket name
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub bucket_name: String,
}

/// Execute the delete-bucket command
pub async fn execute<S: ObjectStore>(
    args: DeleteBucketArgs,
    manager: &StorageManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    match manager.delete_bucket(&args.bucket_name, args.force).await {
        Ok(deleted) => {
            if let Some(report) = &deleted.sweep {
                print_sweep(&deleted.bucket, report, formatter);
            }
            formatter.success(&format!(
                "Bucket: {} deleted successfully",
                formatter.style_name(&deleted.bucket)
            ));
            ExitCode::Success
        }
        Err(e) => {
            match &e {
                Error::BucketNotEmpty {
                    bucket,
                    sweep: Some(report),
                } => {
                    print_sweep(bucket, report, formatter);
                    formatter.error(&e.to_string());
                }
                Error::BucketNotEmpty { sweep: None, .. } if !args.force => {
                    formatter.error(&format!("{e} (use -f to delete it with its contents)"));
                }
                _ => formatter.error(&e.to_string()),
            }
            ExitCode::Failure
        }
    }
}
