//! delete-file command - Delete a single object

use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use s3m_core::{ObjectStore, StorageManager};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete file from S3 bucket
#[derive(Args, Debug)]
pub struct DeleteFileArgs {
    /// S3 bucket name
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub bucket_name: String,

    /// Full path of the file in the bucket
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub bucket_file: String,
}

/// Execute the delete-file command
pub async fn execute<S: ObjectStore>(
    args: DeleteFileArgs,
    manager: &StorageManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    match manager
        .delete_object(&args.bucket_name, &args.bucket_file)
        .await
    {
        Ok(()) => {
            formatter.success(&format!(
                "File: {} deleted successfully",
                formatter.style_path(&args.bucket_file)
            ));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::Failure
        }
    }
}
