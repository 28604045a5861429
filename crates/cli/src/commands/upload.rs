//! upload command - Upload a local file to a bucket
//!
//! Creates the bucket when it does not exist yet.

use std::path::PathBuf;

use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use s3m_core::{ObjectStore, StorageManager};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Upload file to S3 bucket
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Overwrite the object if it already exists in the bucket
    #[arg(short, long)]
    pub force: bool,

    /// S3 bucket name
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub bucket_name: String,

    /// Full path of the file in the bucket
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub bucket_file: String,

    /// Full path of the file on the host
    pub host_file: PathBuf,
}

/// Execute the upload command
pub async fn execute<S: ObjectStore>(
    args: UploadArgs,
    manager: &StorageManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    match manager
        .upload(&args.bucket_name, &args.bucket_file, &args.host_file, args.force)
        .await
    {
        Ok(uploaded) => {
            if uploaded.bucket_created {
                formatter.println(&format!(
                    "Created bucket {}",
                    formatter.style_name(&uploaded.bucket)
                ));
            }
            formatter.success(&format!(
                "File: {} uploaded successfully to {} in bucket {} ({})",
                formatter.style_path(&uploaded.local.display().to_string()),
                formatter.style_path(&uploaded.key),
                formatter.style_name(&uploaded.bucket),
                formatter.style_size(uploaded.size_bytes),
            ));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::Failure
        }
    }
}
