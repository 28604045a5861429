//! download command - Download an object to a local file

use std::path::PathBuf;

use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use s3m_core::{ObjectStore, StorageManager};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Download file from S3 bucket
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Replace an existing local file, keeping a copy at <host_file>.old
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

/// Execute the download command
pub async fn execute<S: ObjectStore>(
    args: DownloadArgs,
    manager: &StorageManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    match manager
        .download(&args.bucket_name, &args.bucket_file, &args.host_file, args.force)
        .await
    {
        Ok(downloaded) => {
            if let Some(backup) = &downloaded.backup {
                formatter.warning(&format!(
                    "{} already existed, previous version moved to {}",
                    downloaded.local.display(),
                    backup.display()
                ));
            }
            formatter.success(&format!(
                "File: {} downloaded successfully to {} ({})",
                formatter.style_path(&downloaded.key),
                formatter.style_path(&downloaded.local.display().to_string()),
                formatter.style_size(downloaded.size_bytes),
            ));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::Failure
        }
    }
}
