//! Command implementations
//!
//! Every storage command loads the credential profile, builds one S3 client
//! and runs a single wrapped operation against it.

mod completions;
mod delete_all_files;
mod delete_bucket;
mod delete_file;
mod download;
mod upload;

use clap::Subcommand;
use s3m_core::{CredentialProfile, ObjectLookup, StorageManager};
use s3m_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download file from S3 bucket
    Download(download::DownloadArgs),

    /// Upload file to S3 bucket
    Upload(upload::UploadArgs),

    /// Delete file from S3 bucket
    #[command(name = "delete-file")]
    DeleteFile(delete_file::DeleteFileArgs),

    /// Delete all files from S3 bucket
    #[command(name = "delete-all-files")]
    DeleteAllFiles(delete_all_files::DeleteAllFilesArgs),

    /// Delete S3 bucket
    #[command(name = "delete-bucket")]
    DeleteBucket(delete_bucket::DeleteBucketArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Options shared by every storage command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub credential: String,
    pub profile: String,
    pub lookup: ObjectLookup,
    pub output: OutputConfig,
}

/// Execute a subcommand
pub async fn execute(command: Commands, options: GlobalOptions) -> ExitCode {
    let formatter = Formatter::new(options.output);

    let command = match command {
        Commands::Completions(args) => return completions::execute(args),
        other => other,
    };

    let manager = match setup_manager(&options, &formatter).await {
        Ok(m) => m,
        Err(code) => return code,
    };

    match command {
        Commands::Download(args) => download::execute(args, &manager, &formatter).await,
        Commands::Upload(args) => upload::execute(args, &manager, &formatter).await,
        Commands::DeleteFile(args) => delete_file::execute(args, &manager, &formatter).await,
        Commands::DeleteAllFiles(args) => {
            delete_all_files::execute(args, &manager, &formatter).await
        }
        Commands::DeleteBucket(args) => delete_bucket::execute(args, &manager, &formatter).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve credentials and build the storage manager for this invocation
async fn setup_manager(
    options: &GlobalOptions,
    formatter: &Formatter,
) -> Result<StorageManager<S3Client>, ExitCode> {
    let profile = match CredentialProfile::load(&options.credential, &options.profile) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return Err(ExitCode::Failure);
        }
    };

    let client = S3Client::new(&profile).await;
    Ok(StorageManager::new(client).with_lookup(options.lookup))
}
