//! Error types for s3manager
//!
//! Every storage operation reports failure through this enum. Credential and
//! configuration errors are raised before any remote call is made.

use std::path::PathBuf;

use thiserror::Error;

use crate::manager::SweepReport;

/// Result type alias for s3manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving credentials or running a storage operation
#[derive(Debug, Error)]
pub enum Error {
    /// Credential file does not exist or is not readable
    #[error("Credential file not found: {}", .0.display())]
    CredentialFileNotFound(PathBuf),

    /// Requested profile section is absent from the credential file
    #[error("Section [{section}] not found in {}", .path.display())]
    CredentialSectionMissing { section: String, path: PathBuf },

    /// Credential profile is present but invalid
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unable to create bucket: {0}")]
    BucketCreateFailed(String),

    #[error("Unable to find bucket {0}")]
    BucketNotFound(String),

    /// `sweep` holds the outcome of a forced emptying that left objects behind
    #[error("Bucket {bucket} is not empty")]
    BucketNotEmpty {
        bucket: String,
        sweep: Option<Box<SweepReport>>,
    },

    #[error("Unable to delete bucket {0}")]
    BucketDeleteVerificationFailed(String),

    #[error("{} not found", .0.display())]
    LocalFileNotFound(PathBuf),

    #[error("{} already exists", .0.display())]
    LocalFileExists(PathBuf),

    #[error("{key} already present in bucket {bucket}")]
    ObjectAlreadyExists { bucket: String, key: String },

    #[error("{key} not found in bucket {bucket}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("Unable to upload {} to {key} in bucket {bucket}", .local.display())]
    UploadVerificationFailed {
        bucket: String,
        key: String,
        local: PathBuf,
    },

    #[error("Unable to download {key} from bucket {bucket} to {}", .local.display())]
    DownloadVerificationFailed {
        bucket: String,
        key: String,
        local: PathBuf,
    },

    #[error("Unable to delete {key} in bucket {bucket}")]
    DeleteVerificationFailed { bucket: String, key: String },

    /// Transport or service failure from the storage backend
    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::ObjectNotFound {
            bucket: "demo".to_string(),
            key: "a.txt".to_string(),
        };
        assert_eq!(err.to_string(), "a.txt not found in bucket demo");

        let err = Error::CredentialSectionMissing {
            section: "default".to_string(),
            path: PathBuf::from("/home/user/.aws/credentials"),
        };
        assert_eq!(
            err.to_string(),
            "Section [default] not found in /home/user/.aws/credentials"
        );

        let err = Error::BucketNotEmpty {
            bucket: "demo".to_string(),
            sweep: None,
        };
        assert_eq!(err.to_string(), "Bucket demo is not empty");
    }
}
