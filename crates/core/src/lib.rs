//! s3m-core: Core library for the s3manager CLI
//!
//! This crate provides:
//! - Credential profile loading
//! - The error taxonomy shared by every operation
//! - The ObjectStore trait for storage backends
//! - StorageManager, which wraps each operation in existence checks
//!
//! Nothing here depends on a specific S3 SDK, so the operations can be
//! tested against in-memory and mocked backends.

pub mod credentials;
pub mod error;
pub mod manager;
pub mod traits;

#[cfg(test)]
mod testing;

pub use credentials::{
    AddressingStyle, CredentialProfile, DEFAULT_CREDENTIAL_PATH, DEFAULT_PROFILE, DEFAULT_REGION,
};
pub use error::{Error, Result};
pub use manager::{BucketDeleted, Downloaded, StorageManager, SweepReport, Uploaded};
pub use traits::{ObjectLookup, ObjectStore};
