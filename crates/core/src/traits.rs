//! Storage backend abstraction
//!
//! The operation wrapper only talks to storage through [`ObjectStore`], so it
//! can run against the S3 SDK adapter, an in-memory store or a mock.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// How the wrapper decides whether a single object exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectLookup {
    /// Re-list the whole bucket and search for the key
    #[default]
    Listing,
    /// Issue a single HEAD request for the key
    Head,
}

/// Primitive calls against an object-storage service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Names of all buckets visible to the credentials
    async fn list_buckets(&self) -> Result<Vec<String>>;

    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Every object key in the bucket
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;

    /// Whether `key` exists, via a single lookup
    async fn head_object(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Upload the file at `source` to `key`.
    ///
    /// When `overwrite` is false the backend should refuse to replace an
    /// existing object if it supports conditional writes. Returns the number
    /// of bytes uploaded.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        overwrite: bool,
    ) -> Result<u64>;

    /// Download `key` into a new file at `dest`. Returns the number of bytes written.
    async fn get_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
