//! Storage operation wrapper
//!
//! Each operation checks remote and local state before acting, performs one
//! backend call, and checks again afterwards. The remote store is the only
//! source of truth, so nothing is cached between calls. The checks and the
//! action are not atomic: another client modifying the bucket in between can
//! cause a spurious failure.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::traits::{ObjectLookup, ObjectStore};

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub bucket: String,
    pub key: String,
    pub local: PathBuf,
    pub size_bytes: u64,
    /// The bucket did not exist and was created for this upload
    pub bucket_created: bool,
}

/// Result of a successful download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub bucket: String,
    pub key: String,
    pub local: PathBuf,
    pub size_bytes: u64,
    /// Where a pre-existing local file was moved to, if any
    pub backup: Option<PathBuf>,
}

/// Outcome of a best-effort sweep over every object in a bucket
#[derive(Debug, Default)]
pub struct SweepReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl SweepReport {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a successful bucket deletion
#[derive(Debug)]
pub struct BucketDeleted {
    pub bucket: String,
    /// Present when the bucket was emptied first
    pub sweep: Option<SweepReport>,
}

/// Wraps an [`ObjectStore`] with verify-before / verify-after operations
pub struct StorageManager<S> {
    store: S,
    lookup: ObjectLookup,
}

impl<S: ObjectStore> StorageManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lookup: ObjectLookup::default(),
        }
    }

    /// Use `lookup` for every single-object existence check
    pub fn with_lookup(mut self, lookup: ObjectLookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let buckets = self.store.list_buckets().await?;
        Ok(buckets.iter().any(|name| name == bucket))
    }

    pub async fn list_bucket_contents(&self, bucket: &str) -> Result<Vec<String>> {
        self.store.list_objects(bucket).await
    }

    pub async fn object_exists(&self, key: &str, bucket: &str) -> Result<bool> {
        match self.lookup {
            ObjectLookup::Listing => {
                let contents = self.list_bucket_contents(bucket).await?;
                Ok(contents.iter().any(|k| k == key))
            }
            ObjectLookup::Head => self.store.head_object(bucket, key).await,
        }
    }

    /// Upload `local` to `bucket/key`, creating the bucket when needed
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        local: &Path,
        force: bool,
    ) -> Result<Uploaded> {
        let mut bucket_created = false;
        if !self.bucket_exists(bucket).await? {
            tracing::debug!(bucket = bucket, "Bucket missing, creating it");
            self.store.create_bucket(bucket).await?;
            if !self.bucket_exists(bucket).await? {
                return Err(Error::BucketCreateFailed(bucket.to_string()));
            }
            bucket_created = true;
        }

        if !local.is_file() {
            return Err(Error::LocalFileNotFound(local.to_path_buf()));
        }

        if !force && self.object_exists(key, bucket).await? {
            return Err(Error::ObjectAlreadyExists {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        tracing::debug!(bucket = bucket, key = key, local = %local.display(), force = force, "Uploading");
        let size_bytes = self.store.put_object(bucket, key, local, force).await?;

        if !self.object_exists(key, bucket).await? {
            return Err(Error::UploadVerificationFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                local: local.to_path_buf(),
            });
        }

        Ok(Uploaded {
            bucket: bucket.to_string(),
            key: key.to_string(),
            local: local.to_path_buf(),
            size_bytes,
            bucket_created,
        })
    }

    /// Download `bucket/key` to `local`, backing up an existing file when forced
    pub async fn download(
        &self,
        bucket: &str,
        key: &str,
        local: &Path,
        force: bool,
    ) -> Result<Downloaded> {
        // A missing bucket means a missing object, whichever lookup is in use
        let found = match self.object_exists(key, bucket).await {
            Ok(found) => found,
            Err(Error::BucketNotFound(_)) => false,
            Err(e) => return Err(e),
        };
        if !found {
            return Err(Error::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        if let Some(parent) = local.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            tracing::debug!(dir = %parent.display(), "Creating destination directory");
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut backup = None;
        if local.is_file() {
            if !force {
                return Err(Error::LocalFileExists(local.to_path_buf()));
            }
            let old = backup_path(local);
            if old.is_file() {
                tokio::fs::remove_file(&old).await?;
            }
            tokio::fs::rename(local, &old).await?;
            tracing::debug!(from = %local.display(), to = %old.display(), "Backed up existing file");
            backup = Some(old);
        }

        tracing::debug!(bucket = bucket, key = key, local = %local.display(), "Downloading");
        let size_bytes = match self.store.get_object(bucket, key, local).await {
            Ok(size) => size,
            Err(e) => {
                restore_after_failed_download(local, backup.as_deref()).await;
                return Err(e);
            }
        };

        if !local.is_file() {
            return Err(Error::DownloadVerificationFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                local: local.to_path_buf(),
            });
        }

        Ok(Downloaded {
            bucket: bucket.to_string(),
            key: key.to_string(),
            local: local.to_path_buf(),
            size_bytes,
            backup,
        })
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        if !self.bucket_exists(bucket).await? {
            return Err(Error::BucketNotFound(bucket.to_string()));
        }

        if !self.object_exists(key, bucket).await? {
            return Err(Error::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        tracing::debug!(bucket = bucket, key = key, "Deleting object");
        self.store.delete_object(bucket, key).await?;

        if self.object_exists(key, bucket).await? {
            return Err(Error::DeleteVerificationFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        Ok(())
    }

    /// Delete every object in `bucket`, one at a time.
    ///
    /// Individual failures do not stop the sweep; they are collected in the
    /// returned report.
    pub async fn delete_all_objects(&self, bucket: &str) -> Result<SweepReport> {
        if !self.bucket_exists(bucket).await? {
            return Err(Error::BucketNotFound(bucket.to_string()));
        }

        let mut report = SweepReport::default();
        for key in self.list_bucket_contents(bucket).await? {
            match self.delete_object(bucket, &key).await {
                Ok(()) => report.deleted.push(key),
                Err(e) => {
                    tracing::warn!(bucket = bucket, key = %key, error = %e, "Failed to delete object");
                    report.failed.push((key, e));
                }
            }
        }

        Ok(report)
    }

    /// Delete `bucket`; with `force`, empty it first
    pub async fn delete_bucket(&self, bucket: &str, force: bool) -> Result<BucketDeleted> {
        if !self.bucket_exists(bucket).await? {
            return Err(Error::BucketNotFound(bucket.to_string()));
        }

        let mut sweep = None;
        if !self.list_bucket_contents(bucket).await?.is_empty() {
            if !force {
                return Err(Error::BucketNotEmpty {
                    bucket: bucket.to_string(),
                    sweep: None,
                });
            }
            let report = self.delete_all_objects(bucket).await?;
            if !self.list_bucket_contents(bucket).await?.is_empty() {
                return Err(Error::BucketNotEmpty {
                    bucket: bucket.to_string(),
                    sweep: Some(Box::new(report)),
                });
            }
            sweep = Some(report);
        }

        tracing::debug!(bucket = bucket, "Deleting bucket");
        self.store.delete_bucket(bucket).await?;

        if self.bucket_exists(bucket).await? {
            return Err(Error::BucketDeleteVerificationFailed(bucket.to_string()));
        }

        Ok(BucketDeleted {
            bucket: bucket.to_string(),
            sweep,
        })
    }
}

/// `<path>.old`, keeping the original extension in the name
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".old");
    PathBuf::from(name)
}

/// Drop whatever a failed download left at `local` and put the backup back
async fn restore_after_failed_download(local: &Path, backup: Option<&Path>) {
    if local.is_file()
        && let Err(e) = tokio::fs::remove_file(local).await
    {
        tracing::warn!(path = %local.display(), error = %e, "Failed to remove partial download");
    }

    if let Some(old) = backup {
        match tokio::fs::rename(old, local).await {
            Ok(()) => {
                tracing::debug!(from = %old.display(), to = %local.display(), "Restored backup")
            }
            Err(e) => {
                tracing::warn!(path = %old.display(), error = %e, "Failed to restore backup")
            }
        }
    }
}
