//! Integration tests against a live S3-compatible server
//!
//! Configure with environment variables, e.g. for a local MinIO:
//!
//! ```text
//! S3M_TEST_ENDPOINT=http://localhost:9000
//! S3M_TEST_ACCESS_KEY=minioadmin
//! S3M_TEST_SECRET_KEY=minioadmin
//! ```
//!
//! Run with: `cargo test -p s3m-s3 --features integration`

#![cfg(feature = "integration")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use s3m_core::{CredentialProfile, Error, ObjectLookup, StorageManager};
use s3m_s3::S3Client;
use tempfile::TempDir;

fn profile() -> CredentialProfile {
    let endpoint =
        std::env::var("S3M_TEST_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());
    let access_key =
        std::env::var("S3M_TEST_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());
    let secret_key =
        std::env::var("S3M_TEST_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

    let content = format!(
        "[default]\naws_access_key_id = {access_key}\naws_secret_access_key = {secret_key}\nendpoint_url = {endpoint}\n"
    );
    CredentialProfile::parse(&content, "default", &PathBuf::from("<env>"))
        .expect("test profile should be valid")
}

fn unique_bucket(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn manager(lookup: ObjectLookup) -> StorageManager<S3Client> {
    let client = S3Client::new(&profile()).await;
    StorageManager::new(client).with_lookup(lookup)
}

#[tokio::test]
async fn test_upload_download_delete_roundtrip() {
    let manager = manager(ObjectLookup::Listing).await;
    let bucket = unique_bucket("s3m-roundtrip");
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("hello.txt");
    std::fs::write(&source, b"hello from s3manager").unwrap();

    let uploaded = manager.upload(&bucket, "docs/hello.txt", &source, false).await.unwrap();
    assert!(uploaded.bucket_created);
    assert!(manager.bucket_exists(&bucket).await.unwrap());

    let err = manager
        .upload(&bucket, "docs/hello.txt", &source, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ObjectAlreadyExists { .. }));

    let dest = dir.path().join("out/hello.txt");
    manager.download(&bucket, "docs/hello.txt", &dest, false).await.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello from s3manager");

    manager.delete_object(&bucket, "docs/hello.txt").await.unwrap();
    manager.delete_bucket(&bucket, false).await.unwrap();
    assert!(!manager.bucket_exists(&bucket).await.unwrap());
}

#[tokio::test]
async fn test_force_delete_bucket_with_head_lookup() {
    let manager = manager(ObjectLookup::Head).await;
    let bucket = unique_bucket("s3m-force");
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.txt");
    std::fs::write(&source, b"a").unwrap();

    manager.upload(&bucket, "a.txt", &source, false).await.unwrap();
    manager.upload(&bucket, "b.txt", &source, false).await.unwrap();

    let err = manager.delete_bucket(&bucket, false).await.unwrap_err();
    assert!(matches!(err, Error::BucketNotEmpty { sweep: None, .. }));

    let deleted = manager.delete_bucket(&bucket, true).await.unwrap();
    let sweep = deleted.sweep.expect("bucket had contents");
    assert_eq!(sweep.deleted.len(), 2);
    assert!(!manager.bucket_exists(&bucket).await.unwrap());
}
