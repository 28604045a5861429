//! s3m-s3: S3 SDK adapter for s3manager
//!
//! Implements the `ObjectStore` trait from s3m-core on top of aws-sdk-s3.

mod client;

pub use client::S3Client;
