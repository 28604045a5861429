//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3m-core.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_smithy_types::error::display::DisplayErrorContext;
use s3m_core::{CredentialProfile, DEFAULT_REGION, Error, ObjectStore, Result};

/// Provider name attached to credentials loaded from the credential file
const CREDENTIAL_PROVIDER_NAME: &str = "s3manager-credential-file";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    region: String,
}

impl S3Client {
    /// Create a new S3 client from a credential profile
    pub async fn new(profile: &CredentialProfile) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            profile.access_key_id.clone(),
            profile.secret_access_key.clone(),
            profile.session_token.clone(),
            None, // expiry
            CREDENTIAL_PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(profile.region.clone()));

        if let Some(endpoint) = &profile.endpoint_url {
            loader = loader.endpoint_url(endpoint.as_str().trim_end_matches('/'));
        }

        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.force_path_style())
            .build();

        tracing::debug!(
            profile = %profile.name,
            region = %profile.region,
            endpoint = ?profile.endpoint_url.as_ref().map(|u| u.as_str()),
            path_style = profile.force_path_style(),
            "Built S3 client"
        );

        Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            region: profile.region.clone(),
        }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// Format an SDK error with its full source chain
    fn format_sdk_error<E, R>(error: &SdkError<E, R>) -> String
    where
        E: std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        DisplayErrorContext(error).to_string()
    }

    /// Error code reported by the service, if the failure came from the service
    fn service_code<E, R>(error: &SdkError<E, R>) -> Option<&str>
    where
        E: ProvideErrorMetadata,
    {
        error.as_service_error().and_then(|e| e.code())
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let response = self
                .inner
                .list_buckets()
                .set_continuation_token(token.take())
                .send()
                .await
                .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

            names.extend(
                response
                    .buckets()
                    .iter()
                    .filter_map(|b| b.name().map(str::to_string)),
            );

            match response.continuation_token() {
                Some(next) if !next.is_empty() => token = Some(next.to_string()),
                _ => break,
            }
        }

        tracing::debug!(count = names.len(), "Listed buckets");
        Ok(names)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.region != DEFAULT_REGION {
            let config = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build();
            request = request.create_bucket_configuration(config);
        }

        request
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                if Self::service_code(&e) == Some("NoSuchBucket") {
                    Error::BucketNotFound(bucket.to_string())
                } else if Self::service_code(&e) == Some("BucketNotEmpty") {
                    Error::BucketNotEmpty {
                        bucket: bucket.to_string(),
                        sweep: None,
                    }
                } else {
                    Error::Network(Self::format_sdk_error(&e))
                }
            })?;

        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let response = self
                .inner
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(token.take())
                .send()
                .await
                .map_err(|e| {
                    if Self::service_code(&e) == Some("NoSuchBucket") {
                        Error::BucketNotFound(bucket.to_string())
                    } else {
                        Error::Network(Self::format_sdk_error(&e))
                    }
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|o| o.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(next) if response.is_truncated().unwrap_or(false) => {
                    token = Some(next.to_string())
                }
                _ => break,
            }
        }

        tracing::debug!(bucket = bucket, count = keys.len(), "Listed objects");
        Ok(keys)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<bool> {
        match self.inner.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    Ok(false)
                } else {
                    Err(Error::Network(Self::format_sdk_error(&e)))
                }
            }
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        overwrite: bool,
    ) -> Result<u64> {
        let size = tokio::fs::metadata(source).await?.len();
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let content_type = mime_guess::from_path(key).first_or_octet_stream();

        let mut request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type.essence_str())
            .body(body);

        if !overwrite {
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|e| {
            if Self::service_code(&e) == Some("PreconditionFailed") {
                Error::ObjectAlreadyExists {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else if Self::service_code(&e) == Some("NoSuchBucket") {
                Error::BucketNotFound(bucket.to_string())
            } else {
                Error::Network(Self::format_sdk_error(&e))
            }
        })?;

        Ok(size)
    }

    async fn get_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    Error::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    Error::Network(Self::format_sdk_error(&e))
                }
            })?;

        // The body lands next to `dest` and only replaces it once complete
        let partial = partial_path(dest);
        let reader = response.body.into_async_read();
        tokio::pin!(reader);
        let streamed = async {
            let mut file = tokio::fs::File::create(&partial).await?;
            let written = tokio::io::copy(&mut reader, &mut file).await?;
            tokio::io::AsyncWriteExt::flush(&mut file).await?;
            Ok::<_, std::io::Error>(written)
        }
        .await;

        match streamed {
            Ok(written) => {
                tokio::fs::rename(&partial, dest).await?;
                Ok(written)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    tracing::debug!(path = %partial.display(), error = %cleanup, "Failed to remove partial download");
                }
                Err(Error::Io(e))
            }
        }
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        Ok(())
    }
}

/// `<path>.part`, where an object is streamed before being moved into place
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(content: &str) -> CredentialProfile {
        CredentialProfile::parse(content, "default", &PathBuf::from("/tmp/credentials")).unwrap()
    }

    #[tokio::test]
    async fn test_client_from_profile() {
        let profile = profile(
            "[default]\naws_access_key_id = AKID\naws_secret_access_key = SECRET\nregion = eu-central-1\nendpoint_url = http://localhost:9000\n",
        );
        let client = S3Client::new(&profile).await;
        assert_eq!(client.region, "eu-central-1");

        let config = client.inner().config();
        assert_eq!(
            config.region().map(ToString::to_string),
            Some("eu-central-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_client_default_region() {
        let profile = profile("[default]\naws_access_key_id = AKID\naws_secret_access_key = SECRET\n");
        let client = S3Client::new(&profile).await;
        assert_eq!(client.region, DEFAULT_REGION);
    }

    #[test]
    fn test_partial_path_is_a_sibling() {
        let dest = Path::new("/tmp/out/report.csv");
        let partial = partial_path(dest);
        assert_eq!(partial, PathBuf::from("/tmp/out/report.csv.part"));
        assert_eq!(partial.parent(), dest.parent());
    }
}
