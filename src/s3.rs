//! Object storage access for evaluation summaries and dataset exports.

use crate::error::{CloudAiError, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use std::fmt;
use url::form_urlencoded;

/// A parsed `s3://bucket/key` location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct S3Uri {
    pub bucket: String,
    pub key: String,
}

impl S3Uri {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parses `s3://bucket/key`. The key may be empty, e.g. for a prefix.
    ///
    /// The key is kept byte for byte: object keys may hold spaces, `#`, `?`
    /// and `%`, none of which are escapes here.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("s3://")
            .ok_or_else(|| CloudAiError::InvalidArgument(format!("{uri} is not an s3:// URI")))?;
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(CloudAiError::InvalidArgument(format!("{uri} has no bucket")));
        }
        Ok(Self::new(bucket, key))
    }

    /// A location under this one, treating the key as a prefix.
    pub fn join(&self, suffix: &str) -> Self {
        Self::new(self.bucket.clone(), format!("{}{}", self.key, suffix))
    }
}

impl fmt::Display for S3Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// The object operations the crate needs from S3.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        bucket: &str,
        key: &str,
    ) -> Result<()>;

    /// Whether the object exists. A missing object is `Ok(false)`, not an error.
    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool>;
}

/// The `CopySource` value for an object: `bucket/key` with each key segment
/// URL-encoded and the `/` separators kept.
pub fn copy_source(bucket: &str, key: &str) -> String {
    let key = key
        .split('/')
        .map(|segment| form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/");
    // Form encoding writes a space as `+`; a literal `+` is already `%2B`.
    format!("{bucket}/{}", key.replace('+', "%20"))
}

#[async_trait]
impl ObjectStore for aws_sdk_s3::Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self.get_object().bucket(bucket).key(key).send().await?;
        let bytes = output.body.collect().await?.into_bytes();
        Ok(bytes.to_vec())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(())
    }

    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        bucket: &str,
        key: &str,
    ) -> Result<()> {
        self.copy_object()
            .copy_source(copy_source(source_bucket, source_key))
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        match self.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bucket_and_key() {
        let uri = S3Uri::parse("s3://my-bucket/output/EvaluationResultSummary-proj-v1.json").unwrap();
        assert_eq!(uri.bucket, "my-bucket");
        assert_eq!(uri.key, "output/EvaluationResultSummary-proj-v1.json");
        assert_eq!(
            uri.to_string(),
            "s3://my-bucket/output/EvaluationResultSummary-proj-v1.json"
        );
    }

    #[test]
    fn prefix_join_appends_to_key() {
        let prefix = S3Uri::parse("s3://dest-bucket/stubber_test/").unwrap();
        assert_eq!(
            prefix.join("train/cookies/a.jpg"),
            S3Uri::new("dest-bucket", "stubber_test/train/cookies/a.jpg")
        );
    }

    #[test]
    fn rejects_other_schemes_and_missing_bucket() {
        assert!(matches!(
            S3Uri::parse("https://bucket/key"),
            Err(CloudAiError::InvalidArgument(_))
        ));
        assert!(S3Uri::parse("not a uri").is_err());
        assert!(S3Uri::parse("s3:///key").is_err());
    }

    #[test]
    fn keeps_keys_with_url_special_characters() {
        for key in ["images/my image.jpg", "a#b.jpg", "a?b.jpg", "100%/x+y.jpg"] {
            let uri = S3Uri::parse(&format!("s3://bucket/{key}")).unwrap();
            assert_eq!(uri, S3Uri::new("bucket", key));
            assert_eq!(uri.to_string(), format!("s3://bucket/{key}"));
        }
        assert_eq!(S3Uri::parse("s3://bucket").unwrap(), S3Uri::new("bucket", ""));
    }

    #[test]
    fn copy_source_encodes_key_segments() {
        assert_eq!(
            copy_source("src", "train/my image+1%.jpg"),
            "src/train/my%20image%2B1%25.jpg"
        );
        assert_eq!(copy_source("src", "caf\u{e9}/a#b?.jpg"), "src/caf%C3%A9/a%23b%3F.jpg");
        assert_eq!(copy_source("src", "plain/key.jpg"), "src/plain/key.jpg");
    }
}
