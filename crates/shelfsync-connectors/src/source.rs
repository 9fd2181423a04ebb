//! Object storage source for the CSV payload.

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use shelfsync_core::{ConnectorOptions, Error, Result, ShelfsyncConfig};
use tracing::{debug, info};

use crate::types::ObjectLocation;

/// Fetches an object's body as text.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Returns `None` when the object exists but carries no body.
    async fn fetch(&self, location: &ObjectLocation) -> Result<Option<String>>;
}

/// S3 source authenticated with the connector's static credential pair.
pub struct S3Source {
    client: aws_sdk_s3::Client,
}

impl S3Source {
    /// Build an S3 client for one run.
    pub async fn connect(options: &ConnectorOptions, config: &ShelfsyncConfig) -> Self {
        let credentials = Credentials::new(
            options.access_key_id.clone(),
            options.secret_access_key.clone(),
            None,
            None,
            "shelfsync-options",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.endpoint_url.is_some() {
            s3_config = s3_config.force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config.build()),
        }
    }
}

#[async_trait]
impl ObjectSource for S3Source {
    async fn fetch(&self, location: &ObjectLocation) -> Result<Option<String>> {
        debug!("GetObject s3://{}/{}", location.bucket, location.key);

        let response = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                Error::Fetch(format!(
                    "GetObject s3://{}/{} failed: {}",
                    location.bucket,
                    location.key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read object body: {}", e)))?
            .into_bytes();

        if bytes.is_empty() {
            return Ok(None);
        }

        info!(
            "Fetched s3://{}/{} ({} bytes)",
            location.bucket,
            location.key,
            bytes.len()
        );

        decode_body(bytes.to_vec()).map(Some)
    }
}

fn decode_body(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::Parse(format!("Object body is not UTF-8: {}", e)))
}
