use async_trait::async_trait;
use aws_sdk_omics::Client;
use tracing::debug;

use super::{OmicsClient, StoreDescription};
use crate::config::load_sdk_config;
use crate::error::{RemoteError, RemoteResult};

/// HealthOmics client backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsOmicsClient {
    client: Client,
}

impl AwsOmicsClient {
    /// Create from a loaded AWS configuration
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Load the default AWS configuration, optionally pinned to a region
    pub async fn from_env(region: Option<&str>) -> Self {
        Self::new(&load_sdk_config(region).await)
    }
}

#[async_trait]
impl OmicsClient for AwsOmicsClient {
    async fn get_sequence_store(&self, store_id: &str) -> RemoteResult<StoreDescription> {
        debug!(store_id = %store_id, "GetSequenceStore");
        let output = self
            .client
            .get_sequence_store()
            .id(store_id)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("GetSequenceStore", e))?;

        let s3_access = output.s3_access();
        Ok(StoreDescription {
            s3_uri: s3_access.and_then(|a| a.s3_uri()).map(str::to_string),
            s3_access_point_arn: s3_access
                .and_then(|a| a.s3_access_point_arn())
                .map(str::to_string),
            key_arn: output
                .sse_config()
                .and_then(|c| c.key_arn())
                .map(str::to_string),
        })
    }

    async fn get_reference_store(&self, store_id: &str) -> RemoteResult<StoreDescription> {
        debug!(store_id = %store_id, "GetReferenceStore");
        let output = self
            .client
            .get_reference_store()
            .id(store_id)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("GetReferenceStore", e))?;

        // Reference stores carry no S3 access block.
        Ok(StoreDescription {
            s3_uri: None,
            s3_access_point_arn: None,
            key_arn: output
                .sse_config()
                .and_then(|c| c.key_arn())
                .map(str::to_string),
        })
    }
}
