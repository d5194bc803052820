use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    AmbientIdentity, ResourceMetadata, SessionError, SessionInfo, SessionResult,
    StsAmbientIdentity, execution_role_from_arn, tensorboard_url,
};
use crate::config::{SeqforgeConfig, load_sdk_config};
use crate::sagemaker::{AwsSageMakerClient, SageMakerClient};

/// Session values resolved once from the hosting environment.
///
/// There is no refresh; build a new context to observe environment changes.
#[derive(Clone)]
pub struct SessionContext {
    info: SessionInfo,
    sagemaker: Arc<dyn SageMakerClient>,
    metadata_path: PathBuf,
}

impl SessionContext {
    /// Resolve the session against AWS using the default provider chain
    pub async fn initialize(config: &SeqforgeConfig) -> SessionResult<Self> {
        let sdk_config = load_sdk_config(config.region.as_deref()).await;

        let identity = StsAmbientIdentity::new(&sdk_config);
        let sagemaker = Arc::new(AwsSageMakerClient::new(&sdk_config));
        Self::resolve(&identity, sagemaker, config).await
    }

    /// Resolve region, bucket and role from an ambient identity.
    ///
    /// Values set in `config` take precedence over ambient ones.
    pub async fn resolve(
        identity: &dyn AmbientIdentity,
        sagemaker: Arc<dyn SageMakerClient>,
        config: &SeqforgeConfig,
    ) -> SessionResult<Self> {
        let region = config
            .region
            .clone()
            .or_else(|| identity.region())
            .ok_or(SessionError::MissingRegion)?;

        // GetCallerIdentity only when something is left to derive, and at most once.
        let mut caller = None;

        let bucket = match &config.default_bucket {
            Some(bucket) => bucket.clone(),
            None => {
                let resolved = caller.insert(identity.caller_identity().await?);
                format!("sagemaker-{}-{}", region, resolved.account)
            }
        };

        let role = match &config.role_arn {
            Some(role) => role.clone(),
            None => {
                let resolved = match caller {
                    Some(resolved) => resolved,
                    None => identity.caller_identity().await?,
                };
                execution_role_from_arn(&resolved.arn)?
            }
        };

        info!(region = %region, bucket = %bucket, role = %role, "Resolved session");
        Ok(Self {
            info: SessionInfo {
                region,
                bucket,
                role,
            },
            sagemaker,
            metadata_path: config.metadata_path.clone(),
        })
    }

    pub fn region(&self) -> &str {
        &self.info.region
    }

    pub fn bucket(&self) -> &str {
        &self.info.bucket
    }

    pub fn role(&self) -> &str {
        &self.info.role
    }

    /// Snapshot of the resolved values
    pub fn session_info(&self) -> &SessionInfo {
        &self.info
    }

    /// SageMaker handle the session was built with
    pub fn sagemaker(&self) -> Arc<dyn SageMakerClient> {
        Arc::clone(&self.sagemaker)
    }

    /// Presigned TensorBoard URL for `job_name`, opened as `user_profile`.
    ///
    /// Requires the Studio metadata file; there is no fallback when it is
    /// missing or malformed.
    pub async fn dashboard_url(&self, job_name: &str, user_profile: &str) -> SessionResult<String> {
        let metadata = ResourceMetadata::load(&self.metadata_path).await?;
        debug!(domain_id = %metadata.domain_id, job_name = %job_name, "Presigning dashboard URL");

        let authorized = self
            .sagemaker
            .create_presigned_domain_url(&metadata.domain_id, user_profile)
            .await?;
        Ok(tensorboard_url(&authorized, job_name))
    }
}
