use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where SageMaker Studio writes the app metadata (contains `DomainId`).
pub const DEFAULT_METADATA_PATH: &str = "/opt/ml/metadata/resource-metadata.json";

/// Seqforge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqforgeConfig {
    /// AWS region; falls back to the ambient provider chain
    pub region: Option<String>,

    /// Execution role ARN; derived from the caller identity when unset
    pub role_arn: Option<String>,

    /// Default bucket; `sagemaker-{region}-{account}` when unset
    pub default_bucket: Option<String>,

    /// Studio resource metadata file
    pub metadata_path: PathBuf,

    /// Log level
    pub log_level: String,

    /// Training job defaults
    pub training: TrainingDefaults,
}

impl Default for SeqforgeConfig {
    fn default() -> Self {
        Self {
            region: None,
            role_arn: None,
            default_bucket: None,
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            log_level: "info".to_string(),
            training: TrainingDefaults::default(),
        }
    }
}

impl SeqforgeConfig {
    /// Load from configuration file
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }
}

/// Load the AWS SDK configuration from the default provider chain,
/// pinned to `region` when one is given
pub async fn load_sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    loader.load().await
}

/// Defaults applied to every configured training job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingDefaults {
    pub instance_type: String,
    pub instance_count: i32,
    pub volume_size_gb: i32,
    pub max_runtime_seconds: i32,

    /// Container image; `{region}` is substituted with the session region
    pub image_uri_template: String,

    /// Script run inside the container
    pub entry_point: String,

    /// Pre-staged `sourcedir.tar.gz` holding the entry point
    pub source_uri: Option<String>,

    pub keep_alive_seconds: i32,

    /// Enable torch_distributed
    pub distributed: bool,

    /// Value of the `project` tag
    pub project_tag: String,

    /// Seconds between DescribeTrainingJob calls while waiting
    pub poll_interval_secs: u64,
}

impl Default for TrainingDefaults {
    fn default() -> Self {
        Self {
            instance_type: "ml.g5.12xlarge".to_string(),
            instance_count: 1,
            volume_size_gb: 30,
            max_runtime_seconds: 86_400,
            image_uri_template: "763104351884.dkr.ecr.{region}.amazonaws.com/pytorch-training:2.2.0-gpu-py310-cu121-ubuntu20.04-sagemaker".to_string(),
            entry_point: "train_hf_accelerate.py".to_string(),
            source_uri: None,
            keep_alive_seconds: 1800,
            distributed: true,
            project_tag: "genomics-model-pretraining".to_string(),
            poll_interval_secs: 30,
        }
    }
}

impl TrainingDefaults {
    /// Image URI for the given region
    pub fn image_uri(&self, region: &str) -> String {
        self.image_uri_template.replace("{region}", region)
    }
}
