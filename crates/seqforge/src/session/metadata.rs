//! Studio resource metadata and the TensorBoard dashboard URL

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use std::path::Path;

use super::{SessionError, SessionResult};

/// The part of `resource-metadata.json` we use
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceMetadata {
    #[serde(rename = "DomainId")]
    pub domain_id: String,
}

impl ResourceMetadata {
    /// Read and parse the metadata file
    pub async fn load(path: &Path) -> SessionResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SessionError::MetadataIo {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| SessionError::MetadataParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Point a presigned Studio URL at TensorBoard with `job_name` preloaded
pub fn tensorboard_url(authorized_url: &str, job_name: &str) -> String {
    let state = format!(
        "/tensorboard/default/data/plugin/sagemaker_data_manager/add_folder_or_job?Redirect=True&Name={}",
        job_name
    );
    format!(
        "{}&redirect=TensorBoard&state={}",
        authorized_url,
        general_purpose::STANDARD.encode(state)
    )
}
