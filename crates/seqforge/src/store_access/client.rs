use async_trait::async_trait;

use super::StoreDescription;
use crate::error::RemoteResult;

/// Read access to HealthOmics store metadata
#[async_trait]
pub trait OmicsClient: Send + Sync {
    /// GetSequenceStore
    async fn get_sequence_store(&self, store_id: &str) -> RemoteResult<StoreDescription>;

    /// GetReferenceStore
    async fn get_reference_store(&self, store_id: &str) -> RemoteResult<StoreDescription>;
}
