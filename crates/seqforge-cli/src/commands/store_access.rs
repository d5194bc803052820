//! store-access command

use seqforge::SeqforgeConfig;
use seqforge::store_access::{AccessInfo, AwsOmicsClient, StoreAccessResolver};
use std::sync::Arc;
use tracing::info;

use crate::error::CliError;

/// Resolve S3 access details for a store through HealthOmics
pub async fn run_store_access(
    config: &SeqforgeConfig,
    store_id: &str,
    store_type: &str,
) -> Result<AccessInfo, CliError> {
    let client = AwsOmicsClient::from_env(config.region.as_deref()).await;
    let resolver = StoreAccessResolver::new(Arc::new(client));
    resolve_with(&resolver, store_id, store_type).await
}

pub async fn resolve_with(
    resolver: &StoreAccessResolver,
    store_id: &str,
    store_type: &str,
) -> Result<AccessInfo, CliError> {
    let access = resolver.resolve(store_id, store_type).await?;
    info!(store_id = %store_id, data_uri = %access.data_uri, "Resolved store access");
    Ok(access)
}
