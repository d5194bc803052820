use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{OmicsClient, StoreDescription, StoreType};
use crate::error::{RemoteError, RemoteResult};

#[derive(Default)]
struct State {
    stores: HashMap<(StoreType, String), StoreDescription>,
    calls: Vec<(StoreType, String)>,
}

/// In-memory implementation of OmicsClient
///
/// Unknown stores answer with a `ResourceNotFoundException`, like the service.
#[derive(Clone, Default)]
pub struct InMemoryOmicsClient {
    state: Arc<RwLock<State>>,
}

impl InMemoryOmicsClient {
    /// Create an empty client
    pub fn new() -> Self {
        Self::default()
    }

    /// Register store metadata
    pub async fn insert(
        &self,
        store_type: StoreType,
        store_id: impl Into<String>,
        description: StoreDescription,
    ) {
        let mut state = self.state.write().await;
        state.stores.insert((store_type, store_id.into()), description);
    }

    /// Every metadata query received so far
    pub async fn calls(&self) -> Vec<(StoreType, String)> {
        self.state.read().await.calls.clone()
    }

    async fn lookup(
        &self,
        operation: &'static str,
        store_type: StoreType,
        store_id: &str,
    ) -> RemoteResult<StoreDescription> {
        let mut state = self.state.write().await;
        state.calls.push((store_type, store_id.to_string()));

        state
            .stores
            .get(&(store_type, store_id.to_string()))
            .cloned()
            .ok_or_else(|| {
                RemoteError::new(operation, format!("store {} not found", store_id))
                    .with_code("ResourceNotFoundException")
            })
    }
}

#[async_trait]
impl OmicsClient for InMemoryOmicsClient {
    async fn get_sequence_store(&self, store_id: &str) -> RemoteResult<StoreDescription> {
        self.lookup("GetSequenceStore", StoreType::Sequence, store_id)
            .await
    }

    async fn get_reference_store(&self, store_id: &str) -> RemoteResult<StoreDescription> {
        self.lookup("GetReferenceStore", StoreType::Reference, store_id)
            .await
    }
}
