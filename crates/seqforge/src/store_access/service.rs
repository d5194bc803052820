use std::sync::Arc;
use tracing::debug;

use super::{
    AccessInfo, IamPolicyDocument, OmicsClient, StoreAccessError, StoreAccessResult,
    StoreDescription, StoreHandle, StoreType, build_iam_policy,
};

/// Resolves S3 access details for HealthOmics stores
#[derive(Clone)]
pub struct StoreAccessResolver {
    client: Arc<dyn OmicsClient>,
}

impl StoreAccessResolver {
    /// Create a new StoreAccessResolver
    pub fn new(client: Arc<dyn OmicsClient>) -> Self {
        Self { client }
    }

    /// Resolve access info for a store.
    ///
    /// `store_type` is matched case-insensitively against `sequence` and
    /// `reference`; anything else fails before the service is contacted.
    pub async fn resolve(&self, store_id: &str, store_type: &str) -> StoreAccessResult<AccessInfo> {
        let store_type = StoreType::parse(store_type)?;
        self.resolve_handle(&StoreHandle::new(store_type, store_id))
            .await
    }

    /// Resolve access info for a typed store handle
    pub async fn resolve_handle(&self, handle: &StoreHandle) -> StoreAccessResult<AccessInfo> {
        let store_id = handle.store_id.as_str();
        debug!(store_id = %store_id, store_type = %handle.store_type, "Resolving store access");

        match handle.store_type {
            StoreType::Sequence => {
                let description = self.client.get_sequence_store(store_id).await?;
                Self::sequence_access(store_id, description)
            }
            StoreType::Reference => {
                let description = self.client.get_reference_store(store_id).await?;
                Self::reference_access(store_id, description)
            }
        }
    }

    /// Policy granting read access to a resolved store
    pub fn iam_policy(&self, access: &AccessInfo) -> IamPolicyDocument {
        build_iam_policy(&access.s3_arn, &access.key_arn)
    }

    fn sequence_access(
        store_id: &str,
        description: StoreDescription,
    ) -> StoreAccessResult<AccessInfo> {
        let missing = |field| StoreAccessError::MissingField {
            store_id: store_id.to_string(),
            field,
        };

        let s3_uri = description.s3_uri.ok_or_else(|| missing("s3Access.s3Uri"))?;
        let s3_arn = description
            .s3_access_point_arn
            .ok_or_else(|| missing("s3Access.s3AccessPointArn"))?;
        let key_arn = description.key_arn.ok_or_else(|| missing("sseConfig.keyArn"))?;

        Ok(Self::access_info(StoreType::Sequence, s3_uri, s3_arn, key_arn))
    }

    // Reference payloads are not reachable through an access point yet, so
    // anything short of full S3 access is an error rather than a partial result.
    fn reference_access(
        store_id: &str,
        description: StoreDescription,
    ) -> StoreAccessResult<AccessInfo> {
        match description {
            StoreDescription {
                s3_uri: Some(s3_uri),
                s3_access_point_arn: Some(s3_arn),
                key_arn: Some(key_arn),
            } => Ok(Self::access_info(StoreType::Reference, s3_uri, s3_arn, key_arn)),
            _ => Err(StoreAccessError::ReferenceAccessUnavailable(
                store_id.to_string(),
            )),
        }
    }

    fn access_info(
        store_type: StoreType,
        s3_uri: String,
        s3_arn: String,
        key_arn: String,
    ) -> AccessInfo {
        let data_uri = format!("{}{}", s3_uri, store_type.data_suffix());
        AccessInfo {
            store_type,
            s3_uri,
            s3_arn,
            key_arn,
            data_uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store_access::InMemoryOmicsClient;

    fn full_description(s3_uri: &str) -> StoreDescription {
        StoreDescription {
            s3_uri: Some(s3_uri.to_string()),
            s3_access_point_arn: Some("arn:aws:s3:us-east-1:123456789012:accesspoint/ap1".to_string()),
            key_arn: Some("arn:aws:kms:us-east-1:123456789012:key/key1".to_string()),
        }
    }

    async fn setup() -> (InMemoryOmicsClient, StoreAccessResolver) {
        let client = InMemoryOmicsClient::new();
        client
            .insert(
                StoreType::Sequence,
                "store1",
                full_description("s3://bucket/store1/"),
            )
            .await;
        let resolver = StoreAccessResolver::new(Arc::new(client.clone()));
        (client, resolver)
    }

    #[tokio::test]
    async fn test_invalid_store_type_makes_no_call() {
        let (client, resolver) = setup().await;

        for store_type in ["variant", "", "seq", "references"] {
            let result = resolver.resolve("store1", store_type).await;
            assert!(matches!(result, Err(StoreAccessError::InvalidStoreType(_))));
        }

        assert!(client.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_sequence_store() {
        let (client, resolver) = setup().await;

        let access = resolver.resolve("store1", "Sequence").await.unwrap();

        assert_eq!(access.store_type, StoreType::Sequence);
        assert_eq!(access.s3_uri, "s3://bucket/store1/");
        assert_eq!(access.data_uri, "s3://bucket/store1/readSet/");
        assert_eq!(
            access.s3_arn,
            "arn:aws:s3:us-east-1:123456789012:accesspoint/ap1"
        );
        assert_eq!(client.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sequence_store_missing_key() {
        let (client, resolver) = setup().await;
        client
            .insert(
                StoreType::Sequence,
                "nokey",
                StoreDescription {
                    key_arn: None,
                    ..full_description("s3://bucket/nokey/")
                },
            )
            .await;

        let result = resolver.resolve("nokey", "sequence").await;
        assert!(matches!(
            result,
            Err(StoreAccessError::MissingField { field: "sseConfig.keyArn", .. })
        ));
    }

    #[tokio::test]
    async fn test_reference_store_with_access() {
        let (client, resolver) = setup().await;
        client
            .insert(
                StoreType::Reference,
                "ref1",
                full_description("s3://bucket/ref1/"),
            )
            .await;

        let access = resolver.resolve("ref1", "REFERENCE").await.unwrap();
        assert_eq!(access.store_type, StoreType::Reference);
        assert_eq!(access.data_uri, "s3://bucket/ref1/reference/");
    }

    #[tokio::test]
    async fn test_reference_store_without_access_fails_fast() {
        let (client, resolver) = setup().await;
        client
            .insert(
                StoreType::Reference,
                "ref2",
                StoreDescription {
                    key_arn: Some("arn:aws:kms:key".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let result = resolver.resolve("ref2", "reference").await;
        assert!(matches!(
            result,
            Err(StoreAccessError::ReferenceAccessUnavailable(ref id)) if id == "ref2"
        ));
    }

    #[tokio::test]
    async fn test_remote_error_propagates() {
        let (_client, resolver) = setup().await;

        let result = resolver.resolve("missing", "sequence").await;
        match result {
            Err(StoreAccessError::Remote(err)) => {
                assert_eq!(err.operation, "GetSequenceStore");
                assert_eq!(err.code.as_deref(), Some("ResourceNotFoundException"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_call_queries_the_service() {
        let (client, resolver) = setup().await;

        let first = resolver.resolve("store1", "sequence").await.unwrap();
        let second = resolver.resolve("store1", "sequence").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_iam_policy_from_access() {
        let (_client, resolver) = setup().await;
        let access = resolver.resolve("store1", "sequence").await.unwrap();

        let policy = resolver.iam_policy(&access);
        assert_eq!(policy, build_iam_policy(&access.s3_arn, &access.key_arn));
    }
}
