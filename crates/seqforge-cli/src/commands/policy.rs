//! iam-policy command

use seqforge::SeqforgeConfig;
use seqforge::store_access::{
    AwsOmicsClient, IamPolicyDocument, StoreAccessResolver, build_iam_policy,
};
use std::sync::Arc;

use crate::error::CliError;

/// What to build a policy for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyTarget {
    /// Explicit access point and key ARNs
    Arns { s3_arn: String, key_arn: String },
    /// A store whose ARNs are looked up first
    Store { store_id: String, store_type: String },
}

impl PolicyTarget {
    /// Pick the target from command-line flags.
    ///
    /// ARNs win when both are given; otherwise a store id is required.
    pub fn from_args(
        s3_arn: Option<String>,
        key_arn: Option<String>,
        store_id: Option<String>,
        store_type: String,
    ) -> Result<Self, CliError> {
        match (s3_arn, key_arn, store_id) {
            (Some(s3_arn), Some(key_arn), _) => Ok(PolicyTarget::Arns { s3_arn, key_arn }),
            (None, None, Some(store_id)) => Ok(PolicyTarget::Store {
                store_id,
                store_type,
            }),
            (Some(_), None, _) | (None, Some(_), _) => Err(CliError::InvalidInput(
                "--s3-arn and --key-arn must be given together".to_string(),
            )),
            (None, None, None) => Err(CliError::InvalidInput(
                "either --store-id or --s3-arn/--key-arn is required".to_string(),
            )),
        }
    }
}

/// Build the IAM policy, querying HealthOmics only for a store target
pub async fn run_iam_policy(
    config: &SeqforgeConfig,
    target: PolicyTarget,
) -> Result<IamPolicyDocument, CliError> {
    match target {
        PolicyTarget::Arns { s3_arn, key_arn } => Ok(build_iam_policy(&s3_arn, &key_arn)),
        store => {
            let client = AwsOmicsClient::from_env(config.region.as_deref()).await;
            policy_with(&StoreAccessResolver::new(Arc::new(client)), store).await
        }
    }
}

pub async fn policy_with(
    resolver: &StoreAccessResolver,
    target: PolicyTarget,
) -> Result<IamPolicyDocument, CliError> {
    match target {
        PolicyTarget::Arns { s3_arn, key_arn } => Ok(build_iam_policy(&s3_arn, &key_arn)),
        PolicyTarget::Store {
            store_id,
            store_type,
        } => {
            let access = resolver.resolve(&store_id, &store_type).await?;
            Ok(resolver.iam_policy(&access))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqforge::store_access::{InMemoryOmicsClient, StoreDescription, StoreType};

    #[test]
    fn test_target_from_args() {
        let target = PolicyTarget::from_args(
            Some("arn:aws:s3:ap1".to_string()),
            Some("arn:aws:kms:key1".to_string()),
            None,
            "sequence".to_string(),
        )
        .unwrap();
        assert_eq!(
            target,
            PolicyTarget::Arns {
                s3_arn: "arn:aws:s3:ap1".to_string(),
                key_arn: "arn:aws:kms:key1".to_string(),
            }
        );

        let target =
            PolicyTarget::from_args(None, None, Some("42".to_string()), "reference".to_string())
                .unwrap();
        assert!(matches!(target, PolicyTarget::Store { ref store_id, .. } if store_id == "42"));
    }

    #[test]
    fn test_target_requires_both_arns() {
        let result = PolicyTarget::from_args(
            Some("arn:aws:s3:ap1".to_string()),
            None,
            Some("42".to_string()),
            "sequence".to_string(),
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));

        let result = PolicyTarget::from_args(None, None, None, "sequence".to_string());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_arns_skip_lookup() {
        let client = InMemoryOmicsClient::new();
        let resolver = StoreAccessResolver::new(Arc::new(client.clone()));

        let policy = policy_with(
            &resolver,
            PolicyTarget::Arns {
                s3_arn: "arn:aws:s3:ap1".to_string(),
                key_arn: "arn:aws:kms:key1".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(policy, build_iam_policy("arn:aws:s3:ap1", "arn:aws:kms:key1"));
        assert!(client.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_lookup() {
        let client = InMemoryOmicsClient::new();
        client
            .insert(
                StoreType::Sequence,
                "42",
                StoreDescription {
                    s3_uri: Some("s3://alias/42/sequenceStore/42/".to_string()),
                    s3_access_point_arn: Some("arn:aws:s3:us-east-1:1:accesspoint/ap".to_string()),
                    key_arn: Some("arn:aws:kms:us-east-1:1:key/k".to_string()),
                },
            )
            .await;
        let resolver = StoreAccessResolver::new(Arc::new(client));

        let policy = policy_with(
            &resolver,
            PolicyTarget::Store {
                store_id: "42".to_string(),
                store_type: "sequence".to_string(),
            },
        )
        .await
        .unwrap();

        let condition = policy.statements[0].condition.as_ref().unwrap();
        assert_eq!(
            condition["StringEquals"]["s3:DataAccessPointArn"],
            "arn:aws:s3:us-east-1:1:accesspoint/ap"
        );
        assert_eq!(policy.statements[1].resource, "arn:aws:kms:us-east-1:1:key/k");
    }
}
