//! IAM policy granting read access to a store through its S3 access point

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const POLICY_VERSION: &str = "2012-10-17";

/// IAM policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IamPolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statements: Vec<PolicyStatement>,
}

/// A single policy statement.
///
/// `action` is either a string or a list of strings, as IAM allows both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: String,
    pub action: Value,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
}

impl IamPolicyDocument {
    /// Pretty JSON, ready to paste into an IAM role
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the policy a training role needs to read a store.
///
/// The ARNs are not validated.
pub fn build_iam_policy(s3_arn: &str, key_arn: &str) -> IamPolicyDocument {
    IamPolicyDocument {
        version: POLICY_VERSION.to_string(),
        statements: vec![
            PolicyStatement {
                sid: "S3DirectAccess".to_string(),
                effect: "Allow".to_string(),
                action: json!(["s3:GetObject", "s3:ListBucket"]),
                resource: "*".to_string(),
                condition: Some(json!({
                    "StringEquals": {
                        "s3:DataAccessPointArn": s3_arn
                    }
                })),
            },
            PolicyStatement {
                sid: "DefaultSequenceStoreKMSDecrypt".to_string(),
                effect: "Allow".to_string(),
                action: json!("kms:Decrypt"),
                resource: key_arn.to_string(),
                condition: None,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_statements() {
        let policy = build_iam_policy("arn:aws:s3:ap1", "arn:aws:kms:key1");

        assert_eq!(policy.version, "2012-10-17");
        assert_eq!(policy.statements.len(), 2);

        let s3 = &policy.statements[0];
        assert_eq!(s3.action, json!(["s3:GetObject", "s3:ListBucket"]));
        assert_eq!(
            s3.condition.as_ref().unwrap()["StringEquals"]["s3:DataAccessPointArn"],
            "arn:aws:s3:ap1"
        );

        let kms = &policy.statements[1];
        assert_eq!(kms.action, json!("kms:Decrypt"));
        assert_eq!(kms.resource, "arn:aws:kms:key1");
        assert!(kms.condition.is_none());
    }

    #[test]
    fn test_json_shape() {
        let policy = build_iam_policy("arn:aws:s3:ap1", "arn:aws:kms:key1");
        let value = serde_json::to_value(&policy).unwrap();

        assert_eq!(
            value,
            json!({
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Sid": "S3DirectAccess",
                        "Effect": "Allow",
                        "Action": ["s3:GetObject", "s3:ListBucket"],
                        "Resource": "*",
                        "Condition": {
                            "StringEquals": {"s3:DataAccessPointArn": "arn:aws:s3:ap1"}
                        }
                    },
                    {
                        "Sid": "DefaultSequenceStoreKMSDecrypt",
                        "Effect": "Allow",
                        "Action": "kms:Decrypt",
                        "Resource": "arn:aws:kms:key1"
                    }
                ]
            })
        );
    }

    #[test]
    fn test_deterministic() {
        let first = build_iam_policy("arn:aws:s3:ap1", "arn:aws:kms:key1");
        let second = build_iam_policy("arn:aws:s3:ap1", "arn:aws:kms:key1");
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_malformed_arns_pass_through() {
        let policy = build_iam_policy("not-an-arn", "");
        assert_eq!(
            policy.statements[0].condition.as_ref().unwrap()["StringEquals"]
                ["s3:DataAccessPointArn"],
            "not-an-arn"
        );
        assert_eq!(policy.statements[1].resource, "");
    }
}
