use serde::{Deserialize, Serialize};

/// Ambient session values, resolved once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub region: String,
    pub bucket: String,
    pub role: String,
}

/// Result of sts:GetCallerIdentity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}
