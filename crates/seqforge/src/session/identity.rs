use async_trait::async_trait;
use aws_sdk_sts::Client;
use tracing::debug;

use super::{CallerIdentity, SessionError, SessionResult};
use crate::error::{RemoteError, RemoteResult};

/// Ambient AWS identity of the hosting environment
#[async_trait]
pub trait AmbientIdentity: Send + Sync {
    /// Region picked up from the environment, if any
    fn region(&self) -> Option<String>;

    /// sts:GetCallerIdentity
    async fn caller_identity(&self) -> RemoteResult<CallerIdentity>;
}

/// Identity resolved through the AWS default provider chain
#[derive(Debug, Clone)]
pub struct StsAmbientIdentity {
    region: Option<String>,
    client: Client,
}

impl StsAmbientIdentity {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            region: config.region().map(|r| r.to_string()),
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl AmbientIdentity for StsAmbientIdentity {
    fn region(&self) -> Option<String> {
        self.region.clone()
    }

    async fn caller_identity(&self) -> RemoteResult<CallerIdentity> {
        debug!("GetCallerIdentity");
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("GetCallerIdentity", e))?;

        let missing = |field: &str| {
            RemoteError::new("GetCallerIdentity", format!("response has no {}", field))
        };
        Ok(CallerIdentity {
            account: output.account().ok_or_else(|| missing("Account"))?.to_string(),
            arn: output.arn().ok_or_else(|| missing("Arn"))?.to_string(),
        })
    }
}

/// Fixed identity, for tests and for callers that already know it
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    region: Option<String>,
    identity: CallerIdentity,
}

impl StaticIdentity {
    pub fn new(region: Option<&str>, account: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            region: region.map(str::to_string),
            identity: CallerIdentity {
                account: account.into(),
                arn: arn.into(),
            },
        }
    }
}

#[async_trait]
impl AmbientIdentity for StaticIdentity {
    fn region(&self) -> Option<String> {
        self.region.clone()
    }

    async fn caller_identity(&self) -> RemoteResult<CallerIdentity> {
        Ok(self.identity.clone())
    }
}

/// Turn a caller identity ARN into the IAM role ARN to run jobs as.
///
/// `arn:aws:sts::123:assumed-role/Role/session` becomes
/// `arn:aws:iam::123:role/Role`; role ARNs pass through unchanged.
pub fn execution_role_from_arn(arn: &str) -> SessionResult<String> {
    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    let [prefix, partition, service, _region, account, resource] = parts.as_slice() else {
        return Err(SessionError::NotARole(arn.to_string()));
    };
    if *prefix != "arn" {
        return Err(SessionError::NotARole(arn.to_string()));
    }

    match *service {
        "iam" if resource.starts_with("role/") => Ok(arn.to_string()),
        "sts" => match resource.strip_prefix("assumed-role/") {
            Some(rest) => {
                let role_name = rest.split('/').next().unwrap_or_default();
                if role_name.is_empty() {
                    return Err(SessionError::NotARole(arn.to_string()));
                }
                Ok(format!("arn:{}:iam::{}:role/{}", partition, account, role_name))
            }
            None => Err(SessionError::NotARole(arn.to_string())),
        },
        _ => Err(SessionError::NotARole(arn.to_string())),
    }
}
