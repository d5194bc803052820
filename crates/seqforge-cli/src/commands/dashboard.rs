//! dashboard command

use serde::Serialize;
use seqforge::{SeqforgeConfig, SessionContext};

use crate::error::CliError;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOutput {
    pub job_name: String,
    pub url: String,
}

/// Presign a TensorBoard URL for `job_name`
pub async fn run_dashboard(
    config: &SeqforgeConfig,
    job_name: &str,
    user_profile: &str,
) -> Result<DashboardOutput, CliError> {
    let session = SessionContext::initialize(config).await?;
    dashboard_with(&session, job_name, user_profile).await
}

pub async fn dashboard_with(
    session: &SessionContext,
    job_name: &str,
    user_profile: &str,
) -> Result<DashboardOutput, CliError> {
    if job_name.is_empty() {
        return Err(CliError::InvalidInput("job name must not be empty".to_string()));
    }
    let url = session.dashboard_url(job_name, user_profile).await?;
    Ok(DashboardOutput {
        job_name: job_name.to_string(),
        url,
    })
}
