//! session command

use seqforge::{SeqforgeConfig, SessionContext, SessionInfo};

use crate::error::CliError;

/// Resolve region, bucket and role from the environment
pub async fn run_session(config: &SeqforgeConfig) -> Result<SessionInfo, CliError> {
    let session = SessionContext::initialize(config).await?;
    Ok(session.session_info().clone())
}
