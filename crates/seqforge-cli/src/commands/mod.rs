//! CLI command handlers
//!
//! Each `run_*` function builds AWS-backed clients from the configuration;
//! the `*_with` variants take already-built façades.

pub mod dashboard;
pub mod policy;
pub mod session;
pub mod store_access;
pub mod train;

pub use dashboard::{DashboardOutput, dashboard_with, run_dashboard};
pub use policy::{PolicyTarget, policy_with, run_iam_policy};
pub use session::run_session;
pub use store_access::{resolve_with, run_store_access};
pub use train::{TrainArgs, TrainOutput, run_train, train_with};

use crate::error::CliError;
use serde::Serialize;
use std::io::Write;

/// Write `value` to stdout as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
