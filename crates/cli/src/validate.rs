//! Post-run validation step.
//!
//! Runs the configured command through the platform shell after every
//! document has been written. A non-zero exit fails the process but leaves
//! the written files in place.

use tokio::process::Command;

use crate::error::RunError;

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Run `command` and wait for it to exit.
pub async fn run_validation(command: &str) -> Result<(), RunError> {
    tracing::info!(command, "running post-run validation");

    let status = shell(command)
        .status()
        .await
        .map_err(|source| RunError::ValidationSpawn { command: command.to_string(), source })?;

    if !status.success() {
        tracing::error!(command, status = %status, "post-run validation failed");
        return Err(RunError::ValidationFailed { command: command.to_string(), status });
    }

    tracing::info!(command, "post-run validation passed");
    Ok(())
}
