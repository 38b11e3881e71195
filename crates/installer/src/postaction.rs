//! Post-install actions.
//!
//! Runs after a package is extracted and blocks the pipeline until done,
//! including waits on spawned build commands. A missing program, a
//! non-zero exit, or a failed file move all abort the run.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::package::{CommandSpec, PostAction};

pub async fn run_post_action(action: &PostAction, package: &str) -> Result<()> {
    match action {
        PostAction::None => Ok(()),
        PostAction::RunCommands { dir, commands } => {
            for command in commands {
                run_command(dir, command, package).await?;
            }
            Ok(())
        }
        PostAction::MoveFile { from, to } => {
            debug!(from = %from.display(), to = %to.display(), "moving file");
            tokio::fs::rename(from, to)
                .await
                .map_err(|e| InstallError::PostAction {
                    package: package.to_string(),
                    detail: format!(
                        "failed to move '{}' to '{}': {e}",
                        from.display(),
                        to.display()
                    ),
                })
        }
    }
}

async fn run_command(dir: &Path, spec: &CommandSpec, package: &str) -> Result<()> {
    info!(package, command = %spec, dir = %dir.display(), "running post-install command");

    let status = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(dir)
        .status()
        .await
        .map_err(|e| InstallError::PostAction {
            package: package.to_string(),
            detail: format!("failed to spawn '{spec}': {e}"),
        })?;

    if !status.success() {
        return Err(InstallError::PostAction {
            package: package.to_string(),
            detail: format!("'{spec}' exited with {status}"),
        });
    }
    Ok(())
}
