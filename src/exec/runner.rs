// src/exec/runner.rs

//! Starting and stopping built binaries.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Start `binary` with the terminal's stdio.
pub fn start_binary(binary: &Path, args: &[String]) -> Result<Child> {
    let child = Command::new(binary)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("starting {binary:?}"))?;

    info!(binary = ?binary, pid = child.id(), "application started");
    Ok(child)
}

/// Kill a running child and reap it. A child that already exited is fine.
pub async fn stop_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(pid = child.id(), ?status, "application had already exited");
            return;
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "failed to poll application status"),
    }

    if let Err(err) = child.kill().await {
        warn!(pid = child.id(), error = %err, "failed to kill application");
    }
}
