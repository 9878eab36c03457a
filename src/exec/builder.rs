// src/exec/builder.rs

//! `go build` invocation for a single package.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::toolchain::GoToolchain;

/// Build `package` into `output`. Compiler output goes straight to the
/// terminal.
///
/// Returns `Ok(false)` when the compiler rejects the package and `Err` only
/// when `go` could not be run at all.
pub async fn build_package(toolchain: &GoToolchain, package: &str, output: &Path) -> Result<bool> {
    let mut cmd = Command::new(toolchain.binary());
    cmd.arg("build")
        .arg("-o")
        .arg(output)
        .arg(package)
        .envs(toolchain.env())
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    debug!(package, output = ?output, "running go build");

    let status = cmd
        .status()
        .await
        .with_context(|| format!("running {:?} build for '{package}'", toolchain.binary()))?;

    info!(package, success = status.success(), exit_code = status.code().unwrap_or(-1), "build finished");
    Ok(status.success())
}
