// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The runtime talks to a `ProcessBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation here.
//!
//! - `RealProcessBackend` builds every target with `go build` and runs the
//!   resulting binaries.
//! - Tests can provide their own `ProcessBackend` that, for example, only
//!   records how often a restart was requested.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::process::Child;
use tracing::{info, warn};

use crate::errors::Result;
use crate::exec::builder::build_package;
use crate::exec::runner::{start_binary, stop_child};
use crate::target::TargetSet;
use crate::toolchain::GoToolchain;

/// Trait abstracting how the app is rebuilt and (re)started.
///
/// Production code uses [`RealProcessBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessBackend: Send {
    /// Stop whatever is running, rebuild and start again.
    ///
    /// A failed build is reported to the user and is not an error.
    fn restart(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Stop whatever is running.
    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real process backend used in production.
pub struct RealProcessBackend {
    toolchain: GoToolchain,
    build_dir: PathBuf,
    targets: TargetSet,
    no_run: bool,
    children: Vec<Child>,
}

impl RealProcessBackend {
    pub fn new(toolchain: GoToolchain, build_dir: PathBuf, targets: TargetSet, no_run: bool) -> Self {
        Self {
            toolchain,
            build_dir,
            targets,
            no_run,
            children: Vec::new(),
        }
    }

    async fn stop_all(&mut self) {
        for child in &mut self.children {
            stop_child(child).await;
        }
        self.children.clear();
    }

    fn start_all(&mut self) -> Result<()> {
        println!("[gob] starting application...");
        let args: &[String] = if self.targets.world {
            &[]
        } else {
            &self.targets.args
        };
        for target in &self.targets.targets {
            let child = start_binary(&target.binary_in(&self.build_dir), args)?;
            self.children.push(child);
        }
        Ok(())
    }
}

/// Build every target; all are attempted even after a failure.
async fn build_all(toolchain: &GoToolchain, build_dir: &Path, targets: &TargetSet) -> Result<bool> {
    let mut ok = true;
    for target in &targets.targets {
        println!("[gob] building src... {}", target.package_path);
        let output = target.binary_in(build_dir);
        if !build_package(toolchain, &target.package_path, &output).await? {
            ok = false;
        }
    }
    Ok(ok)
}

impl std::fmt::Debug for RealProcessBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealProcessBackend")
            .field("build_dir", &self.build_dir)
            .field("targets", &self.targets)
            .field("running", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl ProcessBackend for RealProcessBackend {
    fn restart(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.stop_all().await;

            if !build_all(&self.toolchain, &self.build_dir, &self.targets).await? {
                println!("[gob] build failed; waiting for changes...");
                warn!("build failed");
                return Ok(());
            }

            if self.no_run {
                info!("build complete; not running (--norun)");
                return Ok(());
            }

            self.start_all()
        })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.stop_all().await;
            Ok(())
        })
    }
}
