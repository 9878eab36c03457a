// src/toolchain.rs

//! Location and environment of the host `go` toolchain.
//!
//! Both import resolution (`go list`) and building (`go build`) run in
//! GOPATH mode against the configured source root, so they share the same
//! environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct GoToolchain {
    binary: PathBuf,
    gopath: Option<PathBuf>,
}

impl GoToolchain {
    /// Toolchain for packages living under `source_root`.
    ///
    /// When the source root is a conventional `<GOPATH>/src` directory, its
    /// parent is exported as `GOPATH` for every invocation.
    pub fn for_source_root(source_root: &Path) -> Self {
        Self {
            binary: PathBuf::from("go"),
            gopath: gopath_of(source_root),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn gopath(&self) -> Option<&Path> {
        self.gopath.as_deref()
    }

    /// Environment overrides for every `go` invocation.
    pub fn env(&self) -> Vec<(&'static str, OsString)> {
        let mut env = vec![("GO111MODULE", OsString::from("off"))];
        if let Some(gopath) = &self.gopath {
            env.push(("GOPATH", gopath.clone().into_os_string()));
        }
        env
    }
}

fn gopath_of(source_root: &Path) -> Option<PathBuf> {
    match source_root.file_name() {
        Some(name) if name == "src" => source_root.parent().map(Path::to_path_buf),
        _ => None,
    }
}
