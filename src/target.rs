// src/target.rs

//! Turning the user's `TARGET` argument into the package(s) to build.
//!
//! The argument may be:
//! - a package path relative to the source root (`app/main`),
//! - a source file (`./main.go`, `app/main/main.go`),
//! - a directory (`.`, `../web`),
//! - a JSON file under the source root listing several packages to build
//!   and run together (a "world" file).

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{GobError, Result};
use crate::fs::FileSystem;
use crate::watch::path_utils::{absolutize, relative_str};

/// A single package to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Package path relative to the source root, e.g. `app/main`.
    pub package_path: String,
}

impl Target {
    /// Base name of the package, used as the binary name.
    pub fn binary_name(&self) -> &str {
        self.package_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.package_path)
    }

    pub fn binary_in(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(self.binary_name())
    }

    pub fn dir_in(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.package_path)
    }
}

/// The resolved targets of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    pub targets: Vec<Target>,
    /// Program arguments. Only passed in single-package mode.
    pub args: Vec<String>,
    /// Set when the targets came from a world file.
    pub world: bool,
}

impl TargetSet {
    pub fn packages(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.package_path.clone()).collect()
    }

    /// The package whose directory holds the config file.
    pub fn primary(&self) -> &Target {
        &self.targets[0]
    }
}

/// Resolve `input` relative to `source_root` (for package paths) or `cwd`
/// (for file and directory paths).
pub fn resolve_targets(
    fs: &dyn FileSystem,
    source_root: &Path,
    cwd: &Path,
    input: &str,
    args: Vec<String>,
) -> Result<TargetSet> {
    if input.trim().is_empty() {
        return Err(GobError::InvalidTarget(
            "please provide a valid source file to run".to_string(),
        ));
    }

    if !is_cwd_relative(input)
        && let Some(packages) = read_world_file(fs, &source_root.join(input))
    {
        debug!(input, count = packages.len(), "building packages listed in world file");
        return resolve_world(fs, source_root, cwd, &packages);
    }

    let target = check_is_source(fs, source_root, cwd, input)?;
    Ok(TargetSet {
        targets: vec![target],
        args,
        world: false,
    })
}

fn read_world_file(fs: &dyn FileSystem, path: &Path) -> Option<Vec<String>> {
    if !fs.is_file(path) {
        return None;
    }
    let contents = fs.read_to_string(path).ok()?;
    serde_json::from_str::<Vec<String>>(&contents).ok()
}

fn resolve_world(
    fs: &dyn FileSystem,
    source_root: &Path,
    cwd: &Path,
    packages: &[String],
) -> Result<TargetSet> {
    let mut targets = Vec::new();
    let mut invalid = Vec::new();

    for package in packages {
        match check_is_source(fs, source_root, cwd, package) {
            Ok(target) => targets.push(target),
            Err(_) => invalid.push(package.as_str()),
        }
    }

    if !invalid.is_empty() {
        return Err(GobError::InvalidTarget(format!(
            "not valid source packages to build: {}",
            invalid.join(", ")
        )));
    }
    if targets.is_empty() {
        return Err(GobError::InvalidTarget("world file lists no packages".to_string()));
    }

    Ok(TargetSet {
        targets,
        args: Vec::new(),
        world: true,
    })
}

/// Work out which package `input` refers to and check that it exists.
pub fn check_is_source(
    fs: &dyn FileSystem,
    source_root: &Path,
    cwd: &Path,
    input: &str,
) -> Result<Target> {
    let trimmed = input.trim_end_matches('/');
    let in_root = source_root.join(trimmed);

    // Package (or a file inside one) named relative to the source root.
    if !is_cwd_relative(input) && !Path::new(input).is_absolute() && fs.exists(&in_root) {
        let package_dir = if fs.is_file(&in_root) {
            in_root.parent().map(Path::to_path_buf).unwrap_or(in_root)
        } else {
            in_root
        };
        return package_from_dir(source_root, &package_dir, input);
    }

    let path = Path::new(trimmed);
    let is_file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains('.') && n != "." && n != "..");

    let (package_dir, checked) = if is_file_name {
        let dir = absolutize(cwd, path.parent().unwrap_or(Path::new("")));
        let file = absolutize(cwd, path);
        (dir, file)
    } else {
        let dir = absolutize(cwd, path);
        (dir.clone(), dir)
    };

    if !fs.exists(&checked) {
        return Err(GobError::InvalidTarget(format!(
            "please provide a valid source file/package to run ('{input}' does not exist)"
        )));
    }

    package_from_dir(source_root, &package_dir, input)
}

/// `.`, `..`, `./x` and `../x` always refer to the working directory.
fn is_cwd_relative(input: &str) -> bool {
    let first = input.split('/').next().unwrap_or_default();
    first == "." || first == ".."
}

fn package_from_dir(source_root: &Path, package_dir: &Path, input: &str) -> Result<Target> {
    let package_path = relative_str(source_root, package_dir)
        .map(|rel| rel.trim_matches('/').to_string())
        .filter(|rel| !rel.is_empty())
        .ok_or_else(|| {
            GobError::InvalidTarget(format!(
                "'{input}' is not inside the source root {}",
                source_root.display()
            ))
        })?;

    Ok(Target { package_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn fixture() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("/go/src/app/main/main.go", "package main");
        fs.add_file("/go/src/app/util/util.go", "package util");
        fs
    }

    #[test]
    fn binary_is_named_after_the_package() {
        let t = Target {
            package_path: "app/main".to_string(),
        };
        assert_eq!(t.binary_in(Path::new("/build")), PathBuf::from("/build/main"));
        assert_eq!(t.dir_in(Path::new("/go/src")), PathBuf::from("/go/src/app/main"));
    }

    #[test]
    fn outside_the_source_root_is_rejected() {
        let fs = fixture();
        fs.add_file("/tmp/elsewhere/main.go", "package main");
        let err = check_is_source(&fs, Path::new("/go/src"), Path::new("/tmp/elsewhere"), "main.go")
            .unwrap_err();
        assert!(matches!(err, GobError::InvalidTarget(msg) if msg.contains("not inside")));
    }
}
