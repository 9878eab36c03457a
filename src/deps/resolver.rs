// src/deps/resolver.rs

//! Import resolution: the seam between the graph builder and the host build
//! toolchain.
//!
//! - [`GoListResolver`] asks `go list` for a package's direct imports.
//! - [`StaticResolver`] answers from an in-memory table; tests and dry runs
//!   use it to drive the builder without a toolchain.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::errors::{GobError, Result};
use crate::toolchain::GoToolchain;

/// Returns the direct imports of a package.
///
/// A package that cannot be found under `source_root` is an error, never an
/// empty import list.
pub trait ImportResolver {
    fn resolve(&self, package: &str, source_root: &Path) -> Result<Vec<String>>;
}

impl<R: ImportResolver + ?Sized> ImportResolver for &R {
    fn resolve(&self, package: &str, source_root: &Path) -> Result<Vec<String>> {
        (**self).resolve(package, source_root)
    }
}

/// Resolver backed by `go list`.
#[derive(Debug, Clone)]
pub struct GoListResolver {
    toolchain: GoToolchain,
}

impl GoListResolver {
    pub fn new(toolchain: GoToolchain) -> Self {
        Self { toolchain }
    }
}

impl ImportResolver for GoListResolver {
    fn resolve(&self, package: &str, source_root: &Path) -> Result<Vec<String>> {
        debug!(package, ?source_root, "resolving imports with go list");

        let output = Command::new(self.toolchain.binary())
            .arg("list")
            .arg("-f")
            .arg("{{join .Imports \"\\n\"}}")
            .arg(package)
            .current_dir(source_root)
            .envs(self.toolchain.env())
            .output()
            .map_err(|e| GobError::resolution(package, format!("running go list: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GobError::resolution(package, stderr.trim()));
        }

        Ok(parse_import_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_import_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// In-memory resolver: package path → ordered direct imports.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    imports: HashMap<String, Vec<String>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a package and its imports.
    pub fn with_package<I, S>(mut self, package: &str, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(package, imports);
        self
    }

    pub fn insert<I, S>(&mut self, package: &str, imports: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports
            .insert(package.to_string(), imports.into_iter().map(Into::into).collect());
    }
}

impl ImportResolver for StaticResolver {
    fn resolve(&self, package: &str, source_root: &Path) -> Result<Vec<String>> {
        self.imports.get(package).cloned().ok_or_else(|| {
            GobError::resolution(
                package,
                format!("cannot find package in {}", source_root.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_resolver_errors_on_unknown_package() {
        let resolver = StaticResolver::new().with_package("app/main", ["fmt", "app/util"]);
        let root = Path::new("/src");

        assert_eq!(
            resolver.resolve("app/main", root).unwrap(),
            vec!["fmt".to_string(), "app/util".to_string()]
        );
        match resolver.resolve("app/missing", root) {
            Err(GobError::Resolution { package, .. }) => assert_eq!(package, "app/missing"),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn go_list_output_is_split_into_imports() {
        let out = "fmt\n  net/http\n\nvendor/lib/json\n";
        assert_eq!(
            parse_import_lines(out),
            vec!["fmt", "net/http", "vendor/lib/json"]
        );
    }
}
