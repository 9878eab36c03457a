#![allow(dead_code)]

use std::path::{Path, PathBuf};

use gob::config::{ConfigFile, RawConfigFile};
use gob::deps::{Graph, GraphBuild, GraphBuilder, StaticResolver, StdLib};
use gob::fs::mock::MockFileSystem;

/// Builder for an in-memory workspace: packages with their imports, and
/// optionally their files on a mock filesystem.
pub struct WorkspaceBuilder {
    source_root: PathBuf,
    resolver: StaticResolver,
    fs: MockFileSystem,
    include_stdlib: bool,
}

impl WorkspaceBuilder {
    pub fn new(source_root: impl AsRef<Path>) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            resolver: StaticResolver::new(),
            fs: MockFileSystem::new(),
            include_stdlib: false,
        }
    }

    /// Register `package` with its direct imports and a `main.go` on the
    /// mock filesystem.
    pub fn package(mut self, package: &str, imports: &[&str]) -> Self {
        self.resolver.insert(package, imports.iter().copied());
        self.fs.add_file(
            self.source_root.join(package).join("main.go"),
            "package main",
        );
        self
    }

    /// Add an arbitrary file under the source root.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        self.fs.add_file(self.source_root.join(rel), contents);
        self
    }

    pub fn include_stdlib(mut self, include: bool) -> Self {
        self.include_stdlib = include;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn resolver(&self) -> &StaticResolver {
        &self.resolver
    }

    pub fn fs(&self) -> &MockFileSystem {
        &self.fs
    }

    /// Build the graph of `packages` and return the full outcome.
    pub fn build(&self, packages: &[&str]) -> GraphBuild {
        let packages: Vec<String> = packages.iter().map(|p| p.to_string()).collect();
        GraphBuilder::new(&self.resolver, StdLib::go())
            .include_standard_library(self.include_stdlib)
            .build(&packages, &self.source_root)
    }

    /// Build the graph of `packages`, asserting that every package resolved.
    pub fn graph(&self, packages: &[&str]) -> Graph {
        let build = self.build(packages);
        assert!(
            build.is_complete(),
            "unexpected resolution failures: {:?}",
            build.failures
        );
        build.graph
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn deps(mut self, deps: bool) -> Self {
        self.config.watch.deps = deps;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.config.watch.limit = limit;
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn template_type(mut self, ext: &str) -> Self {
        self.config.watch.template_types.push(ext.to_string());
        self
    }

    pub fn agent(mut self, port: u16) -> Self {
        self.config.agent.enabled = true;
        self.config.agent.port = port;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
