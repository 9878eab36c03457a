// src/config/model.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the per-package config file, stored in the target package's
/// directory.
pub const CONFIG_FILE_NAME: &str = ".gob.toml";

/// Configuration as read from a `.gob.toml` file, before validation.
///
/// ```toml
/// [build]
/// build_dir = "/tmp/gob"
/// build_types = [".go"]
///
/// [watch]
/// deps = true
/// limit = 64
/// template_types = [".soy"]
/// exclude = ["**/testdata/**"]
///
/// [run]
/// no_run = false
///
/// [agent]
/// enabled = true
/// port = 9034
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub run: RunSection,

    #[serde(default)]
    pub agent: AgentSection,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub build: BuildSection,
    pub watch: WatchSection,
    pub run: RunSection,
    pub agent: AgentSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            build: raw.build,
            watch: raw.watch,
            run: raw.run,
            agent: raw.agent,
        }
    }

    pub fn into_raw(self) -> RawConfigFile {
        RawConfigFile {
            build: self.build,
            watch: self.watch,
            run: self.run,
            agent: self.agent,
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildSection {
    /// Where binaries are written. `None` means `$GOPATH/gob/build`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,

    /// File extensions that cause the program to rebuild.
    #[serde(default = "default_build_types")]
    pub build_types: Vec<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            build_dir: None,
            build_types: default_build_types(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchSection {
    /// Watch the target package's dependencies as well.
    #[serde(default)]
    pub deps: bool,

    /// Expand dependencies transitively through workspace packages.
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Maximum number of dependency directories to watch. Values `<= 0`
    /// watch no dependencies at all.
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Keep standard-library imports in the dependency graph.
    #[serde(default)]
    pub include_stdlib: bool,

    /// File extensions that cause subscribed template engines to re-render.
    #[serde(default = "default_template_types")]
    pub template_types: Vec<String>,

    /// File extensions the watcher ignores.
    #[serde(default = "default_ignore_types")]
    pub ignore_types: Vec<String>,

    /// Glob patterns (relative to the source root) the watcher ignores.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Minimum time between two processed batches of changes.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            deps: false,
            recursive: default_true(),
            limit: default_limit(),
            include_stdlib: false,
            template_types: default_template_types(),
            ignore_types: default_ignore_types(),
            exclude: Vec::new(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunSection {
    /// Build on changes but never start the program.
    #[serde(default)]
    pub no_run: bool,
}

/// `[agent]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentSection {
    /// Run the template server and notify subscribers of template changes.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_build_types() -> Vec<String> {
    vec![".go".to_string()]
}

fn default_template_types() -> Vec<String> {
    vec![".soy".to_string()]
}

fn default_ignore_types() -> Vec<String> {
    [".js", ".css", ".scss", ".png", ".jpg", ".gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_limit() -> i64 {
    256
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_port() -> u16 {
    9034
}
