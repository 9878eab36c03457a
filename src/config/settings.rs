// src/config/settings.rs

//! Effective settings: CLI flags layered over the package's config file,
//! layered over built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{
    AgentSection, BuildSection, ConfigFile, RawConfigFile, RunSection, WatchSection,
};

/// GOPATH-derived default locations.
#[derive(Debug, Clone)]
pub struct GoPaths {
    gopath: PathBuf,
}

impl GoPaths {
    pub fn new(gopath: impl Into<PathBuf>) -> Self {
        Self {
            gopath: gopath.into(),
        }
    }

    /// First entry of `$GOPATH`, falling back to `$HOME/go` like the `go`
    /// tool does.
    pub fn from_env() -> Self {
        let from_gopath = std::env::var_os("GOPATH")
            .and_then(|v| std::env::split_paths(&v).find(|p| !p.as_os_str().is_empty()));
        let gopath = from_gopath
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join("go")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { gopath }
    }

    pub fn src_dir(&self) -> PathBuf {
        self.gopath.join("src")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.gopath.join("gob").join("build")
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
    pub build_types: Vec<String>,
    pub template_types: Vec<String>,
    pub ignore_types: Vec<String>,
    pub exclude: Vec<String>,
    pub watch_deps: bool,
    pub recursive: bool,
    pub limit: i64,
    pub include_stdlib: bool,
    pub no_run: bool,
    pub agent_enabled: bool,
    pub agent_port: u16,
    pub debounce: Duration,
}

impl Settings {
    /// The source root is needed before the config file can be located, so
    /// it only ever comes from the CLI or the environment.
    pub fn source_root(cli: &CliArgs, paths: &GoPaths) -> PathBuf {
        cli.src_dir.clone().unwrap_or_else(|| paths.src_dir())
    }

    pub fn resolve(cli: &CliArgs, file: Option<&ConfigFile>, paths: &GoPaths) -> Self {
        let defaults;
        let (build, watch, run, agent) = match file {
            Some(f) => (&f.build, &f.watch, &f.run, &f.agent),
            None => {
                defaults = RawConfigFile::default();
                (&defaults.build, &defaults.watch, &defaults.run, &defaults.agent)
            }
        };

        let build_dir = cli
            .build_dir
            .clone()
            .or_else(|| build.build_dir.clone())
            .unwrap_or_else(|| paths.build_dir());

        Self {
            src_dir: Self::source_root(cli, paths),
            build_dir,
            build_types: build.build_types.clone(),
            template_types: watch.template_types.clone(),
            ignore_types: watch.ignore_types.clone(),
            exclude: watch.exclude.clone(),
            watch_deps: cli.deps || watch.deps,
            recursive: cli.recursive.unwrap_or(watch.recursive),
            limit: cli.limit.unwrap_or(watch.limit),
            include_stdlib: cli.stdlib || watch.include_stdlib,
            no_run: cli.norun || run.no_run,
            agent_enabled: cli.agent || agent.enabled,
            agent_port: cli.port.unwrap_or(agent.port),
            debounce: Duration::from_millis(watch.debounce_ms),
        }
    }

    /// Settings as a config file, for `--save-config`.
    pub fn to_raw_config(&self) -> RawConfigFile {
        RawConfigFile {
            build: BuildSection {
                build_dir: Some(self.build_dir.clone()),
                build_types: self.build_types.clone(),
            },
            watch: WatchSection {
                deps: self.watch_deps,
                recursive: self.recursive,
                limit: self.limit,
                include_stdlib: self.include_stdlib,
                template_types: self.template_types.clone(),
                ignore_types: self.ignore_types.clone(),
                exclude: self.exclude.clone(),
                debounce_ms: u64::try_from(self.debounce.as_millis()).unwrap_or(u64::MAX),
            },
            run: RunSection {
                no_run: self.no_run,
            },
            agent: AgentSection {
                enabled: self.agent_enabled,
                port: self.agent_port,
            },
        }
    }
}
