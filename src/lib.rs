// src/lib.rs

pub mod agent;
pub mod cli;
pub mod config;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod signals;
pub mod target;
pub mod toolchain;
pub mod watch;

use std::collections::HashSet;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::agent::{NoTemplates, Subscribers, TemplateNotifier};
use crate::cli::CliArgs;
use crate::config::{config_path_for, load_if_present, save_to_path, GoPaths, Settings};
use crate::deps::{plan_watch_set, valid_package_roots, GoListResolver, PlanOptions, StdLib, WatchPlan, WatchSet};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::exec::RealProcessBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::target::{resolve_targets, TargetSet};
use crate::toolchain::GoToolchain;
use crate::watch::ChangeClassifier;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - target resolution and config loading
/// - dependency graph and watch-set planning
/// - process backend and (optional) template server
/// - file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let paths = GoPaths::from_env();
    let source_root = Settings::source_root(&args, &paths);
    let cwd = std::env::current_dir().context("reading current directory")?;

    let targets = resolve_targets(&fs, &source_root, &cwd, &args.target, args.program_args.clone())?;
    info!(packages = ?targets.packages(), world = targets.world, "resolved target");

    let config_path = config_path_for(&targets.primary().dir_in(&source_root));
    let file = if args.no_config {
        None
    } else {
        load_if_present(&fs, &config_path)?
    };
    let settings = Settings::resolve(&args, file.as_ref(), &paths);
    debug!(?settings, "effective settings");

    if args.save_config {
        save_to_path(&fs, &config_path, &settings.to_raw_config())?;
        println!("[gob] saved settings to {}", config_path.display());
    }

    let toolchain = GoToolchain::for_source_root(&settings.src_dir);
    let packages = targets.packages();

    if args.dry_run {
        let plan = plan(&fs, &settings, &toolchain, &packages)?;
        print_dry_run(&targets, &plan);
        return Ok(());
    }

    let watch_set = if settings.watch_deps {
        plan(&fs, &settings, &toolchain, &packages)?.watch_set
    } else {
        WatchSet::packages_only(&settings.src_dir, &packages)
    };

    fs.create_dir_all(&settings.build_dir)?;

    let backend = RealProcessBackend::new(
        toolchain,
        settings.build_dir.clone(),
        targets,
        settings.no_run,
    );

    if settings.agent_enabled {
        let subscribers = Subscribers::new();
        let (addr, _server) = agent::server::spawn(settings.agent_port, subscribers.clone()).await?;
        println!("[gob] template server listening on {addr}");
        watch_and_run(&settings, &watch_set, backend, subscribers).await
    } else {
        watch_and_run(&settings, &watch_set, backend, NoTemplates).await
    }
}

async fn watch_and_run<N: TemplateNotifier>(
    settings: &Settings,
    watch_set: &WatchSet,
    backend: RealProcessBackend,
    notifier: N,
) -> Result<()> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let watcher = watch::spawn_watcher(watch_set, rt_tx.clone())?;
    println!("[gob] watching {} directories", watcher.watched());

    signals::spawn_interrupt_handler(rt_tx.clone());

    // Initial build and start.
    rt_tx.send(RuntimeEvent::RestartRequested).await?;

    let classifier = ChangeClassifier::from_settings(settings)?;
    let core = CoreRuntime::new(classifier, settings.debounce, settings.agent_enabled);
    let runtime = Runtime::new(core, rt_rx, backend, notifier);
    let result = runtime.run().await;

    drop(watcher);
    result.map_err(Into::into)
}

/// Resolve imports with `go list` and compute the watch set.
fn plan(
    fs: &dyn FileSystem,
    settings: &Settings,
    toolchain: &GoToolchain,
    packages: &[String],
) -> Result<WatchPlan> {
    let valid_roots = if settings.recursive {
        valid_package_roots(fs, &settings.src_dir)?
    } else {
        HashSet::new()
    };

    let resolver = GoListResolver::new(toolchain.clone());
    let options = PlanOptions {
        include_standard_library: settings.include_stdlib,
        recursive: settings.recursive,
        limit: settings.limit,
    };
    let plan = plan_watch_set(
        &resolver,
        StdLib::go(),
        &settings.src_dir,
        packages,
        &valid_roots,
        options,
    );

    for failure in &plan.failures {
        warn!(error = %failure, "dependency resolution incomplete");
    }
    Ok(plan)
}

/// Print the dependency tree and the directories that would be watched.
fn print_dry_run(targets: &TargetSet, plan: &WatchPlan) {
    println!("gob dry-run");
    println!("  packages = {:?}", targets.packages());
    if !targets.args.is_empty() {
        println!("  args = {:?}", targets.args);
    }
    println!(
        "  dependencies = {} (watching {}, dropped {})",
        plan.graph.total_dependencies(),
        plan.filter.selected().len(),
        plan.filter.to_remove()
    );
    println!();

    print!("{}", plan.graph.render());
    println!();

    println!("watch set ({}):", plan.watch_set.len());
    for dir in plan.watch_set.dependency_dirs() {
        println!("  - {}", dir.display());
    }
    for dir in plan.watch_set.package_dirs() {
        println!("  - {} (recursive)", dir.display());
    }

    if !plan.failures.is_empty() {
        println!();
        println!("unresolved ({}):", plan.failures.len());
        for failure in &plan.failures {
            println!("  - {failure}");
        }
    }

    debug!("dry-run complete (no build)");
}
