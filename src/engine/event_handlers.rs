// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;

use crate::engine::debounce::Debouncer;
use crate::watch::ChangeClassifier;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Kill the running app(s), rebuild and start again.
    Restart,
    /// Tell template subscribers these files changed.
    NotifyTemplates(Vec<String>),
    /// Stop the app(s) and exit.
    Shutdown,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }
}

/// Buffer a watcher batch and process it if the window allows.
pub fn handle_files_changed(
    debouncer: &mut Debouncer,
    classifier: &ChangeClassifier,
    templates_enabled: bool,
    paths: Vec<PathBuf>,
    now: Instant,
) -> CoreStep {
    debouncer.record(paths);
    flush_ready(debouncer, classifier, templates_enabled, now)
}

/// Timer tick: process whatever is still buffered once the window passed.
pub fn handle_tick(
    debouncer: &mut Debouncer,
    classifier: &ChangeClassifier,
    templates_enabled: bool,
    now: Instant,
) -> CoreStep {
    flush_ready(debouncer, classifier, templates_enabled, now)
}

/// Forced restart; buffered changes are covered by it.
pub fn handle_restart_request(debouncer: &mut Debouncer, now: Instant) -> CoreStep {
    debouncer.reset(now);
    CoreStep {
        commands: vec![CoreCommand::Restart],
        keep_running: true,
    }
}

fn flush_ready(
    debouncer: &mut Debouncer,
    classifier: &ChangeClassifier,
    templates_enabled: bool,
    now: Instant,
) -> CoreStep {
    let Some(batch) = debouncer.take_ready(now) else {
        return CoreStep::idle();
    };

    let changes = classifier.classify(batch.as_slice());
    debug!(files = batch.len(), app = changes.app, views = changes.views.len(), "processing batch");

    let mut commands = Vec::new();
    if changes.app {
        commands.push(CoreCommand::Restart);
    }
    if templates_enabled && !changes.views.is_empty() {
        commands.push(CoreCommand::NotifyTemplates(changes.views));
    }

    CoreStep {
        commands,
        keep_running: true,
    }
}
