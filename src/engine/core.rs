// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - rebuilding and restarting the app through a `ProcessBackend`
//! - notifying template subscribers
//!
//! Time is passed in explicitly so the core can be unit tested without
//! Tokio, channels, filesystem or processes.

use std::time::{Duration, Instant};

use crate::engine::debounce::Debouncer;
use crate::engine::event_handlers::{
    handle_files_changed, handle_restart_request, handle_tick, CoreCommand, CoreStep,
};
use crate::engine::RuntimeEvent;
use crate::watch::ChangeClassifier;

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    debouncer: Debouncer,
    classifier: ChangeClassifier,
    templates_enabled: bool,
}

impl CoreRuntime {
    pub fn new(classifier: ChangeClassifier, debounce: Duration, templates_enabled: bool) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            classifier,
            templates_enabled,
        }
    }

    /// Whether changed files are waiting for the window to pass (for tests).
    pub fn has_pending(&self) -> bool {
        self.debouncer.has_pending()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent, now: Instant) -> CoreStep {
        match event {
            RuntimeEvent::FilesChanged { paths } => handle_files_changed(
                &mut self.debouncer,
                &self.classifier,
                self.templates_enabled,
                paths,
                now,
            ),
            RuntimeEvent::Tick => {
                handle_tick(&mut self.debouncer, &self.classifier, self.templates_enabled, now)
            }
            RuntimeEvent::RestartRequested => handle_restart_request(&mut self.debouncer, now),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: vec![CoreCommand::Shutdown],
                keep_running: false,
            },
        }
    }
}
