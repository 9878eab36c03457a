// src/engine/mod.rs

//! Orchestration engine for gob.
//!
//! This module ties together:
//! - the debounce buffer for changed files
//! - change classification (rebuild vs. template refresh)
//! - the main runtime event loop that reacts to:
//!   - file-watch batches
//!   - timer ticks
//!   - restart requests from the interrupt handler
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

/// Events flowing into the runtime from the watcher, the signal handler
/// and the tick timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The watcher saw these paths change.
    FilesChanged { paths: Vec<PathBuf> },
    /// Periodic timer; flushes a pending batch once the window has passed.
    Tick,
    /// Rebuild and restart now (double Ctrl-C).
    RestartRequested,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod debounce;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use debounce::Debouncer;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
