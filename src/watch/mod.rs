// src/watch/mod.rs

//! File watching and change classification.
//!
//! This module is responsible for:
//! - Registering the watch-set directories with a cross-platform watcher
//!   (`notify`) and forwarding raw changes to the runtime.
//! - Deciding whether a batch of changes needs a rebuild or only a
//!   template refresh.
//!
//! It does **not** decide which directories to watch; that is
//! [`crate::deps`]'s job.

pub mod classify;
pub mod path_utils;
pub mod watcher;

pub use classify::{ChangeClassifier, ChangeSet};
pub use watcher::{spawn_watcher, WatcherHandle};
