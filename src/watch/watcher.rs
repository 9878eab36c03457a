// src/watch/watcher.rs

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::deps::WatchSet;
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::path_utils::has_hidden_component;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    watched: usize,
}

impl WatcherHandle {
    /// Number of directories successfully registered.
    pub fn watched(&self) -> usize {
        self.watched
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("watched", &self.watched)
            .finish()
    }
}

/// Start watching every directory of `watch_set` and forward changed paths
/// to the runtime as [`RuntimeEvent::FilesChanged`].
///
/// Dependency directories are watched non-recursively and a missing one is
/// only a warning. Package directories are watched recursively and must
/// exist.
pub fn spawn_watcher(
    watch_set: &WatchSet,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("gob: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("gob: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut watched = 0;
    for dir in watch_set.dependency_dirs() {
        match watcher.watch(dir, RecursiveMode::NonRecursive) {
            Ok(()) => watched += 1,
            Err(err) => warn!(path = ?dir, error = %err, "cannot watch dependency directory"),
        }
    }
    for dir in watch_set.package_dirs() {
        watcher.watch(dir, RecursiveMode::Recursive)?;
        watched += 1;
    }

    info!(directories = watched, "file watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let Some(paths) = relevant_paths(event) else {
                continue;
            };
            debug!(?paths, "files changed");
            if runtime_tx
                .send(RuntimeEvent::FilesChanged { paths })
                .await
                .is_err()
            {
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        watched,
    })
}

/// Paths of a notify event worth reacting to, or `None` when the event
/// should be ignored (access, rename, hidden files).
pub fn relevant_paths(event: Event) -> Option<Vec<PathBuf>> {
    match event.kind {
        EventKind::Access(_) | EventKind::Modify(ModifyKind::Name(_)) => return None,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any => {}
        EventKind::Other => return None,
    }

    let paths: Vec<PathBuf> = event
        .paths
        .into_iter()
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            !has_hidden_component(&name)
        })
        .collect();

    if paths.is_empty() { None } else { Some(paths) }
}
