// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::agent::TemplateNotifier;
use crate::errors::Result;
use crate::exec::ProcessBackend;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// How often buffered changes are re-checked against the debounce window.
pub const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// Drives the core runtime in response to `RuntimeEvent`s, and delegates
/// rebuilding to a `ProcessBackend` and template pushes to a
/// `TemplateNotifier`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics.
pub struct Runtime<B: ProcessBackend, N: TemplateNotifier> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
    notifier: N,
    tick: Duration,
}

impl<B: ProcessBackend, N: TemplateNotifier> fmt::Debug for Runtime<B, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend, N: TemplateNotifier> Runtime<B, N> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B, notifier: N) -> Self {
        Self {
            core,
            event_rx,
            backend,
            notifier,
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`, plus a periodic tick.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (restart, notify, shutdown).
    ///
    /// The backend is always shut down before returning.
    pub async fn run(mut self) -> Result<()> {
        info!("gob runtime started");

        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let event = tokio::select! {
                received = self.event_rx.recv() => match received {
                    Some(e) => e,
                    None => {
                        info!("runtime event channel closed; exiting");
                        break;
                    }
                },
                _ = ticker.tick() => RuntimeEvent::Tick,
            };

            if event != RuntimeEvent::Tick {
                debug!(?event, "runtime received event");
            }

            let step = self.core.step(event, Instant::now().into_std());

            for command in step.commands {
                self.execute_command(command).await;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        self.backend.shutdown().await?;
        info!("runtime exiting");
        Ok(())
    }

    /// Execute a single command from the core. Failures are logged; the
    /// watcher keeps running so the next save can fix them.
    async fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::Restart => {
                if let Err(err) = self.backend.restart().await {
                    error!(error = %err, "restart failed");
                    println!("[gob] {err}");
                }
            }
            CoreCommand::NotifyTemplates(files) => {
                debug!(?files, "notifying template subscribers");
                if let Err(err) = self.notifier.notify(files).await {
                    error!(error = %err, "template notification failed");
                }
            }
            CoreCommand::Shutdown => {
                info!("shutting down application");
            }
        }
    }
}
