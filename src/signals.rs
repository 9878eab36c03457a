// src/signals.rs

//! Ctrl-C handling.
//!
//! - One press, then quiet for a second: exit.
//! - Two presses within a second, then quiet for 300ms: rebuild and
//!   restart the app.
//! - Three presses in quick succession: exit.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;

/// How long to wait for a second press.
pub const SECOND_PRESS_WINDOW: Duration = Duration::from_secs(1);
/// How long to wait for a third press after the second.
pub const THIRD_PRESS_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    Exit,
    Restart,
}

impl InterruptAction {
    pub fn event(self) -> RuntimeEvent {
        match self {
            InterruptAction::Exit => RuntimeEvent::ShutdownRequested,
            InterruptAction::Restart => RuntimeEvent::RestartRequested,
        }
    }
}

/// Wait for the next press sequence on `presses` and decide what it means.
///
/// Returns `None` once the press source is gone.
pub async fn interpret_presses(presses: &mut mpsc::Receiver<()>) -> Option<InterruptAction> {
    presses.recv().await?;

    match timeout(SECOND_PRESS_WINDOW, presses.recv()).await {
        Err(_) | Ok(None) => return Some(InterruptAction::Exit),
        Ok(Some(())) => {}
    }

    match timeout(THIRD_PRESS_WINDOW, presses.recv()).await {
        Err(_) | Ok(None) => Some(InterruptAction::Restart),
        Ok(Some(())) => Some(InterruptAction::Exit),
    }
}

/// Listen for Ctrl-C and feed the resulting actions to the runtime.
pub fn spawn_interrupt_handler(runtime_tx: mpsc::Sender<RuntimeEvent>) {
    let (press_tx, mut press_rx) = mpsc::channel::<()>(8);

    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            if press_tx.send(()).await.is_err() {
                return;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(action) = interpret_presses(&mut press_rx).await {
            debug!(?action, "interrupt sequence");
            let exit = action == InterruptAction::Exit;
            if runtime_tx.send(action.event()).await.is_err() || exit {
                break;
            }
        }
    });
}
