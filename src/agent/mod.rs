// src/agent/mod.rs

//! Template change notification over HTTP.
//!
//! - [`server`] runs inside gob: templated apps subscribe to it, and it
//!   pushes the list of changed template files to every subscriber.
//! - [`client`] is the helper a templated app embeds to receive those
//!   pushes and recompile its templates.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub mod client;
pub mod server;

pub use client::{start_agent_with_fn, Agent, UpdateHandler};
pub use server::{Subscribers, notify_subscribers};

/// Body of `POST /subscribe`: where the subscriber wants updates delivered,
/// as `host:port/path`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubscribeRequest {
    pub route: String,
}

/// Body pushed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdatePayload {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Runtime seam for delivering template changes.
pub trait TemplateNotifier: Send + Sync {
    fn notify(&self, files: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Notifier used when the agent server is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateNotifier for NoTemplates {
    fn notify(&self, _files: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}
