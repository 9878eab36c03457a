// src/agent/client.rs

//! Helper for templated apps that want to be told when gob sees their
//! template files change.
//!
//! ```no_run
//! # async fn demo() -> gob::errors::Result<()> {
//! gob::agent::start_agent_with_fn(9035, 9034, |files| {
//!     println!("recompile {files:?}");
//! })
//! .await
//! # }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::agent::{SubscribeRequest, UpdatePayload};
use crate::errors::Result;

/// Called with the changed template files, relative to the source root.
pub type UpdateHandler = Arc<dyn Fn(Vec<String>) + Send + Sync>;

#[derive(Clone)]
pub struct Agent {
    handler: UpdateHandler,
    client: reqwest::Client,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent").finish_non_exhaustive()
    }
}

impl Agent {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            client: reqwest::Client::new(),
        }
    }

    /// `POST /update` receives `{"files": [...]}`.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/update", post(update))
            .with_state(Arc::clone(&self.handler))
    }

    /// Register `localhost:<own_port>/update` with the server on
    /// `localhost:<server_port>`.
    pub async fn subscribe(&self, server_port: u16, own_port: u16) -> Result<()> {
        let url = format!("http://localhost:{server_port}/subscribe");
        let request = SubscribeRequest {
            route: format!("localhost:{own_port}/update"),
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("subscribing to {url}"))?;
        resp.error_for_status()
            .with_context(|| format!("server at {url} refused the subscription"))?;

        info!(%url, route = %request.route, "subscribed for template updates");
        Ok(())
    }

    /// Serve updates on `listener` and subscribe once it is accepting
    /// connections. Runs until the server stops.
    pub async fn serve(self, listener: TcpListener, server_port: u16) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        let app = self.router();
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        self.subscribe(server_port, addr.port()).await?;

        server
            .await
            .context("agent server task failed")?
            .context("agent server stopped")?;
        Ok(())
    }
}

async fn update(State(handler): State<UpdateHandler>, body: Bytes) -> (StatusCode, &'static str) {
    let payload: UpdatePayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(err) => {
            debug!(error = %err, "malformed update");
            return (StatusCode::BAD_REQUEST, "invalid update");
        }
    };
    debug!(files = payload.files.len(), "template update received");
    handler(payload.files);
    (StatusCode::OK, "ok")
}

/// Listen on `127.0.0.1:<agent_port>`, subscribe to the gob server on
/// `server_port` and call `handler` for every update.
pub async fn start_agent_with_fn<F>(agent_port: u16, server_port: u16, handler: F) -> Result<()>
where
    F: Fn(Vec<String>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind(("127.0.0.1", agent_port))
        .await
        .with_context(|| format!("binding agent to port {agent_port}"))?;
    Agent::new(handler).serve(listener, server_port).await
}
