// src/agent/server.rs

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::agent::{SubscribeRequest, TemplateNotifier, UpdatePayload};
use crate::errors::Result;

/// Registered template subscribers, shared between the HTTP handlers and
/// the runtime.
#[derive(Debug, Clone, Default)]
pub struct Subscribers {
    routes: Arc<RwLock<Vec<String>>>,
    client: reqwest::Client,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route`. Returns `false` if it was already registered.
    pub async fn add(&self, route: String) -> bool {
        let mut routes = self.routes.write().await;
        if routes.contains(&route) {
            return false;
        }
        routes.push(route);
        true
    }

    pub async fn routes(&self) -> Vec<String> {
        self.routes.read().await.clone()
    }
}

impl TemplateNotifier for Subscribers {
    fn notify(&self, files: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            notify_subscribers(self, files).await;
            Ok(())
        })
    }
}

/// HTTP routes of the template server.
pub fn router(subscribers: Subscribers) -> Router {
    Router::new()
        .route("/subscribe", post(subscribe))
        .with_state(subscribers)
}

async fn subscribe(State(subscribers): State<Subscribers>, body: Bytes) -> (StatusCode, String) {
    let request: SubscribeRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(err) => {
            debug!(error = %err, "malformed subscribe request");
            return (StatusCode::BAD_REQUEST, format!("invalid subscribe request: {err}"));
        }
    };

    let route = request.route.trim().to_string();
    if route.is_empty() {
        return (StatusCode::BAD_REQUEST, "missing route".to_string());
    }

    if subscribers.add(route.clone()).await {
        info!(%route, "template subscriber registered");
        println!("[gob] template subscriber registered: {route}");
    }
    (StatusCode::OK, "subscribed".to_string())
}

/// POST the changed files to every subscriber. Failures are logged.
///
/// Returns how many subscribers accepted the update.
pub async fn notify_subscribers(subscribers: &Subscribers, files: Vec<String>) -> usize {
    let routes = subscribers.routes().await;
    if routes.is_empty() {
        println!("[gob] templates changed, but no app has subscribed for updates");
        return 0;
    }

    let payload = UpdatePayload { files };
    let mut delivered = 0;
    for route in &routes {
        let url = format!("http://{route}");
        match subscribers.client.post(&url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(%url, "template update delivered");
                delivered += 1;
            }
            Ok(resp) => warn!(%url, status = %resp.status(), "subscriber rejected template update"),
            Err(err) => warn!(%url, error = %err, "failed to deliver template update"),
        }
    }
    delivered
}

/// Serve the template server on an already bound listener.
pub async fn serve(listener: TcpListener, subscribers: Subscribers) -> Result<()> {
    axum::serve(listener, router(subscribers))
        .await
        .context("template server stopped")?;
    Ok(())
}

/// Bind `127.0.0.1:port` and serve in the background.
pub async fn spawn(port: u16, subscribers: Subscribers) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("binding template server to port {port}"))?;
    let addr = listener.local_addr()?;
    info!(%addr, "template server listening");

    let handle = tokio::spawn(async move {
        if let Err(err) = serve(listener, subscribers).await {
            warn!(error = %err, "template server exited");
        }
    });
    Ok((addr, handle))
}
