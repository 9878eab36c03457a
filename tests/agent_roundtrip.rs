// tests/agent_roundtrip.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use gob::agent::server::{self, notify_subscribers, Subscribers};
use gob::agent::{Agent, TemplateNotifier};

async fn start_server() -> (u16, Subscribers) {
    let subscribers = Subscribers::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(server::serve(listener, subscribers.clone()));
    (port, subscribers)
}

#[tokio::test]
async fn subscribe_endpoint_validates_method_and_body() {
    init_tracing();
    let (port, subscribers) = start_server().await;
    let url = format!("http://127.0.0.1:{port}/subscribe");
    let client = reqwest::Client::new();

    let get = client.get(&url).send().await.unwrap();
    assert_eq!(get.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    let garbage = client.post(&url).body("route=nope").send().await.unwrap();
    assert_eq!(garbage.status(), reqwest::StatusCode::BAD_REQUEST);

    let empty = client.post(&url).body(r#"{"route": ""}"#).send().await.unwrap();
    assert_eq!(empty.status(), reqwest::StatusCode::BAD_REQUEST);

    let ok = client
        .post(&url)
        .body(r#"{"route": "localhost:1234/update"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), reqwest::StatusCode::OK);

    // Subscribing twice keeps a single entry.
    client
        .post(&url)
        .body(r#"{"route": "localhost:1234/update"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(subscribers.routes().await, vec!["localhost:1234/update"]);
}

#[tokio::test]
async fn agent_receives_changed_templates() {
    init_tracing();
    let (server_port, subscribers) = start_server().await;

    let (files_tx, mut files_rx) = mpsc::unbounded_channel::<Vec<String>>();
    let agent = Agent::new(move |files| {
        let _ = files_tx.send(files);
    });
    let agent_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let agent_port = agent_listener.local_addr().unwrap().port();
    let app = agent.router();
    tokio::spawn(async move { axum::serve(agent_listener, app).await });

    agent.subscribe(server_port, agent_port).await.unwrap();
    assert_eq!(
        subscribers.routes().await,
        vec![format!("localhost:{agent_port}/update")]
    );

    let delivered = notify_subscribers(&subscribers, vec!["app/views/home.soy".to_string()]).await;
    assert_eq!(delivered, 1);

    let files = with_timeout(files_rx.recv()).await.unwrap();
    assert_eq!(files, vec!["app/views/home.soy"]);
}

#[tokio::test]
async fn unreachable_subscribers_are_skipped() {
    let (_port, subscribers) = start_server().await;
    // Nothing listens on a port we just released.
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_port = closed.local_addr().unwrap().port();
    drop(closed);
    subscribers.add(format!("127.0.0.1:{dead_port}/update")).await;

    assert_eq!(notify_subscribers(&subscribers, vec!["a.soy".into()]).await, 0);
    // The notifier seam never fails the runtime.
    subscribers.notify(vec!["b.soy".into()]).await.unwrap();
}

#[tokio::test]
async fn no_subscribers_delivers_nothing() {
    let subscribers = Subscribers::new();
    assert_eq!(notify_subscribers(&subscribers, vec!["x.soy".into()]).await, 0);
}
