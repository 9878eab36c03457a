// tests/runtime_fake_backend.rs

mod common;
use crate::common::fake_backend::{journal, recorded, FakeBackend, FakeNotifier, Recorded};
use crate::common::init_tracing;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use gob::engine::{CoreRuntime, Runtime, RuntimeEvent};
use gob::watch::ChangeClassifier;

fn classifier() -> ChangeClassifier {
    ChangeClassifier::new(
        "/go/src",
        vec![".go".into()],
        vec![".soy".into()],
        vec![".css".into()],
        &[],
    )
    .unwrap()
}

fn changed(paths: &[&str]) -> RuntimeEvent {
    RuntimeEvent::FilesChanged {
        paths: paths.iter().map(PathBuf::from).collect(),
    }
}

#[tokio::test(start_paused = true)]
async fn initial_restart_changes_and_shutdown_reach_the_backend() {
    init_tracing();
    let log = journal();
    let (tx, rx) = mpsc::channel(16);

    let core = CoreRuntime::new(classifier(), Duration::from_secs(1), true);
    let runtime = Runtime::new(core, rx, FakeBackend::new(log.clone()), FakeNotifier::new(log.clone()))
        .with_tick(Duration::from_millis(100));
    let handle = tokio::spawn(runtime.run());

    tx.send(RuntimeEvent::RestartRequested).await.unwrap();
    sleep(Duration::from_millis(1_500)).await;

    tx.send(changed(&["/go/src/app/main.go", "/go/src/app/views/home.soy"]))
        .await
        .unwrap();
    sleep(Duration::from_millis(50)).await;

    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(
        recorded(&log),
        vec![
            Recorded::Restart,
            Recorded::Restart,
            Recorded::Templates(vec!["app/views/home.soy".to_string()]),
            Recorded::Shutdown,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn burst_inside_the_window_restarts_once_after_it() {
    let log = journal();
    let (tx, rx) = mpsc::channel(16);

    let core = CoreRuntime::new(classifier(), Duration::from_secs(1), false);
    let runtime = Runtime::new(core, rx, FakeBackend::new(log.clone()), FakeNotifier::new(log.clone()))
        .with_tick(Duration::from_millis(100));
    let handle = tokio::spawn(runtime.run());

    // Starts the window.
    tx.send(RuntimeEvent::RestartRequested).await.unwrap();
    for name in ["a.go", "b.go", "c.go"] {
        sleep(Duration::from_millis(200)).await;
        let path = format!("/go/src/app/{name}");
        tx.send(changed(&[path.as_str()])).await.unwrap();
    }
    assert_eq!(recorded(&log), vec![Recorded::Restart]);

    // The tick releases the held batch once the window has passed.
    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(recorded(&log), vec![Recorded::Restart, Recorded::Restart]);

    drop(tx);
    handle.await.unwrap().unwrap();
    assert_eq!(recorded(&log).last(), Some(&Recorded::Shutdown));
}

#[tokio::test(start_paused = true)]
async fn ignored_files_do_nothing() {
    let log = journal();
    let (tx, rx) = mpsc::channel(16);

    let core = CoreRuntime::new(classifier(), Duration::from_secs(1), true);
    let runtime = Runtime::new(core, rx, FakeBackend::new(log.clone()), FakeNotifier::new(log.clone()));
    let handle = tokio::spawn(runtime.run());

    tx.send(changed(&["/go/src/app/site.css", "/go/src/app/.hidden.go"]))
        .await
        .unwrap();
    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(recorded(&log), vec![Recorded::Shutdown]);
}
