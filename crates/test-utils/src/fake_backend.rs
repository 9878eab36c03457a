use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use gob::agent::TemplateNotifier;
use gob::errors::Result;
use gob::exec::ProcessBackend;

/// What the runtime asked a fake to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Restart,
    Shutdown,
    Templates(Vec<String>),
}

pub type Journal = Arc<Mutex<Vec<Recorded>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// A fake backend that records restarts and shutdowns instead of building
/// and running anything.
pub struct FakeBackend {
    journal: Journal,
}

impl FakeBackend {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl ProcessBackend for FakeBackend {
    fn restart(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let journal = Arc::clone(&self.journal);
        Box::pin(async move {
            journal.lock().unwrap().push(Recorded::Restart);
            Ok(())
        })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let journal = Arc::clone(&self.journal);
        Box::pin(async move {
            journal.lock().unwrap().push(Recorded::Shutdown);
            Ok(())
        })
    }
}

/// A fake template notifier writing to the same journal.
pub struct FakeNotifier {
    journal: Journal,
}

impl FakeNotifier {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl TemplateNotifier for FakeNotifier {
    fn notify(&self, files: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let journal = Arc::clone(&self.journal);
        Box::pin(async move {
            journal.lock().unwrap().push(Recorded::Templates(files));
            Ok(())
        })
    }
}

/// Snapshot of the journal.
pub fn recorded(journal: &Journal) -> Vec<Recorded> {
    journal.lock().unwrap().clone()
}
