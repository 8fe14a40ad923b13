use crate::clipboard::ClipboardBackend;
use crate::watcher::Watcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

const EVENT_CAPACITY: usize = 100;

/// Everything a connection needs to serve commands.
pub struct HostState {
    backend: Arc<dyn ClipboardBackend>,
    events: broadcast::Sender<String>,
    watcher: Mutex<Option<Watcher>>,
    image_dir: PathBuf,
    poll_interval: Duration,
}

impl HostState {
    pub fn new(
        backend: Arc<dyn ClipboardBackend>,
        image_dir: PathBuf,
        poll_interval: Duration,
    ) -> Arc<Self> {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            backend,
            events,
            watcher: Mutex::new(None),
            image_dir,
            poll_interval,
        })
    }

    pub fn backend(&self) -> Arc<dyn ClipboardBackend> {
        self.backend.clone()
    }

    /// Default directory clipboard images are materialized into.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.events.subscribe()
    }

    /// Starts the change watcher. Returns `false` if it was already running.
    pub async fn start_watching(&self) -> bool {
        let mut watcher = self.watcher.lock().await;
        if watcher.is_some() {
            return false;
        }
        *watcher = Some(Watcher::start(
            self.backend.clone(),
            self.events.clone(),
            self.poll_interval,
        ));
        true
    }

    /// Stops the change watcher. Returns `false` if it was not running.
    pub async fn stop_watching(&self) -> bool {
        let watcher = self.watcher.lock().await.take();
        match watcher {
            Some(watcher) => {
                watcher.stop().await;
                true
            }
            None => false,
        }
    }

    pub async fn is_watching(&self) -> bool {
        self.watcher.lock().await.is_some()
    }
}
