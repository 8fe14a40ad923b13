use crate::clipboard::ClipboardBackend;
use clipboard_x_protocol::CLIPBOARD_CHANGED;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Polls the clipboard and broadcasts [`CLIPBOARD_CHANGED`] whenever its
/// fingerprint moves.
pub struct Watcher {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Watcher {
    pub fn start(
        backend: Arc<dyn ClipboardBackend>,
        events: broadcast::Sender<String>,
        interval: Duration,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            info!("Clipboard watcher started, polling every {:?}", interval);
            let mut last = fingerprint(&backend).await;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let Some(current) = fingerprint(&backend).await else {
                            continue;
                        };
                        match last.replace(current) {
                            Some(previous) if previous != current => {
                                debug!("Clipboard changed");
                                if events.send(CLIPBOARD_CHANGED.to_string()).is_err() {
                                    debug!("No subscribers for clipboard change");
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            info!("Clipboard watcher stopped");
        });

        Self { shutdown, task }
    }

    /// Stops polling and waits for the poll task to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!("Clipboard watcher task failed: {}", e);
        }
    }
}

async fn fingerprint(backend: &Arc<dyn ClipboardBackend>) -> Option<u64> {
    let backend = backend.clone();
    match tokio::task::spawn_blocking(move || backend.fingerprint()).await {
        Ok(Ok(hash)) => Some(hash),
        Ok(Err(e)) => {
            warn!("Failed to fingerprint clipboard: {}", e);
            None
        }
        Err(e) => {
            warn!("Clipboard fingerprint task failed: {}", e);
            None
        }
    }
}
