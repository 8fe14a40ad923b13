use crate::bridge::Subscription;
use crate::{ClipboardClient, ReadClipboard, Result};
use clipboard_x_protocol::CLIPBOARD_CHANGED;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Hook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Default)]
pub struct ClipboardChangeOptions {
    before_read: Option<Hook>,
}

impl ClipboardChangeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook that will be called before reading clipboard content.
    pub fn before_read(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.before_read = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ClipboardChangeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardChangeOptions")
            .field("before_read", &self.before_read.is_some())
            .finish()
    }
}

/// Handle of a change subscription. Unsubscribes when
/// [`unlisten`](Self::unlisten) is called or the handle is dropped.
#[must_use = "dropping the handle unsubscribes immediately"]
pub struct Unlisten {
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Unlisten {
    pub fn unlisten(self) {}

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) && !self.task.is_finished()
    }
}

impl Drop for Unlisten {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.task.abort();
    }
}

impl ClipboardClient {
    /// Listen to clipboard changes.
    ///
    /// Every change notification runs the `before_read` hook, then a full
    /// [`read_clipboard`](Self::read_clipboard), then `callback` with the
    /// result. Each notification gets its own read, so reads triggered in
    /// quick succession may overlap and finish out of order. A read that
    /// fails is logged and skipped.
    ///
    /// The host only emits changes after
    /// [`start_listening`](Self::start_listening).
    pub async fn on_clipboard_change<F>(
        &self,
        callback: F,
        options: ClipboardChangeOptions,
    ) -> Result<Unlisten>
    where
        F: Fn(ReadClipboard) + Send + Sync + 'static,
    {
        let mut changes = Subscription::new(self.bridge.subscribe().await?, CLIPBOARD_CHANGED);
        let active = Arc::new(AtomicBool::new(true));
        let callback = Arc::new(callback);

        let client = self.clone();
        let task_active = active.clone();
        let task = tokio::spawn(async move {
            while changes.next().await.is_some() {
                if !task_active.load(Ordering::SeqCst) {
                    break;
                }
                if let Some(before_read) = &options.before_read {
                    before_read();
                }

                let client = client.clone();
                let callback = callback.clone();
                let active = task_active.clone();
                tokio::spawn(async move {
                    match client.read_clipboard().await {
                        Ok(result) if active.load(Ordering::SeqCst) => callback(result),
                        Ok(_) => debug!("Dropping clipboard read finished after unlisten"),
                        Err(e) => warn!("Failed to read clipboard after change: {}", e),
                    }
                });
            }
            debug!("Clipboard change subscription ended");
        });

        Ok(Unlisten { active, task })
    }
}
