use crate::Result;
use async_trait::async_trait;
use clipboard_x_protocol::Command;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;

/// Request/response and event channel to a clipboard host.
#[async_trait]
pub trait Bridge: Send + Sync + 'static {
    /// Sends `cmd` with `args` and waits for the host's reply.
    async fn invoke(&self, cmd: Command, args: Value) -> Result<Value>;

    /// Receives the identifier of every event the host emits from now on.
    async fn subscribe(&self) -> Result<broadcast::Receiver<String>>;
}

/// Occurrences of one event on a bridge.
pub struct Subscription {
    rx: broadcast::Receiver<String>,
    event: &'static str,
}

impl Subscription {
    pub fn new(rx: broadcast::Receiver<String>, event: &'static str) -> Self {
        Self { rx, event }
    }

    /// Waits for the next occurrence. `None` once the bridge is gone.
    pub async fn next(&mut self) -> Option<()> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event == self.event => return Some(()),
                Ok(_) => continue,
                // Events carry no payload, so the missed ones collapse into one.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Missed {} events from clipboard host", skipped);
                    return Some(());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_other_events() {
        let (tx, rx) = broadcast::channel(8);
        let mut subscription = Subscription::new(rx, "wanted");

        tx.send("other".to_string()).unwrap();
        tx.send("wanted".to_string()).unwrap();
        drop(tx);

        assert_eq!(subscription.next().await, Some(()));
        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn lag_counts_as_one_occurrence() {
        let (tx, rx) = broadcast::channel(2);
        let mut subscription = Subscription::new(rx, "wanted");
        for _ in 0..5 {
            tx.send("wanted".to_string()).unwrap();
        }

        assert_eq!(subscription.next().await, Some(()));
    }
}
