use crate::bridge::Bridge;
use crate::{Error, Result};
use async_trait::async_trait;
use clipboard_x_protocol::{Command, Frame};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

const EVENT_CAPACITY: usize = 100;

type Reply = std::result::Result<Value, String>;

/// State that lives exactly as long as the connection.
struct Connection {
    /// Requests waiting for a reply, by id.
    pending: HashMap<u64, oneshot::Sender<Reply>>,
    events: broadcast::Sender<String>,
}

/// `None` once the connection is gone.
type Shared = Arc<Mutex<Option<Connection>>>;

/// [`Bridge`] to a host over one WebSocket connection.
///
/// Requests are multiplexed by id, so any number of commands may be in
/// flight at once.
pub struct WsBridge {
    outgoing: mpsc::UnboundedSender<Message>,
    shared: Shared,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl WsBridge {
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        let (socket, _) = connect_async(url.clone()).await?;
        info!("Connected to clipboard host at {}", url);

        let (mut ws_tx, mut ws_rx) = socket.split();
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<Message>();
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        let shared: Shared = Arc::new(Mutex::new(Some(Connection {
            pending: HashMap::new(),
            events,
        })));

        let writer = tokio::spawn(async move {
            while let Some(msg) = outgoing_rx.recv().await {
                if let Err(e) = ws_tx.send(msg).await {
                    warn!("Failed to send to clipboard host: {}", e);
                    break;
                }
            }
        });

        let reader_shared = shared.clone();
        let reader = tokio::spawn(async move {
            while let Some(result) = ws_rx.next().await {
                let text = match result {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("Connection to clipboard host failed: {}", e);
                        break;
                    }
                };

                match Frame::from_text(&text) {
                    Ok(Frame::Event { event, .. }) => {
                        debug!("Host event {}", event);
                        if let Some(connection) = reader_shared.lock().await.as_ref() {
                            let _ = connection.events.send(event);
                        }
                    }
                    Ok(frame) => match frame.into_reply() {
                        Some((id, outcome)) => {
                            let waiter = reader_shared
                                .lock()
                                .await
                                .as_mut()
                                .and_then(|connection| connection.pending.remove(&id));
                            match waiter {
                                Some(waiter) => {
                                    let _ = waiter.send(outcome);
                                }
                                None => debug!("Reply for unknown request #{}", id),
                            }
                        }
                        None => debug!("Ignoring frame sent by host: {}", text),
                    },
                    Err(e) => warn!("Malformed frame from clipboard host: {}", e),
                }
            }

            // Fails every request still waiting and ends every subscription.
            reader_shared.lock().await.take();
            info!("Clipboard host connection closed");
        });

        Ok(Self {
            outgoing,
            shared,
            next_id: AtomicU64::new(1),
            reader,
            writer,
        })
    }
}

#[async_trait]
impl Bridge for WsBridge {
    async fn invoke(&self, cmd: Command, args: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        match self.shared.lock().await.as_mut() {
            Some(connection) => {
                connection.pending.insert(id, tx);
            }
            None => return Err(Error::Closed),
        }

        let text = Frame::invoke(id, cmd, args).to_text()?;
        if self.outgoing.send(Message::Text(text)).is_err() {
            if let Some(connection) = self.shared.lock().await.as_mut() {
                connection.pending.remove(&id);
            }
            return Err(Error::Closed);
        }
        debug!("Sent {} (#{})", cmd, id);

        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(Error::Host(message)),
            Err(_) => Err(Error::Closed),
        }
    }

    async fn subscribe(&self) -> Result<broadcast::Receiver<String>> {
        match self.shared.lock().await.as_ref() {
            Some(connection) => Ok(connection.events.subscribe()),
            None => Err(Error::Closed),
        }
    }
}

impl Drop for WsBridge {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}
