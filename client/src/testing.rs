//! Scripted in-process host for unit tests.

use crate::bridge::Bridge;
use crate::{ClipboardClient, Error, Result};
use async_trait::async_trait;
use clipboard_x_protocol::Command;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

pub(crate) struct FakeHost {
    replies: Mutex<HashMap<Command, std::result::Result<Value, String>>>,
    delays: Mutex<HashMap<Command, Duration>>,
    invocations: Mutex<Vec<(Command, Value)>>,
    log: Arc<Mutex<Vec<String>>>,
    events: broadcast::Sender<String>,
    disconnected: AtomicBool,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        let (events, _rx) = broadcast::channel(16);
        Arc::new(Self {
            replies: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            invocations: Mutex::new(Vec::new()),
            log: Arc::new(Mutex::new(Vec::new())),
            events,
            disconnected: AtomicBool::new(false),
        })
    }

    pub fn client(self: &Arc<Self>) -> ClipboardClient {
        ClipboardClient::new(self.clone())
    }

    pub fn reply(&self, cmd: Command, value: Value) {
        self.replies.lock().unwrap().insert(cmd, Ok(value));
    }

    pub fn fail(&self, cmd: Command, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(cmd, Err(message.to_string()));
    }

    /// Holds every reply to `cmd` back for `delay`.
    pub fn delay(&self, cmd: Command, delay: Duration) {
        self.delays.lock().unwrap().insert(cmd, delay);
    }

    pub fn invocations(&self) -> Vec<(Command, Value)> {
        self.invocations.lock().unwrap().clone()
    }

    /// Identifier of every command received, in order. Tests may append
    /// their own markers to see how hooks interleave with commands.
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        self.log.clone()
    }

    pub fn emit(&self, event: &str) {
        let _ = self.events.send(event.to_string());
    }

    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    fn default_reply(cmd: Command) -> std::result::Result<Value, String> {
        match cmd {
            Command::HasText
            | Command::HasRtf
            | Command::HasHtml
            | Command::HasImage
            | Command::HasFiles => Ok(Value::Bool(false)),
            Command::StartListening
            | Command::StopListening
            | Command::WriteText
            | Command::WriteRtf
            | Command::WriteHtml
            | Command::WriteImage
            | Command::WriteFiles
            | Command::Clear => Ok(Value::Null),
            other => Err(format!("nothing scripted for {}", other)),
        }
    }
}

#[async_trait]
impl Bridge for FakeHost {
    async fn invoke(&self, cmd: Command, args: Value) -> Result<Value> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        self.log.lock().unwrap().push(cmd.to_string());
        self.invocations.lock().unwrap().push((cmd, args));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&cmd)
            .cloned()
            .unwrap_or_else(|| Self::default_reply(cmd));
        let delay = self.delays.lock().unwrap().get(&cmd).copied();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            // Let other tasks run, as a real round trip would.
            None => tokio::task::yield_now().await,
        }
        reply.map_err(Error::Host)
    }

    async fn subscribe(&self) -> Result<broadcast::Receiver<String>> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        Ok(self.events.subscribe())
    }
}
