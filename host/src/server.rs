use crate::commands::dispatch;
use crate::HostState;
use clipboard_x_protocol::{Command, Frame};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use warp::Filter;

/// The `/ws` route every client connects to.
pub fn routes(
    state: Arc<HostState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("ws")
        .and(warp::ws())
        .and(warp::any().map(move || state.clone()))
        .and_then(ws_handler)
}

/// Binds `addr` (port 0 picks a free one) and returns the bound address
/// with the server future.
pub fn bind(
    state: Arc<HostState>,
    addr: SocketAddr,
) -> Result<(SocketAddr, impl Future<Output = ()>), warp::Error> {
    warp::serve(routes(state)).try_bind_ephemeral(addr)
}

async fn ws_handler(
    ws: warp::ws::Ws,
    state: Arc<HostState>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(ws.on_upgrade(move |socket| handle_client(socket, state)))
}

async fn handle_client(ws: warp::ws::WebSocket, state: Arc<HostState>) {
    let client_id = uuid::Uuid::new_v4().to_string();
    info!("New client connected: {}", client_id);

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Frame>();

    // Subscribe before serving any command so a change caused by this
    // client's own write is not missed.
    let mut events = state.subscribe();

    let client_id_clone = client_id.clone();
    let ws_tx_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                frame = rx.recv() => match frame {
                    Some(frame) => frame,
                    None => break,
                },
                event = events.recv() => match event {
                    Ok(event) => Frame::event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Client {} lagged behind by {} events", client_id_clone, skipped);
                        Frame::event(clipboard_x_protocol::CLIPBOARD_CHANGED)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            match frame.to_text() {
                Ok(json) => {
                    if ws_tx.send(warp::ws::Message::text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Failed to encode frame: {}", e),
            }
        }
        info!("Client {} disconnected", client_id_clone);
    });

    while let Some(result) = ws_rx.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        let Ok(text) = msg.to_str() else {
            continue;
        };

        match Frame::from_text(text) {
            Ok(Frame::Invoke { id, cmd, args }) => {
                let state = state.clone();
                let tx = tx.clone();
                // Commands run concurrently; replies are matched by id.
                tokio::spawn(async move {
                    let outcome = match Command::from_identifier(&cmd) {
                        Some(cmd) => dispatch(&state, cmd, args).await,
                        None => Err(format!("unknown command: {}", cmd)),
                    };
                    let _ = tx.send(Frame::reply(id, outcome));
                });
            }
            Ok(other) => debug!("Ignoring unexpected frame from {}: {:?}", client_id, other),
            Err(e) => warn!("Malformed frame from {}: {}", client_id, e),
        }
    }

    ws_tx_task.abort();
}
