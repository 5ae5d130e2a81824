//! Dumb websocket relay.
//!
//! The relay holds no game state and never parses payloads: any text frame
//! from one client turns into a content-free `{"type":"UPDATE"}` ping to
//! every other connected client, who re-read state from their own store (see
//! [`crate::sync`]). Clients that fall behind are disconnected rather than
//! buffered without bound.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::any;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Outbound frames buffered per client before it is dropped as too slow.
const CLIENT_QUEUE_LIMIT: usize = 256;

/// The only thing the relay ever says.
const UPDATE_FRAME: &str = r#"{"type":"UPDATE"}"#;

#[derive(Default)]
struct RelayState {
    next_id: AtomicU64,
    peers: Mutex<HashMap<u64, mpsc::Sender<Message>>>,
}

/// Builds the relay's router. Exposed separately from [`run_relay`] so tests
/// can serve it on an ephemeral port.
pub fn relay_router() -> Router {
    Router::new()
        .route("/", any(upgrade_handler))
        .with_state(Arc::new(RelayState::default()))
}

/// Runs the relay server until the process is stopped.
///
/// # Errors
///
/// Returns an error when the listen address cannot be bound.
#[instrument]
pub async fn run_relay(host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Relay listening");
    axum::serve(listener, relay_router()).await?;
    Ok(())
}

async fn upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RelayState>>,
) -> impl IntoResponse {
    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    ws.on_upgrade(move |socket| handle_socket(socket, id, state))
}

async fn handle_socket(socket: WebSocket, id: u64, state: Arc<RelayState>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(CLIENT_QUEUE_LIMIT);

    let peer_count = {
        let mut peers = state.peers.lock().unwrap();
        peers.insert(id, tx);
        peers.len()
    };
    info!(client = id, peers = peer_count, "Relay client connected");

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(_))) => {
                        fan_out(&state, id);
                    }
                    Some(Ok(Message::Binary(_))) => {
                        debug!(client = id, "Binary frame ignored");
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!(client = id, error = %e, "Relay client read failed");
                        break;
                    }
                }
            }
            _ = &mut writer => break,
        }
    }

    let remaining = {
        let mut peers = state.peers.lock().unwrap();
        peers.remove(&id);
        peers.len()
    };
    writer.abort();
    info!(client = id, peers = remaining, "Relay client disconnected");
}

/// Sends the update ping to every connected client except the sender, whose
/// own frame triggered it. Clients whose queue is full are dropped from the
/// peer table; their socket task shuts down once its receiver is gone.
fn fan_out(state: &RelayState, sender_id: u64) {
    let mut stale = Vec::new();
    {
        let peers = state.peers.lock().unwrap();
        for (&peer_id, tx) in peers.iter() {
            if peer_id == sender_id {
                continue;
            }
            if tx.try_send(Message::Text(UPDATE_FRAME.into())).is_err() {
                stale.push(peer_id);
            }
        }
    }
    if !stale.is_empty() {
        let mut peers = state.peers.lock().unwrap();
        for peer_id in stale {
            warn!(client = peer_id, "Slow relay client dropped");
            peers.remove(&peer_id);
        }
    }
}
