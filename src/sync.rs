//! Realtime sync between surfaces.
//!
//! Messages are JSON text frames. The relay never inspects payloads: any
//! text frame arriving at the relay reaches the other clients as a bare
//! `UPDATE` ping, and they refetch state on their own. Full state pushes
//! only travel in-process. [`SyncChannel`] is the seam the engine publishes
//! through; [`InMemoryChannel`] serves single-process setups and tests,
//! [`RelayClient`] bridges to a relay server over a websocket.

use std::sync::Arc;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, instrument, warn};

use crate::store::{GameSession, GameSnapshot, Group, RoundState};

/// Base delay before the first reconnect attempt.
pub const RECONNECT_BASE_DELAY_MS: u64 = 2000;

/// Multiplier applied to the reconnect delay per failed attempt.
pub const RECONNECT_FACTOR: f64 = 1.5;

/// Reconnect attempts before the client gives up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Cap on the reassembly buffer for payloads split across text frames.
pub const FRAGMENT_BUFFER_LIMIT: usize = 50 * 1024;

/// A message on the sync channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelayMessage {
    /// Content-free ping: "something changed, refetch". The timestamp is
    /// informational; peers that omit it still parse.
    #[serde(rename = "UPDATE")]
    Update {
        /// Send time, unix milliseconds (0 when the sender omitted it).
        #[serde(default)]
        timestamp: i64,
    },
    /// Full session state push.
    #[serde(rename = "FULL_STATE_UPDATE", rename_all = "camelCase")]
    FullState {
        /// Session the payload belongs to.
        session_id: String,
        /// Session row.
        game_session: GameSession,
        /// All groups, in turn order.
        groups: Vec<Group>,
        /// Active group's round state, if any group is active.
        game_state: Option<RoundState>,
        /// Send time, unix milliseconds.
        timestamp: i64,
    },
}

impl RelayMessage {
    /// Builds a content-free update ping stamped with the current time.
    pub fn update() -> Self {
        Self::Update {
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Builds a full-state push from a snapshot, stamped with the current
    /// time.
    pub fn full_state(snapshot: &GameSnapshot) -> Self {
        Self::FullState {
            session_id: snapshot.session().id().clone(),
            game_session: snapshot.session().clone(),
            groups: snapshot.groups().clone(),
            game_state: snapshot.round_state().clone(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Session this message refers to, when it carries one.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Update { .. } => None,
            Self::FullState { session_id, .. } => Some(session_id),
        }
    }
}

/// Publish/subscribe seam between the engine and its surfaces.
pub trait SyncChannel: Send + Sync {
    /// Publishes a message to every subscriber of this channel, the
    /// notifier's own subscriptions included. Must not block; a channel with
    /// no listeners drops the message silently.
    fn notify(&self, message: RelayMessage);

    /// Opens a fresh subscription to incoming messages.
    fn subscribe(&self) -> broadcast::Receiver<RelayMessage>;
}

/// In-process fan-out over a tokio broadcast channel. Suitable when every
/// surface lives in one process, and for tests.
pub struct InMemoryChannel {
    sender: broadcast::Sender<RelayMessage>,
}

impl InMemoryChannel {
    /// Creates a channel buffering up to `capacity` undelivered messages per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SyncChannel for InMemoryChannel {
    fn notify(&self, message: RelayMessage) {
        // Err only means no live subscribers.
        let _ = self.sender.send(message);
    }

    fn subscribe(&self) -> broadcast::Receiver<RelayMessage> {
        self.sender.subscribe()
    }
}

/// Delay before reconnect attempt number `attempt` (zero-based):
/// 2s, 3s, 4.5s, ...
pub fn backoff_delay(attempt: u32) -> std::time::Duration {
    let ms = RECONNECT_BASE_DELAY_MS as f64 * RECONNECT_FACTOR.powi(attempt as i32);
    std::time::Duration::from_millis(ms as u64)
}

struct ClientShared {
    url: String,
    local: broadcast::Sender<RelayMessage>,
    outbound: mpsc::UnboundedSender<RelayMessage>,
}

/// Websocket bridge to a relay server.
///
/// Outbound notifications are queued and survive a reconnect; inbound frames
/// fan out to local subscribers. After every (re)connect the client sends a
/// synthetic `UPDATE` so peers refresh state they may have missed.
#[derive(Clone)]
pub struct RelayClient {
    shared: Arc<ClientShared>,
}

impl RelayClient {
    /// Creates the client and spawns its connection task.
    pub fn spawn(url: impl Into<String>) -> Self {
        let (local, _) = broadcast::channel(64);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(ClientShared {
            url: url.into(),
            local,
            outbound,
        });
        tokio::spawn(run_connection(Arc::clone(&shared), outbound_rx));
        Self { shared }
    }
}

impl SyncChannel for RelayClient {
    fn notify(&self, message: RelayMessage) {
        // Local surfaces hear the message immediately; the relay only serves
        // the other processes.
        let _ = self.shared.local.send(message.clone());
        if self.shared.outbound.send(message).is_err() {
            warn!("Relay connection task is gone, notification dropped");
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<RelayMessage> {
        self.shared.local.subscribe()
    }
}

#[instrument(skip_all, fields(url = %shared.url))]
async fn run_connection(
    shared: Arc<ClientShared>,
    mut outbound_rx: mpsc::UnboundedReceiver<RelayMessage>,
) {
    let mut attempt: u32 = 0;
    loop {
        match connect_async(shared.url.as_str()).await {
            Ok((socket, _)) => {
                info!("Connected to relay");
                attempt = 0;
                let (mut sink, mut stream) = socket.split();

                // Peers may have changed state while we were away. A failed
                // ping surfaces on the next read and falls into the backoff.
                if let Ok(text) = serde_json::to_string(&RelayMessage::update())
                    && sink.send(Message::Text(text.into())).await.is_err()
                {
                    warn!("Relay rejected the reconnect ping");
                }

                let mut fragments = String::new();
                loop {
                    tokio::select! {
                        outgoing = outbound_rx.recv() => {
                            let Some(message) = outgoing else {
                                debug!("All senders dropped, closing relay connection");
                                let _ = sink.send(Message::Close(None)).await;
                                return;
                            };
                            let text = match serde_json::to_string(&message) {
                                Ok(text) => text,
                                Err(e) => {
                                    warn!(error = %e, "Unserializable message dropped");
                                    continue;
                                }
                            };
                            if let Err(e) = sink.send(Message::Text(text.into())).await {
                                warn!(error = %e, "Relay send failed, reconnecting");
                                break;
                            }
                        }
                        incoming = stream.next() => {
                            match incoming {
                                Some(Ok(Message::Text(text))) => {
                                    handle_text(&shared, &mut fragments, text.as_str());
                                }
                                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                                Some(Ok(Message::Binary(_) | Message::Frame(_))) => {
                                    debug!("Non-text relay frame ignored");
                                }
                                Some(Ok(Message::Close(_))) | None => {
                                    warn!("Relay closed the connection");
                                    break;
                                }
                                Some(Err(e)) => {
                                    warn!(error = %e, "Relay read failed, reconnecting");
                                    break;
                                }
                            }
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Relay connection failed");
            }
        }

        if attempt >= MAX_RECONNECT_ATTEMPTS {
            error!(
                attempts = MAX_RECONNECT_ATTEMPTS,
                "Relay unreachable, giving up"
            );
            return;
        }
        let delay = backoff_delay(attempt);
        attempt += 1;
        info!(attempt, ?delay, "Reconnecting to relay");
        tokio::time::sleep(delay).await;
    }
}

/// Parses an inbound text frame, reassembling payloads the relay split
/// across frames. Anything unrecognized is logged and dropped.
fn handle_text(shared: &ClientShared, fragments: &mut String, text: &str) {
    let candidate: &str = if fragments.is_empty() {
        text
    } else {
        fragments.push_str(text);
        fragments.as_str()
    };

    match serde_json::from_str::<RelayMessage>(candidate) {
        Ok(message) => {
            fragments.clear();
            let _ = shared.local.send(message);
        }
        Err(e) if e.classify() == Category::Eof => {
            // Truncated JSON: keep buffering until the rest arrives.
            if fragments.is_empty() {
                fragments.push_str(text);
            }
            if fragments.len() > FRAGMENT_BUFFER_LIMIT {
                warn!(
                    bytes = fragments.len(),
                    "Oversized partial payload discarded"
                );
                fragments.clear();
            }
        }
        Err(e) => {
            warn!(error = %e, "Unparseable relay message dropped");
            fragments.clear();
        }
    }
}
