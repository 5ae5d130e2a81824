//! Tests for sync messages, the in-memory channel, and the relay.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use word_tree::{
    GameStore, InMemoryChannel, RelayClient, RelayMessage, SyncChannel, backoff_delay,
};

#[test]
fn test_update_wire_shape() {
    let value = serde_json::to_value(RelayMessage::update()).expect("Encode failed");
    assert_eq!(value["type"], "UPDATE");
    assert!(value["timestamp"].is_i64());

    // Peers that send a bare ping without a timestamp still parse.
    let decoded: RelayMessage =
        serde_json::from_str(r#"{"type":"UPDATE"}"#).expect("Decode failed");
    assert_eq!(decoded, RelayMessage::Update { timestamp: 0 });
}

#[test]
fn test_full_state_wire_shape() {
    let store = GameStore::open_in_memory().expect("Failed to open store");
    let snapshot = store
        .create_game(&["Reds".to_string(), "Blues".to_string()])
        .expect("Create failed");

    let message = RelayMessage::full_state(&snapshot);
    let value = serde_json::to_value(&message).expect("Encode failed");

    // Top-level keys are camelCase; row fields stay snake_case.
    assert_eq!(value["type"], "FULL_STATE_UPDATE");
    assert_eq!(value["sessionId"], *snapshot.session().id());
    assert_eq!(value["gameSession"]["current_round"], 1);
    assert_eq!(value["groups"].as_array().map(Vec::len), Some(2));
    assert!(value["gameState"]["guesses"].is_array());
    assert!(value["timestamp"].is_i64());

    let decoded: RelayMessage = serde_json::from_value(value).expect("Decode failed");
    assert_eq!(decoded, message);
}

#[test]
fn test_full_state_accepts_encoded_guesses() {
    // Peers written against the raw database rows send guesses as the stored
    // JSON string rather than a structured array.
    let raw = r#"{
        "type": "FULL_STATE_UPDATE",
        "sessionId": "s1",
        "gameSession": {
            "id": "s1",
            "current_round": 2,
            "current_group_id": "g1",
            "updated_at": "2026-08-20T12:00:00"
        },
        "groups": [
            {"id": "g1", "session_id": "s1", "name": "Reds", "score": 100, "turn_order": 1}
        ],
        "gameState": {
            "id": "st1",
            "session_id": "s1",
            "group_id": "g1",
            "current_word": "STONE",
            "current_word_id": "w1",
            "timer_active": true,
            "timer_started_at": "2026-08-20T12:00:10",
            "attempts_used": 1,
            "guesses": "[{\"word\":\"TREES\",\"results\":[{\"letter\":\"T\",\"status\":\"absent\"},{\"letter\":\"R\",\"status\":\"absent\"},{\"letter\":\"E\",\"status\":\"present\"},{\"letter\":\"E\",\"status\":\"absent\"},{\"letter\":\"S\",\"status\":\"present\"}]}]",
            "updated_at": "2026-08-20T12:00:10"
        },
        "timestamp": 1755691210000
    }"#;

    let decoded: RelayMessage = serde_json::from_str(raw).expect("Decode failed");
    let RelayMessage::FullState {
        session_id,
        game_state,
        ..
    } = decoded
    else {
        panic!("Expected a full state push");
    };
    assert_eq!(session_id, "s1");
    let state = game_state.expect("Should carry state");
    assert_eq!(state.guesses().len(), 1);
    assert_eq!(state.guesses()[0].word(), "TREES");
}

#[test]
fn test_backoff_schedule() {
    assert_eq!(backoff_delay(0), Duration::from_millis(2000));
    assert_eq!(backoff_delay(1), Duration::from_millis(3000));
    assert_eq!(backoff_delay(2), Duration::from_millis(4500));
    for attempt in 1..10 {
        assert!(backoff_delay(attempt) > backoff_delay(attempt - 1));
    }
}

#[tokio::test]
async fn test_in_memory_channel_fans_out() {
    let channel = InMemoryChannel::default();
    let mut first = channel.subscribe();
    let mut second = channel.subscribe();

    let message = RelayMessage::update();
    channel.notify(message.clone());

    assert_eq!(first.recv().await.expect("Recv failed"), message);
    assert_eq!(second.recv().await.expect("Recv failed"), message);
}

async fn spawn_relay() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Bind failed");
    let addr = listener.local_addr().expect("No local addr");
    tokio::spawn(async move {
        axum::serve(listener, word_tree::relay_router())
            .await
            .expect("Relay crashed");
    });
    format!("ws://{addr}")
}

#[tokio::test]
async fn test_relay_forwards_to_every_other_client() {
    let url = spawn_relay().await;

    let (mut alice, _) = connect_async(&url).await.expect("Connect failed");
    let (mut bob, _) = connect_async(&url).await.expect("Connect failed");
    let (mut carol, _) = connect_async(&url).await.expect("Connect failed");

    alice
        .send(Message::text(r#"{"type":"UPDATE"}"#))
        .await
        .expect("Send failed");

    for peer in [&mut bob, &mut carol] {
        let frame = timeout(Duration::from_secs(2), peer.next())
            .await
            .expect("Timed out waiting for relay")
            .expect("Stream ended")
            .expect("Read failed");
        assert_eq!(frame.into_text().expect("Not text").as_str(), r#"{"type":"UPDATE"}"#);
    }

    // The sender never hears its own message back.
    assert!(
        timeout(Duration::from_millis(300), alice.next()).await.is_err(),
        "Relay echoed to the sender"
    );
}

#[tokio::test]
async fn test_relay_survives_client_disconnect() {
    let url = spawn_relay().await;

    let (alice, _) = connect_async(&url).await.expect("Connect failed");
    let (mut bob, _) = connect_async(&url).await.expect("Connect failed");
    drop(alice);

    let (mut carol, _) = connect_async(&url).await.expect("Connect failed");
    carol
        .send(Message::text(r#"{"type":"UPDATE"}"#))
        .await
        .expect("Send failed");

    let frame = timeout(Duration::from_secs(2), bob.next())
        .await
        .expect("Timed out waiting for relay")
        .expect("Stream ended")
        .expect("Read failed");
    assert_eq!(frame.into_text().expect("Not text").as_str(), r#"{"type":"UPDATE"}"#);
}

#[tokio::test]
async fn test_relay_collapses_payloads_to_update_pings() {
    // The relay never forwards content; clients re-read state on the ping.
    let url = spawn_relay().await;

    let (mut alice, _) = connect_async(&url).await.expect("Connect failed");
    let (mut bob, _) = connect_async(&url).await.expect("Connect failed");

    let payload = r#"{"type":"FULL_STATE_UPDATE","sessionId":"s1","gameSession":null,"groups":[],"gameState":null,"timestamp":1}"#;
    alice
        .send(Message::text(payload))
        .await
        .expect("Send failed");

    let frame = timeout(Duration::from_secs(2), bob.next())
        .await
        .expect("Timed out waiting for relay")
        .expect("Stream ended")
        .expect("Read failed");
    assert_eq!(frame.into_text().expect("Not text").as_str(), r#"{"type":"UPDATE"}"#);
}

#[tokio::test]
async fn test_relay_client_bridges_both_directions() {
    let url = spawn_relay().await;

    let client = RelayClient::spawn(url.clone());
    let mut local = client.subscribe();

    let (mut peer, _) = connect_async(&url).await.expect("Connect failed");

    // The client announces itself with an UPDATE after connecting.
    let frame = timeout(Duration::from_secs(5), peer.next())
        .await
        .expect("Timed out waiting for the reconnect ping")
        .expect("Stream ended")
        .expect("Read failed");
    assert!(matches!(
        serde_json::from_str::<RelayMessage>(frame.into_text().expect("Not text").as_str())
            .expect("Decode failed"),
        RelayMessage::Update { .. }
    ));

    // Outbound: notify reaches the peer through the relay, collapsed to the
    // content-free ping.
    let outbound = RelayMessage::update();
    client.notify(outbound.clone());
    let frame = timeout(Duration::from_secs(2), peer.next())
        .await
        .expect("Timed out waiting for the notification")
        .expect("Stream ended")
        .expect("Read failed");
    assert_eq!(
        serde_json::from_str::<RelayMessage>(frame.into_text().expect("Not text").as_str())
            .expect("Decode failed"),
        RelayMessage::Update { timestamp: 0 }
    );

    // Local subscribers hear the notification without the network round trip.
    assert_eq!(
        timeout(Duration::from_secs(2), local.recv())
            .await
            .expect("Timed out")
            .expect("Recv failed"),
        outbound
    );

    // Inbound: a peer's message fans out to local subscribers.
    peer.send(Message::text(r#"{"type":"UPDATE"}"#))
        .await
        .expect("Send failed");
    assert_eq!(
        timeout(Duration::from_secs(2), local.recv())
            .await
            .expect("Timed out")
            .expect("Recv failed"),
        RelayMessage::Update { timestamp: 0 }
    );
}

#[tokio::test]
async fn test_relay_client_is_a_sync_channel() {
    // The engine takes the channel as a trait object; make sure both
    // implementations coerce.
    let channels: Vec<Arc<dyn SyncChannel>> = vec![
        Arc::new(InMemoryChannel::default()),
        Arc::new(RelayClient::spawn("ws://127.0.0.1:1".to_string())),
    ];
    for channel in channels {
        let _rx = channel.subscribe();
        channel.notify(RelayMessage::update());
    }
}
