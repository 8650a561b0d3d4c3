//! Integration tests for the async client loop.
//!
//! The service side is a `ChannelService`: each test reads the requests
//! the client made from its receiver and answers through the
//! `ServiceSender`, the way a real SDK adapter would.

use std::time::Duration;

use roomdeck::prelude::*;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

struct Harness {
    client: ClientHandle,
    callbacks: ServiceSender,
    calls: mpsc::UnboundedReceiver<ServiceCall>,
    events: mpsc::UnboundedReceiver<ClientEvent>,
}

fn harness() -> Harness {
    let (service, calls) = ChannelService::new();
    let (client, callbacks, events) = spawn_client(service, NoViews, ClientConfig::default());
    Harness {
        client,
        callbacks,
        calls,
        events,
    }
}

async fn next_call(h: &mut Harness) -> ServiceCall {
    tokio::time::timeout(Duration::from_secs(1), h.calls.recv())
        .await
        .expect("timed out waiting for a service call")
        .expect("service channel closed")
}

/// Delivers `event` tagged with `generation` and waits until it was handled.
async fn answer(h: &Harness, generation: Generation, event: ServiceEvent) {
    h.callbacks
        .deliver(Inbound::new(generation, event))
        .await
        .expect("client running");
    h.client.snapshot().await.expect("client running");
}

/// Everything emitted so far.
fn drain(h: &mut Harness) -> Vec<ClientEvent> {
    let mut out = Vec::new();
    while let Ok(event) = h.events.try_recv() {
        out.push(event);
    }
    out
}

async fn reach_lobby(h: &mut Harness) -> Generation {
    assert!(h.client.connect().await.expect("client running"));
    let ServiceCall::Connect { generation, .. } = next_call(h).await else {
        panic!("expected connect");
    };
    answer(h, generation, ServiceEvent::ConnectedToMaster).await;
    assert_eq!(next_call(h).await, ServiceCall::JoinLobby { generation });
    answer(h, generation, ServiceEvent::JoinedLobby).await;
    assert!(matches!(next_call(h).await, ServiceCall::SetNickname(_)));
    generation
}

fn room(name: &str, region: &str) -> RoomUpdate {
    RoomUpdate::upsert(RoomRecord::new(name, 4).with_region(region))
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_client_connects_and_reaches_lobby() {
    let mut h = harness();

    reach_lobby(&mut h).await;

    let snapshot = h.client.snapshot().await.unwrap();
    assert_eq!(snapshot.state, ConnectionState::InLobby);
    assert!(snapshot.nickname.is_some());
    let events = drain(&mut h);
    assert!(events.iter().any(|e| matches!(e, ClientEvent::NicknameAssigned(_))));
}

#[tokio::test]
async fn test_client_second_connect_is_noop() {
    let mut h = harness();

    assert!(h.client.connect().await.unwrap());
    assert!(!h.client.connect().await.unwrap());

    assert!(matches!(next_call(&mut h).await, ServiceCall::Connect { .. }));
    h.client.snapshot().await.unwrap();
    assert!(h.calls.try_recv().is_err(), "only one connect reached the service");
}

#[tokio::test]
async fn test_client_room_list_reaches_event_stream() {
    let mut h = harness();
    let generation = reach_lobby(&mut h).await;
    drain(&mut h);

    answer(
        &h,
        generation,
        ServiceEvent::RoomListUpdate {
            rooms: vec![room("A", "eu"), room("B", "eu")],
        },
    )
    .await;
    answer(
        &h,
        generation,
        ServiceEvent::RoomListUpdate {
            rooms: vec![RoomUpdate::removal("A")],
        },
    )
    .await;

    let events = drain(&mut h);
    assert_eq!(
        events,
        vec![
            ClientEvent::RoomAdded(RoomRecord::new("A", 4).with_region("eu")),
            ClientEvent::RoomAdded(RoomRecord::new("B", 4).with_region("eu")),
            ClientEvent::RoomRemoved("A".into()),
        ]
    );
    let names: Vec<String> = h
        .client
        .snapshot()
        .await
        .unwrap()
        .rooms
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["B".to_string()]);
}

#[tokio::test]
async fn test_client_create_room_empty_name_is_rejected() {
    let mut h = harness();
    reach_lobby(&mut h).await;

    let result = h.client.create_room("", 4, true, "eu").await;

    assert!(matches!(
        result,
        Err(RoomdeckError::Validation(ValidationError::EmptyName))
    ));
    h.client.snapshot().await.unwrap();
    assert!(h.calls.try_recv().is_err());
}

#[tokio::test]
async fn test_client_create_before_connect_is_queued_until_lobby() {
    let mut h = harness();

    h.client.create_room("A", 4, true, "eu").await.unwrap();
    let ServiceCall::Connect { generation, .. } = next_call(&mut h).await else {
        panic!("expected connect");
    };
    answer(&h, generation, ServiceEvent::ConnectedToMaster).await;
    next_call(&mut h).await; // join lobby
    answer(&h, generation, ServiceEvent::JoinedLobby).await;
    next_call(&mut h).await; // nickname

    let ServiceCall::CreateOrJoinRoom { name, options, .. } = next_call(&mut h).await else {
        panic!("expected create");
    };
    assert_eq!(name, "A");
    assert_eq!(options.region(), Some("eu"));
    assert_eq!(
        h.client.snapshot().await.unwrap().state,
        ConnectionState::JoiningRoom
    );
}

#[tokio::test]
async fn test_client_refresh_new_region_drops_stale_callbacks() {
    let mut h = harness();
    let old = reach_lobby(&mut h).await;
    answer(
        &h,
        old,
        ServiceEvent::RoomListUpdate {
            rooms: vec![room("A", "eu")],
        },
    )
    .await;

    h.client.refresh("us").await.unwrap();

    assert_eq!(next_call(&mut h).await, ServiceCall::Disconnect);
    let ServiceCall::Connect { region, generation } = next_call(&mut h).await else {
        panic!("expected connect");
    };
    assert_eq!(region, "us");
    assert_ne!(generation, old);

    // The old connection's room list arrives late and is ignored.
    answer(
        &h,
        old,
        ServiceEvent::RoomListUpdate {
            rooms: vec![room("Z", "eu")],
        },
    )
    .await;

    let snapshot = h.client.snapshot().await.unwrap();
    assert_eq!(snapshot.state, ConnectionState::Connecting);
    assert_eq!(snapshot.region, "us");
    assert!(snapshot.rooms.is_empty());
}

#[tokio::test]
async fn test_client_join_and_master_handoff() {
    let mut h = harness();
    let generation = reach_lobby(&mut h).await;
    answer(
        &h,
        generation,
        ServiceEvent::RoomListUpdate {
            rooms: vec![room("A", "eu")],
        },
    )
    .await;
    assert!(h.client.select_room("A").await.unwrap());
    assert!(h.client.join_selected().await.unwrap());
    assert!(matches!(next_call(&mut h).await, ServiceCall::JoinRoom { .. }));

    answer(
        &h,
        generation,
        ServiceEvent::JoinedRoom {
            room: RoomSnapshot {
                name: "A".into(),
                max_players: 4,
                players: vec![Player::new(1, "host"), Player::new(2, "me")],
                master: ActorNumber(1),
                local: ActorNumber(2),
            },
        },
    )
    .await;
    answer(
        &h,
        generation,
        ServiceEvent::MasterClientSwitched {
            master: ActorNumber(2),
        },
    )
    .await;

    let snapshot = h.client.snapshot().await.unwrap();
    assert_eq!(snapshot.state, ConnectionState::InRoom);
    assert!(snapshot.presence.expect("in room").is_master_client());
    let events = drain(&mut h);
    assert!(events.contains(&ClientEvent::EnterRoom {
        room: "A".into(),
        scene: "Lobby Scene".into(),
    }));
    assert_eq!(
        events.last(),
        Some(&ClientEvent::MasterClientChanged {
            master: ActorNumber(2),
            is_local: true,
        })
    );
}

#[tokio::test]
async fn test_client_deliver_encoded_json() {
    let mut h = harness();
    let generation = reach_lobby(&mut h).await;
    drain(&mut h);

    let bytes = serde_json::to_vec(&serde_json::json!({
        "generation": generation.0,
        "event": {
            "type": "RoomListUpdate",
            "rooms": [{
                "record": {
                    "name": "A",
                    "player_count": 1,
                    "max_players": 4,
                    "visible": true
                }
            }]
        }
    }))
    .unwrap();

    h.callbacks.deliver_encoded(&JsonCodec, &bytes).await.unwrap();
    h.client.snapshot().await.unwrap();

    assert!(matches!(
        drain(&mut h).as_slice(),
        [ClientEvent::RoomAdded(r)] if r.name == "A" && r.player_count == 1
    ));

    let garbage = h.callbacks.deliver_encoded(&JsonCodec, b"{").await;
    assert!(matches!(garbage, Err(RoomdeckError::Protocol(_))));
}

#[tokio::test]
async fn test_client_shutdown_closes_handles() {
    let h = harness();

    h.client.shutdown().await.unwrap();

    // The queue is drained and dropped once the loop exits.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(matches!(
        h.client.connect().await,
        Err(RoomdeckError::ClientClosed)
    ));
}
