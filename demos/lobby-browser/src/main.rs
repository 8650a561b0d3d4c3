//! A headless lobby browser against a scripted matchmaking server.
//!
//! The "server" is a task that answers the client's requests with JSON
//! callbacks, the way a relay for a real matchmaking SDK would. Run with
//! `RUST_LOG=debug` to watch reconciliation and dropped callbacks.

use std::collections::BTreeMap;

use roomdeck::prelude::*;
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

// ---------------------------------------------------------------------------
// Room rows
// ---------------------------------------------------------------------------

/// Renders each room as a text row.
struct Rows;

impl ViewFactory for Rows {
    type View = String;

    fn create(&mut self, record: &RoomRecord) -> String {
        let row = render(record);
        println!("  + {row}");
        row
    }

    fn update(&mut self, view: &mut String, record: &RoomRecord) {
        *view = render(record);
        println!("  ~ {view}");
    }

    fn release(&mut self, view: String) {
        println!("  - {view}");
    }
}

fn render(record: &RoomRecord) -> String {
    format!(
        "{:<10} {}/{} [{}]",
        record.name,
        record.player_count,
        record.max_players,
        record.region().unwrap_or("?")
    )
}

// ---------------------------------------------------------------------------
// Scripted server
// ---------------------------------------------------------------------------

fn listing() -> BTreeMap<&'static str, Vec<Value>> {
    let room = |name: &str, players: u32, max: u32, region: &str| {
        json!({ "record": {
            "name": name,
            "player_count": players,
            "max_players": max,
            "visible": true,
            "properties": { "Region": region },
        }})
    };
    BTreeMap::from([
        (
            "eu",
            vec![
                room("Castle", 1, 4, "eu"),
                room("Harbor", 3, 8, "eu"),
                room("Placeholder", 0, 0, "eu"),
            ],
        ),
        ("us", vec![room("Canyon", 2, 4, "us")]),
    ])
}

/// Answers requests until the client goes away.
async fn serve(mut calls: UnboundedReceiver<ServiceCall>, callbacks: ServiceSender) {
    let listing = listing();
    let mut region = String::new();
    let mut nickname = String::from("anonymous");

    while let Some(call) = calls.recv().await {
        let replies: Vec<(Generation, Value)> = match call {
            ServiceCall::Connect {
                region: requested,
                generation,
            } => {
                region = requested;
                vec![(generation, json!({ "type": "ConnectedToMaster" }))]
            }
            ServiceCall::JoinLobby { generation } => {
                let rooms = listing.get(region.as_str()).cloned().unwrap_or_default();
                vec![
                    (generation, json!({ "type": "JoinedLobby" })),
                    (generation, json!({ "type": "RoomListUpdate", "rooms": rooms })),
                ]
            }
            ServiceCall::CreateOrJoinRoom {
                name,
                options,
                generation,
            } => vec![(
                generation,
                json!({ "type": "JoinedRoom", "room": {
                    "name": name,
                    "max_players": options.max_players,
                    "players": [{ "actor": 1, "nickname": nickname }],
                    "master": 1,
                    "local": 1,
                }}),
            )],
            ServiceCall::JoinRoom { name, generation } if name == "Castle" => vec![
                (
                    generation,
                    json!({ "type": "JoinedRoom", "room": {
                        "name": name,
                        "max_players": 4,
                        "players": [
                            { "actor": 1, "nickname": "host" },
                            { "actor": 2, "nickname": nickname },
                        ],
                        "master": 1,
                        "local": 2,
                    }}),
                ),
                (generation, json!({ "type": "PlayerLeft", "actor": 1 })),
                (generation, json!({ "type": "MasterClientSwitched", "master": 2 })),
            ],
            ServiceCall::JoinRoom { generation, .. } => vec![(
                generation,
                json!({ "type": "JoinFailed", "code": 32758, "message": "Game does not exist" }),
            )],
            ServiceCall::LeaveRoom { generation } => {
                vec![(generation, json!({ "type": "LeftRoom" }))]
            }
            ServiceCall::SetNickname(name) => {
                nickname = name;
                Vec::new()
            }
            ServiceCall::Disconnect => Vec::new(),
        };

        for (generation, event) in replies {
            let bytes = json!({ "generation": generation.0, "event": event }).to_string();
            if let Err(e) = callbacks.deliver_encoded(&JsonCodec, bytes.as_bytes()).await {
                tracing::warn!(error = %e, "server could not deliver callback");
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// Reads events until one matches `done`, printing the interesting ones.
async fn wait_for(
    events: &mut UnboundedReceiver<ClientEvent>,
    done: impl Fn(&ClientEvent) -> bool,
) -> Result<ClientEvent, RoomdeckError> {
    while let Some(event) = events.recv().await {
        match &event {
            ClientEvent::StateChanged { from, to } => println!("[{from} -> {to}]"),
            ClientEvent::NicknameAssigned(name) => println!("you are {name}"),
            ClientEvent::EnterRoom { room, scene } => println!("entered {room}, loading {scene:?}"),
            ClientEvent::MasterClientChanged { is_local: true, .. } => {
                println!("you are now the master client")
            }
            ClientEvent::JoinFailed { code, message } => println!("join failed ({code}): {message}"),
            _ => {}
        }
        if done(&event) {
            return Ok(event);
        }
    }
    Err(RoomdeckError::ClientClosed)
}

fn reached(state: ConnectionState) -> impl Fn(&ClientEvent) -> bool {
    move |event| matches!(event, ClientEvent::StateChanged { to, .. } if *to == state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (service, calls) = ChannelService::new();
    let (client, callbacks, mut events) = spawn_client(service, Rows, ClientConfig::default());
    tokio::spawn(serve(calls, callbacks));

    client.connect().await?;
    wait_for(&mut events, reached(ConnectionState::InLobby)).await?;
    // The room list arrives right behind the lobby notification.
    wait_for(&mut events, |e| matches!(e, ClientEvent::RoomAdded(r) if r.name == "Harbor")).await?;

    client.select_room("Castle").await?;
    client.join_selected().await?;
    wait_for(&mut events, |e| {
        matches!(e, ClientEvent::MasterClientChanged { is_local: true, .. })
    })
    .await?;
    if let Some(presence) = client.snapshot().await?.presence {
        println!("{}\n{}", presence.summary(), presence.roster());
    }

    client.leave_room().await?;
    wait_for(&mut events, reached(ConnectionState::InLobby)).await?;

    client.join_room_by_name("Ghost").await?;
    wait_for(&mut events, |e| matches!(e, ClientEvent::JoinFailed { .. })).await?;

    if let Err(e) = client.create_room("", 4, true, "eu").await {
        println!("create rejected: {e}");
    }

    println!("switching to us");
    client.refresh("us").await?;
    wait_for(&mut events, |e| matches!(e, ClientEvent::RoomAdded(r) if r.name == "Canyon")).await?;

    client.create_room("Mesa", 4, true, "us").await?;
    wait_for(&mut events, |e| matches!(e, ClientEvent::EnterRoom { .. })).await?;

    let snapshot = client.snapshot().await?;
    println!(
        "done: {} in {} with {} room(s) listed",
        snapshot.state,
        snapshot.region,
        snapshot.rooms.len()
    );

    client.shutdown().await?;
    Ok(())
}
