//! Who is in the room the client joined.
//!
//! Once the client is in a room, the service keeps it posted about other
//! members coming and going and about the master client role moving
//! between members. The UI uses this for the player list, the
//! "Players: n/max" line, and master-only controls.

use roomdeck_protocol::{ActorNumber, Player, RoomSnapshot};

/// Membership of the current room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPresence {
    name: String,
    max_players: u32,
    /// Members ordered by actor number (join order).
    players: Vec<Player>,
    master: ActorNumber,
    local: ActorNumber,
}

impl RoomPresence {
    /// Builds presence from the snapshot delivered on join.
    pub fn from_snapshot(snapshot: RoomSnapshot) -> Self {
        let mut players = snapshot.players;
        players.sort_by_key(|p| p.actor);
        players.dedup_by_key(|p| p.actor);
        Self {
            name: snapshot.name,
            max_players: snapshot.max_players,
            players,
            master: snapshot.master,
            local: snapshot.local,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn master(&self) -> ActorNumber {
        self.master
    }

    pub fn local(&self) -> ActorNumber {
        self.local
    }

    /// Returns `true` if the local client currently holds the master
    /// client role.
    pub fn is_master_client(&self) -> bool {
        self.master == self.local
    }

    /// Adds a member. Returns `false` if the actor was already present,
    /// in which case its nickname is refreshed.
    pub fn add_player(&mut self, player: Player) -> bool {
        match self.players.binary_search_by_key(&player.actor, |p| p.actor) {
            Ok(index) => {
                self.players[index].nickname = player.nickname;
                false
            }
            Err(index) => {
                self.players.insert(index, player);
                true
            }
        }
    }

    /// Removes a member. Returns `false` if the actor wasn't present.
    pub fn remove_player(&mut self, actor: ActorNumber) -> bool {
        match self.players.binary_search_by_key(&actor, |p| p.actor) {
            Ok(index) => {
                self.players.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Moves the master client role. Returns `false` if `master` already
    /// held it.
    pub fn switch_master(&mut self, master: ActorNumber) -> bool {
        if self.master == master {
            return false;
        }
        self.master = master;
        true
    }

    /// One line per member, in join order.
    pub fn roster(&self) -> String {
        self.players
            .iter()
            .map(|p| p.nickname.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Room summary line, e.g. `"Lobby Name: hangout\nPlayers: 2/4"`.
    pub fn summary(&self) -> String {
        format!(
            "Lobby Name: {}\nPlayers: {}/{}",
            self.name,
            self.player_count(),
            self.max_players
        )
    }
}
