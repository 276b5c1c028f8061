//! Connected players and the addresses their snapshots go to.
//!
//! Player slots are fixed for the whole match. A slot becomes online the
//! first time an input arrives for it and stays online until the server
//! exits, since disconnects are not tracked.

use arena_shared::{PlayerId, MAX_PLAYERS};
use log::info;
use std::net::SocketAddr;

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    addresses: [Option<SocketAddr>; MAX_PLAYERS],
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the return address of a player the first time it is seen.
    ///
    /// Returns true only for that first sighting. Later calls keep the
    /// original address. Ids outside the room are ignored.
    pub fn mark_online(&mut self, player_id: PlayerId, addr: SocketAddr) -> bool {
        let Some(slot) = self.addresses.get_mut(usize::from(player_id)) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }

        *slot = Some(addr);
        info!("Player {} connected from {}", player_id, addr);
        true
    }

    pub fn is_online(&self, player_id: PlayerId) -> bool {
        self.address(player_id).is_some()
    }

    pub fn address(&self, player_id: PlayerId) -> Option<SocketAddr> {
        self.addresses
            .get(usize::from(player_id))
            .copied()
            .flatten()
    }

    pub fn online_ids(&self) -> Vec<PlayerId> {
        self.addresses()
            .into_iter()
            .map(|(player_id, _)| player_id)
            .collect()
    }

    /// Every online player with the address its snapshots are sent to.
    pub fn addresses(&self) -> Vec<(PlayerId, SocketAddr)> {
        self.addresses
            .iter()
            .enumerate()
            .filter_map(|(id, addr)| addr.map(|addr| (id as PlayerId, addr)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.addresses.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
