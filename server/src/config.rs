use arena_shared::{Loadout, MATCH_DURATION_SECS, TICK_MS};
use std::time::Duration;

/// Default number of queued input events per buffer half.
pub const INPUT_CAPACITY: usize = 200;

/// Runtime settings for a match server. `Default` reproduces the fixed
/// constants the game was tuned with.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub tick: Duration,
    pub match_duration: Duration,
    pub input_capacity: usize,
    /// Half the side length of the built-in arena.
    pub arena_half_extent: f32,
    /// Floor cells per arena side.
    pub arena_cells: u32,
    /// Loadout per player slot, in id order. Slots past the end keep the
    /// default loadout.
    pub loadouts: Vec<Loadout>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7777".to_string(),
            tick: Duration::from_millis(TICK_MS),
            match_duration: Duration::from_secs(MATCH_DURATION_SECS),
            input_capacity: INPUT_CAPACITY,
            arena_half_extent: 5.0,
            arena_cells: 20,
            loadouts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = ServerConfig::default();
        assert_eq!(config.tick, Duration::from_millis(10));
        assert_eq!(config.match_duration, Duration::from_secs(180));
        assert_eq!(config.input_capacity, 200);
        assert!(config.bind_addr.parse::<std::net::SocketAddr>().is_ok());
        assert!(config.loadouts.is_empty());
    }
}
