use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_PLAYERS: usize = 6;
pub const MAX_PROJECTILES: usize = 256;

/// Simulation step length in milliseconds.
pub const TICK_MS: u64 = 10;
pub const MATCH_DURATION_SECS: u64 = 180;

pub const STARTING_HEALTH: i32 = 100;
pub const RESPAWN_DELAY_SECS: f32 = 5.0;
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 0.0, 0.35);

pub const PLAYER_SPEED: f32 = 0.02;
pub const PLAYER_HIT_RADIUS: f32 = 0.25;

pub const PROJECTILE_SPEED: f32 = 0.03;
pub const PROJECTILE_RADIUS: f32 = 0.04;
/// Height above the shooter's position at which projectiles appear.
pub const PROJECTILE_LAUNCH_HEIGHT: f32 = 0.25;
/// Subtracted from a projectile's vertical direction every tick.
pub const GRAVITY: f32 = 0.004;

pub const PAINT_RADIUS: f32 = 40.0;
pub const GREEN: u32 = 0xFF1F_FF1F;
pub const PINK: u32 = 0xFFFF_1FFF;

pub type PlayerId = u8;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Green,
    Pink,
}

impl Team {
    /// Even ids play green, odd ids play pink.
    pub fn of(player_id: PlayerId) -> Self {
        if player_id % 2 == 0 {
            Team::Green
        } else {
            Team::Pink
        }
    }

    pub fn color(self) -> u32 {
        match self {
            Team::Green => GREEN,
            Team::Pink => PINK,
        }
    }
}

/// Character model a player brings into the match. Selects the damage of the
/// projectiles it fires and where its hitbox sits above its position.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Loadout {
    #[default]
    Test,
    Rolo,
    Assault,
    Sniper,
    Bucket,
}

impl Loadout {
    pub const ALL: [Loadout; 5] = [
        Loadout::Test,
        Loadout::Rolo,
        Loadout::Assault,
        Loadout::Sniper,
        Loadout::Bucket,
    ];

    pub fn damage(self) -> i32 {
        match self {
            Loadout::Test => 10,
            Loadout::Rolo => 8,
            Loadout::Assault => 12,
            Loadout::Sniper => 40,
            Loadout::Bucket => 25,
        }
    }

    pub fn hitbox_offset(self) -> f32 {
        match self {
            Loadout::Test => 0.25,
            Loadout::Rolo => 0.2,
            Loadout::Assault => 0.3,
            Loadout::Sniper => 0.3,
            Loadout::Bucket => 0.25,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }
}

/// Parses a numeric loadout id, as handed to the server on its command line.
impl FromStr for Loadout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let id: u8 = value
            .trim()
            .parse()
            .map_err(|e| format!("invalid loadout id '{}': {}", value, e))?;
        Loadout::from_id(id).ok_or_else(|| {
            let known: Vec<u8> = Loadout::ALL.iter().map(|loadout| loadout.id()).collect();
            format!("unknown loadout id {} (known: {:?})", id, known)
        })
    }
}

/// Unit direction a shot travels for a given aim angle in degrees.
///
/// The angle is measured the way the client reports its mouse: it is negated
/// and turned a quarter circle clockwise before being projected onto the
/// ground plane.
pub fn aim_direction(aim_angle: f32) -> Vec3 {
    let radians = (-aim_angle - 90.0).to_radians();
    Vec3::new(radians.cos(), -radians.sin(), 0.0).normalize_or_zero()
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct InputEvent {
    pub player_id: PlayerId,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shooting: bool,
    pub aim_angle: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec3,
    pub rotation: Quat,
    pub online: bool,
    pub loadout: Loadout,
    /// Whole seconds until respawn, or -1 while alive.
    pub respawn_timer: i32,
    pub aim_angle: f32,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            position: SPAWN_POINT,
            rotation: Quat::IDENTITY,
            online: false,
            loadout: Loadout::default(),
            respawn_timer: -1,
            aim_angle: 0.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PaintPoint {
    pub team: Team,
    pub position: Vec3,
    pub face: u32,
    pub radius: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ProjectileView {
    pub position: Vec3,
    pub radius: f32,
    pub team: Team,
}

/// Complete game state for one tick. Every datagram carries all of it, so a
/// client that misses one simply waits for the next.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub players: Vec<PlayerView>,
    pub paint_points: Vec<PaintPoint>,
    pub projectiles: Vec<ProjectileView>,
    pub timer: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            players: vec![PlayerView::default(); MAX_PLAYERS],
            paint_points: Vec::new(),
            projectiles: Vec::new(),
            timer: String::from("00:00"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    Input(InputEvent),
    Snapshot(Snapshot),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_team_from_parity() {
        assert_eq!(Team::of(0), Team::Green);
        assert_eq!(Team::of(1), Team::Pink);
        assert_eq!(Team::of(4), Team::Green);
        assert_ne!(Team::Green.color(), Team::Pink.color());
    }

    #[test]
    fn test_aim_direction_zero_points_along_y() {
        let dir = aim_direction(0.0);
        assert_approx_eq!(dir.x, 0.0, 1e-6);
        assert_approx_eq!(dir.y, 1.0, 1e-6);
        assert_eq!(dir.z, 0.0);
    }

    #[test]
    fn test_aim_direction_quarter_turn() {
        let dir = aim_direction(90.0);
        assert_approx_eq!(dir.x, -1.0, 1e-6);
        assert_approx_eq!(dir.y, 0.0, 1e-6);

        let dir = aim_direction(-90.0);
        assert_approx_eq!(dir.x, 1.0, 1e-6);
        assert_approx_eq!(dir.y, 0.0, 1e-6);
    }

    #[test]
    fn test_aim_direction_is_unit() {
        for angle in [-170.0, -33.3, 12.5, 45.0, 181.0] {
            assert_approx_eq!(aim_direction(angle).length(), 1.0, 1e-5);
        }
    }

    #[test]
    fn test_loadout_ids() {
        for loadout in Loadout::ALL {
            assert_eq!(Loadout::from_id(loadout.id()), Some(loadout));
            assert!(loadout.damage() > 0);
            assert!(loadout.hitbox_offset() > 0.0);
        }
        assert_eq!(Loadout::from_id(5), None);
        assert_eq!(Loadout::from_id(255), None);
    }

    #[test]
    fn test_loadout_from_str() {
        assert_eq!("3".parse::<Loadout>(), Ok(Loadout::Sniper));
        assert_eq!(" 1 ".parse::<Loadout>(), Ok(Loadout::Rolo));
        assert!("7".parse::<Loadout>().unwrap_err().contains("unknown loadout id 7"));
        assert!("sniper".parse::<Loadout>().is_err());
    }

    #[test]
    fn test_default_snapshot_covers_every_player() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.players.len(), MAX_PLAYERS);
        assert!(snapshot.players.iter().all(|p| !p.online));
        assert!(snapshot.players.iter().all(|p| p.respawn_timer == -1));
    }

    #[test]
    fn test_packet_serialization_input() {
        let packet = Packet::Input(InputEvent {
            player_id: 3,
            up: true,
            down: false,
            left: false,
            right: true,
            shooting: true,
            aim_angle: -45.0,
        });

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::Input(input) => {
                assert_eq!(input.player_id, 3);
                assert!(input.up && input.right && input.shooting);
                assert!(!input.down && !input.left);
                assert_eq!(input.aim_angle, -45.0);
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_packet_serialization_snapshot() {
        let mut snapshot = Snapshot {
            tick: 42,
            timer: "02:59".to_string(),
            ..Snapshot::default()
        };
        snapshot.players[1].online = true;
        snapshot.players[1].loadout = Loadout::Sniper;
        snapshot.projectiles.push(ProjectileView {
            position: Vec3::new(1.0, 2.0, 0.5),
            radius: PROJECTILE_RADIUS,
            team: Team::Pink,
        });

        let serialized = bincode::serialize(&Packet::Snapshot(snapshot.clone())).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        assert_eq!(deserialized, Packet::Snapshot(snapshot));
    }

    #[test]
    fn test_truncated_datagram_is_rejected() {
        let serialized = bincode::serialize(&Packet::Input(InputEvent::default())).unwrap();
        let result: Result<Packet, _> = bincode::deserialize(&serialized[..serialized.len() - 2]);
        assert!(result.is_err());
    }
}
