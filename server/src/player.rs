use arena_shared::{
    InputEvent, Loadout, PlayerId, PlayerView, Team, PLAYER_HIT_RADIUS, PLAYER_SPEED,
    RESPAWN_DELAY_SECS, SPAWN_POINT, STARTING_HEALTH,
};
use glam::{Quat, Vec3};

use crate::map::Contact;

/// Server-side state of one player slot.
///
/// Slots exist for the whole match; `online` flips on with the first input
/// and never back.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub online: bool,
    pub position: Vec3,
    pub rotation: Quat,
    /// Movement applied each tick, already scaled by `speed`.
    pub intent: Vec3,
    pub speed: f32,
    pub hit_radius: f32,
    pub health: i32,
    pub dead: bool,
    /// Seconds left before a dead player acts again.
    pub respawn_timer: f32,
    pub aim_angle: f32,
    pub loadout: Loadout,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            online: false,
            position: SPAWN_POINT,
            rotation: Quat::IDENTITY,
            intent: Vec3::ZERO,
            speed: PLAYER_SPEED,
            hit_radius: PLAYER_HIT_RADIUS,
            health: STARTING_HEALTH,
            dead: false,
            respawn_timer: 0.0,
            aim_angle: 0.0,
            loadout: Loadout::default(),
        }
    }

    pub fn team(&self) -> Team {
        Team::of(self.id)
    }

    /// Counts down a dead player's respawn timer. Returns whether the player
    /// takes part in the rest of this tick.
    pub fn tick_respawn(&mut self, dt_secs: f32) -> bool {
        if !self.dead {
            return true;
        }

        self.respawn_timer -= dt_secs;
        if self.respawn_timer < 0.0 {
            self.dead = false;
            true
        } else {
            false
        }
    }

    /// Replaces the movement intent with the directions held in `input`.
    /// Returns whether the input asks for a shot.
    pub fn apply_input(&mut self, input: &InputEvent) -> bool {
        self.aim_angle = input.aim_angle;

        let mut intent = Vec3::ZERO;
        if input.down {
            intent.y -= 1.0;
        }
        if input.up {
            intent.y += 1.0;
        }
        if input.left {
            intent.x -= 1.0;
        }
        if input.right {
            intent.x += 1.0;
        }
        self.intent = intent.normalize_or_zero() * self.speed;

        input.shooting
    }

    /// Orients the player to the ground it touches, then moves it.
    ///
    /// Movement is capped at `speed` per tick. When the touched surface is
    /// above the player it closes half the gap each tick rather than snapping.
    pub fn settle(&mut self, contact: &Contact) {
        self.rotation = rotation_from_normal(contact.normal_sum);

        self.intent = self.intent.clamp_length_max(self.speed);
        self.position += self.intent;

        if let Some(surface) = contact.surface {
            if surface.point.z > self.position.z {
                self.position.z += 0.5 * (surface.point.z - self.position.z);
            }
        }
    }

    /// Subtracts `damage` from health. Returns true if this killed the player,
    /// in which case it is already back at spawn waiting out its respawn delay.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.health -= damage;
        if self.health > 0 {
            return false;
        }

        self.position = SPAWN_POINT;
        self.health = STARTING_HEALTH;
        self.intent = Vec3::ZERO;
        self.dead = true;
        self.respawn_timer = RESPAWN_DELAY_SECS;
        true
    }

    pub fn hitbox_center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, 0.0, self.loadout.hitbox_offset())
    }

    /// Whole seconds until respawn as shown to clients, -1 while alive.
    pub fn respawn_display(&self) -> i32 {
        if self.dead {
            self.respawn_timer as i32
        } else {
            -1
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            position: self.position,
            rotation: self.rotation,
            online: self.online,
            loadout: self.loadout,
            respawn_timer: self.respawn_display(),
            aim_angle: self.aim_angle,
        }
    }
}

/// Rotation taking the world up axis onto the summed contact normal. Identity
/// when nothing is touched.
pub fn rotation_from_normal(normal_sum: Vec3) -> Quat {
    match normal_sum.try_normalize() {
        Some(normal) => Quat::from_rotation_arc(Vec3::Z, normal),
        None => Quat::IDENTITY,
    }
}
