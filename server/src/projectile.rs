use arena_shared::{
    aim_direction, Loadout, ProjectileView, Team, MAX_PROJECTILES, PROJECTILE_LAUNCH_HEIGHT,
    PROJECTILE_RADIUS, PROJECTILE_SPEED,
};
use glam::Vec3;
use log::warn;

use crate::player::Player;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    /// Starts as a unit vector and bends downward under gravity.
    pub direction: Vec3,
    pub speed: f32,
    pub radius: f32,
    pub team: Team,
    /// Fixed at launch from the shooter's loadout.
    pub damage: i32,
    pub alive: bool,
}

impl Projectile {
    pub fn fire(shooter: &Player) -> Self {
        Self::launch(
            shooter.position,
            shooter.aim_angle,
            shooter.team(),
            shooter.loadout,
        )
    }

    pub fn launch(origin: Vec3, aim_angle: f32, team: Team, loadout: Loadout) -> Self {
        Self {
            position: origin + Vec3::new(0.0, 0.0, PROJECTILE_LAUNCH_HEIGHT),
            direction: aim_direction(aim_angle),
            speed: PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            team,
            damage: loadout.damage(),
            alive: true,
        }
    }

    /// Whether this projectile overlaps `player`'s hitbox.
    pub fn hits(&self, player: &Player) -> bool {
        player.hitbox_center().distance(self.position) < player.hit_radius + self.radius
    }

    pub fn integrate(&mut self, gravity: f32) {
        self.direction.z -= gravity;
        self.position += self.direction * self.speed;
    }

    pub fn view(&self) -> ProjectileView {
        ProjectileView {
            position: self.position,
            radius: self.radius,
            team: self.team,
        }
    }
}

/// Bounded store of in-flight projectiles.
///
/// Slots are never reused mid-tick: a projectile that collides is only marked
/// dead, and [`ProjectileArena::compact`] drops the dead ones once the tick's
/// pass is over, keeping survivors in launch order.
#[derive(Debug)]
pub struct ProjectileArena {
    slots: Vec<Projectile>,
    capacity: usize,
}

impl Default for ProjectileArena {
    fn default() -> Self {
        Self::new(MAX_PROJECTILES)
    }
}

impl ProjectileArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns false and drops the projectile when the arena is full.
    pub fn spawn(&mut self, projectile: Projectile) -> bool {
        if self.slots.len() >= self.capacity {
            warn!("Projectile limit of {} reached, shot dropped", self.capacity);
            return false;
        }
        self.slots.push(projectile);
        true
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Projectile> {
        self.slots.iter_mut()
    }

    pub fn compact(&mut self) {
        self.slots.retain(|projectile| projectile.alive);
    }

    pub fn as_slice(&self) -> &[Projectile] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_shared::{GRAVITY, SPAWN_POINT};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_fire_from_shooter() {
        let mut shooter = Player::new(1);
        shooter.loadout = Loadout::Sniper;
        shooter.aim_angle = 0.0;

        let projectile = Projectile::fire(&shooter);

        assert_eq!(projectile.team, Team::Pink);
        assert_eq!(projectile.damage, Loadout::Sniper.damage());
        assert_eq!(
            projectile.position,
            SPAWN_POINT + Vec3::new(0.0, 0.0, PROJECTILE_LAUNCH_HEIGHT)
        );
        assert_approx_eq!(projectile.direction.x, 0.0, 1e-6);
        assert_approx_eq!(projectile.direction.y, 1.0, 1e-6);
        assert!(projectile.alive);
    }

    #[test]
    fn test_integrate_applies_gravity_then_moves() {
        let mut projectile = Projectile::launch(Vec3::ZERO, -90.0, Team::Green, Loadout::Test);
        let start = projectile.position;

        projectile.integrate(GRAVITY);

        assert_approx_eq!(projectile.direction.z, -GRAVITY, 1e-7);
        assert_approx_eq!(projectile.position.x - start.x, PROJECTILE_SPEED, 1e-6);
        assert_approx_eq!(
            projectile.position.z - start.z,
            -GRAVITY * PROJECTILE_SPEED,
            1e-7
        );
    }

    #[test]
    fn test_hits_respects_hitbox_offset() {
        let mut target = Player::new(0);
        target.loadout = Loadout::Assault;
        let mut projectile = Projectile::launch(Vec3::ZERO, 0.0, Team::Pink, Loadout::Test);

        projectile.position = target.hitbox_center();
        assert!(projectile.hits(&target));

        projectile.position =
            target.hitbox_center() + Vec3::X * (target.hit_radius + projectile.radius + 0.01);
        assert!(!projectile.hits(&target));
    }

    #[test]
    fn test_arena_capacity() {
        let mut arena = ProjectileArena::new(2);
        let shot = Projectile::launch(Vec3::ZERO, 0.0, Team::Green, Loadout::Test);

        assert!(arena.spawn(shot.clone()));
        assert!(arena.spawn(shot.clone()));
        assert!(!arena.spawn(shot));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_compact_keeps_survivors_in_order() {
        let mut arena = ProjectileArena::default();
        for angle in [0.0, 10.0, 20.0, 30.0] {
            arena.spawn(Projectile::launch(Vec3::ZERO, angle, Team::Green, Loadout::Test));
        }
        let expected: Vec<Vec3> = arena
            .as_slice()
            .iter()
            .map(|p| p.direction)
            .enumerate()
            .filter(|(i, _)| i % 2 == 1)
            .map(|(_, d)| d)
            .collect();

        for (i, projectile) in arena.iter_mut().enumerate() {
            projectile.alive = i % 2 == 1;
        }
        arena.compact();

        let remaining: Vec<Vec3> = arena.as_slice().iter().map(|p| p.direction).collect();
        assert_eq!(remaining, expected);
        assert!(!arena.is_empty());
    }
}
