//! The authoritative match world and its per-tick step.

use arena_shared::{
    InputEvent, Loadout, PaintPoint, PlayerId, Snapshot, Team, GRAVITY, MAX_PLAYERS,
    PAINT_RADIUS,
};
use log::{debug, info};
use std::time::Duration;

use crate::map::{MapGeometry, PaintScores, SurfaceHit};
use crate::player::Player;
use crate::projectile::{Projectile, ProjectileArena};

pub struct World<M> {
    players: Vec<Player>,
    projectiles: ProjectileArena,
    map: M,
    snapshot: Snapshot,
    tick_secs: f32,
}

impl<M: MapGeometry> World<M> {
    pub fn new(map: M, tick: Duration) -> Self {
        Self {
            players: (0..MAX_PLAYERS as PlayerId).map(Player::new).collect(),
            projectiles: ProjectileArena::default(),
            map,
            snapshot: Snapshot::default(),
            tick_secs: tick.as_secs_f32(),
        }
    }

    /// Brings a player slot online. Repeated calls are harmless.
    pub fn connect(&mut self, player_id: PlayerId) {
        if let Some(player) = self.players.get_mut(usize::from(player_id)) {
            if !player.online {
                player.online = true;
                self.snapshot.players[usize::from(player_id)].online = true;
                debug!("Player {} joined the simulation", player_id);
            }
        }
    }

    pub fn set_loadout(&mut self, player_id: PlayerId, loadout: Loadout) {
        if let Some(player) = self.players.get_mut(usize::from(player_id)) {
            player.loadout = loadout;
            self.snapshot.players[usize::from(player_id)].loadout = loadout;
        }
    }

    /// Advances the match by one tick using the inputs drained for it.
    ///
    /// Players are processed in id order, each consuming its own inputs in
    /// arrival order. Projectiles launched this tick fly in the same tick.
    pub fn step(&mut self, inputs: &[InputEvent]) {
        self.snapshot.paint_points.clear();

        for index in 0..self.players.len() {
            self.step_player(index, inputs);
        }

        self.step_projectiles();
    }

    fn step_player(&mut self, index: usize, inputs: &[InputEvent]) {
        let player = &mut self.players[index];
        if !player.online {
            return;
        }

        if !player.tick_respawn(self.tick_secs) {
            self.snapshot.players[index].respawn_timer = player.respawn_display();
            return;
        }

        for input in inputs
            .iter()
            .filter(|input| usize::from(input.player_id) == index)
        {
            if player.apply_input(input) {
                self.projectiles.spawn(Projectile::fire(player));
            }
        }

        let contact = self.map.collide(player.position, player.hit_radius);
        if let Some(surface) = contact.surface {
            paint(
                &mut self.map,
                &mut self.snapshot.paint_points,
                player.team(),
                surface,
            );
        }

        player.settle(&contact);
        self.snapshot.players[index] = player.view();
    }

    fn step_projectiles(&mut self) {
        let Self {
            players,
            projectiles,
            map,
            snapshot,
            ..
        } = self;

        for projectile in projectiles.iter_mut() {
            let target = players.iter_mut().find(|player| {
                player.online
                    && !player.dead
                    && player.team() != projectile.team
                    && projectile.hits(player)
            });

            if let Some(target) = target {
                if target.take_damage(projectile.damage) {
                    info!("Player {} was splatted", target.id);
                    snapshot.players[usize::from(target.id)] = target.view();
                }
                projectile.alive = false;
                continue;
            }

            if let Some(hit) = map.projectile_collide(projectile.position, projectile.radius) {
                paint(map, &mut snapshot.paint_points, projectile.team, hit);
                projectile.alive = false;
                continue;
            }

            projectile.integrate(GRAVITY);
        }

        projectiles.compact();
        snapshot.projectiles = projectiles
            .as_slice()
            .iter()
            .map(Projectile::view)
            .collect();
    }

    /// Stamps the snapshot with the tick number and the remaining match time.
    pub fn stamp(&mut self, tick: u64, timer: String) {
        self.snapshot.tick = tick;
        self.snapshot.timer = timer;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(player_id))
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(usize::from(player_id))
    }

    pub fn projectiles(&self) -> &[Projectile] {
        self.projectiles.as_slice()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn scores(&self) -> PaintScores {
        self.map.score()
    }
}

fn paint<M: MapGeometry>(map: &mut M, points: &mut Vec<PaintPoint>, team: Team, hit: SurfaceHit) {
    map.paint(hit.face, hit.point, PAINT_RADIUS, team.color());
    points.push(PaintPoint {
        team,
        position: hit.point,
        face: hit.face,
        radius: PAINT_RADIUS,
    });
}
