//! Game-logic layer: a hecs world of agents, pickups and props driven
//! once per frame by the update phase.

mod behavior;
mod components;
mod player;
mod systems;

pub use behavior::{Behavior, Chase, Pickup, Wander};
pub use components::{ActorFlags, Animation, Billboard, Health, Position};
pub use player::{InputCmd, MOUSE_SPEED_FACTOR, player_move};
pub use systems::{WEAPON_DAMAGE, WEAPON_RANGE};

use glam::Vec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand::rngs::StdRng;
use smallvec::smallvec;
use std::sync::atomic::Ordering;

use crate::audio::SoundSink;
use crate::nav::Locomotion;
use crate::world::{Camera, GridMap, Sprite, SpriteLayer, TextureBank, TextureId};

use systems::{Action, Actions};

pub const PLAYER_HEALTH: f32 = 100.0;

/// Owns the ECS world and drives all game-logic systems.
pub struct Sim {
    world: World,
    rng: StdRng,
    elapsed: f32,
    sprites: Vec<Sprite>,
    sounds: Vec<&'static str>,

    pub player_health: f32,
    pub coins: u32,
}

impl Sim {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
            sprites: Vec::new(),
            sounds: Vec::new(),
            player_health: PLAYER_HEALTH,
            coins: 0,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn player_dead(&self) -> bool {
        self.player_health <= 0.0
    }

    /* ---------------------------------------------------------------- */
    /* spawning                                                          */
    /* ---------------------------------------------------------------- */

    /// Static decoration: a billboard with no behavior.
    pub fn spawn_prop(&mut self, pos: Vec2, tex: TextureId, scale: f32) -> Entity {
        self.world
            .spawn((Position(pos), Billboard::new(tex, scale)))
    }

    /// Contact-collected pickup with a hover bob.
    pub fn spawn_pickup(&mut self, pos: Vec2, tex: TextureId, scale: f32, value: u32) -> Entity {
        let billboard = Billboard::new(tex, scale);
        let pickup = behavior::Pickup {
            radius: 1.0,
            value,
            bob: 0.1,
            base_v_offset: billboard.v_offset,
        };
        self.world.spawn((
            Position(pos),
            billboard,
            Locomotion::new(0.0),
            Behavior::Pickup(pickup),
            ActorFlags::empty(),
        ))
    }

    /// Idle wanderer walking to random reachable cells between cooldowns.
    pub fn spawn_wanderer(
        &mut self,
        pos: Vec2,
        speed: f32,
        scale: f32,
        cooldown: f32,
        walk: Animation,
        idle: Animation,
    ) -> Entity {
        let tex0 = walk.frame(self.elapsed);
        let wander = Wander::new(cooldown, walk, idle);

        // arrival observer restarts the wander cooldown clock
        let arrived = std::sync::Arc::clone(&wander.arrived);
        let mut loco = Locomotion::new(speed);
        loco.subscribe(move || arrived.store(true, Ordering::Relaxed));

        self.world.spawn((
            Position(pos),
            Billboard::new(tex0, scale),
            loco,
            Behavior::Wander(wander),
            ActorFlags::SHOOTABLE,
            Health::new(5.0),
        ))
    }

    /// Hostile chaser with a melee swing overlay.
    pub fn spawn_chaser(
        &mut self,
        pos: Vec2,
        speed: f32,
        scale: f32,
        attack_range: f32,
        damage: f32,
        walk: Animation,
        swing: Animation,
    ) -> Entity {
        let tex0 = walk.frame(self.elapsed);
        let mut billboard = Billboard::new(tex0, scale);
        billboard.layers = smallvec![SpriteLayer::new(tex0), SpriteLayer::hidden()];

        self.world.spawn((
            Position(pos),
            billboard,
            Locomotion::new(speed),
            Behavior::Chase(Chase::new(attack_range, damage, walk, swing)),
            ActorFlags::SHOOTABLE,
            Health::new(15.0),
        ))
    }

    /* ---------------------------------------------------------------- */
    /* per-frame update                                                  */
    /* ---------------------------------------------------------------- */

    /// One update phase: behavior decisions, then locomotion.
    pub fn update(&mut self, grid: &GridMap, camera: &Camera, dt: f32) {
        self.elapsed += dt;
        let acts =
            systems::behavior_system(&mut self.world, grid, camera, dt, self.elapsed, &mut self.rng);
        self.apply(acts);
        systems::locomotion_system(&mut self.world, grid, dt);
    }

    /// One trigger pull of the hit-scan weapon.
    pub fn fire(&mut self, camera: &Camera, grid: &GridMap, bank: &TextureBank) {
        self.sounds.push("pistol");
        let acts = systems::fire_weapon(&mut self.world, camera, grid, bank);
        self.apply(acts);
    }

    /// Flush queued sound events into the binary's sink.
    pub fn drain_sounds(&mut self, sink: &mut impl SoundSink) {
        for name in self.sounds.drain(..) {
            sink.play(name);
        }
    }

    /// Billboard snapshot for the draw phase.
    pub fn sprites(&mut self) -> &[Sprite] {
        systems::collect_sprites(&self.world, &mut self.sprites);
        &self.sprites
    }

    fn apply(&mut self, acts: Actions) {
        for act in acts {
            match act {
                Action::Despawn(ent) => {
                    self.world.despawn(ent).ok();
                }
                Action::DamagePlayer(damage) => {
                    self.player_health -= damage;
                    self.sounds.push("swing");
                }
                Action::Collect(value) => {
                    self.coins += value;
                    self.sounds.push("coin");
                }
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Texture;

    const DT: f32 = 1.0 / 60.0;

    fn room() -> GridMap {
        #[rustfmt::skip]
        let cells = vec![
            1, 1, 1, 1, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 1,
            1, 1, 1, 1, 1,
        ];
        GridMap::from_cells(5, 5, cells)
    }

    fn bank() -> (TextureBank, TextureId) {
        let mut bank = TextureBank::default_with_checker();
        let id = bank
            .insert("BODY", Texture::new("BODY", 4, 4, vec![0xFF_FF_FF_FF; 16]))
            .unwrap();
        (bank, id)
    }

    fn anim(tex: TextureId) -> Animation {
        let mut a = Animation::new([tex]);
        a.start(0.0);
        a
    }

    #[test]
    fn wanderer_picks_goals_and_moves() {
        let grid = room();
        let (_, tex) = bank();
        let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::X, 0.66);

        let mut sim = Sim::new(42);
        let start = Vec2::new(2.5, 2.5);
        let ent = sim.spawn_wanderer(start, 2.0, 0.5, 0.25, anim(tex), anim(tex));

        let mut pathfound = false;
        let mut moved = false;
        for _ in 0..2_000 {
            sim.update(&grid, &camera, DT);
            let pos = sim.world().get::<&Position>(ent).unwrap().0;
            pathfound |= sim.world().get::<&Locomotion>(ent).unwrap().is_pathfinding();
            moved |= pos.distance(start) > 0.5;
            // never walks into a wall cell or off the grid
            let (row, col) = GridMap::cell_of(pos);
            assert!(grid.is_walkable(row as i32, col as i32), "stuck at {pos:?}");
        }
        assert!(pathfound);
        assert!(moved);
    }

    #[test]
    fn chaser_swings_once_per_cooldown() {
        let grid = room();
        let (_, tex) = bank();
        let camera = Camera::new(Vec2::new(2.5, 2.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        let swing = Animation::one_shot([tex]);
        sim.spawn_chaser(Vec2::new(2.6, 2.5), 1.0, 1.0, 1.0, 10.0, anim(tex), swing);

        // half a cooldown period → exactly one swing has landed
        for _ in 0..30 {
            sim.update(&grid, &camera, DT);
        }
        assert_eq!(sim.player_health, PLAYER_HEALTH - 10.0);
        assert!(!sim.player_dead());
    }

    #[test]
    fn chaser_pathfinds_when_view_is_blocked() {
        // wall column splits the room; chaser must route around it
        #[rustfmt::skip]
        let cells = vec![
            1, 1, 1, 1, 1, 1, 1,
            1, 0, 0, 1, 0, 0, 1,
            1, 0, 0, 1, 0, 0, 1,
            1, 0, 0, 0, 0, 0, 1,
            1, 1, 1, 1, 1, 1, 1,
        ];
        let grid = GridMap::from_cells(5, 7, cells);
        let (_, tex) = bank();
        let camera = Camera::new(Vec2::new(5.5, 1.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        let ent = sim.spawn_chaser(
            Vec2::new(1.5, 1.5),
            2.0,
            1.0,
            1.0,
            10.0,
            anim(tex),
            Animation::one_shot([tex]),
        );

        sim.update(&grid, &camera, DT);
        assert!(sim.world().get::<&Locomotion>(ent).unwrap().is_pathfinding());

        // give it a few seconds; it ends up near the player
        for _ in 0..600 {
            sim.update(&grid, &camera, DT);
        }
        let pos = sim.world().get::<&Position>(ent).unwrap().0;
        assert!(pos.distance(camera.pos) < 1.5, "stuck at {pos:?}");
    }

    #[test]
    fn weapon_kills_covered_target_through_open_air() {
        let grid = room();
        let (bank, tex) = bank();
        let camera = Camera::new(Vec2::new(1.5, 2.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        // wanderer has 5 health = one weapon hit
        let ent = sim.spawn_wanderer(
            Vec2::new(3.5, 2.5),
            1.0,
            1.0,
            1_000.0,
            anim(tex),
            anim(tex),
        );

        sim.fire(&camera, &grid, &bank);
        assert!(!sim.world().contains(ent));
    }

    #[test]
    fn weapon_hit_window_narrows_with_distance() {
        #[rustfmt::skip]
        let cells = vec![
            1, 1, 1, 1, 1, 1, 1, 1,
            1, 0, 0, 0, 0, 0, 0, 1,
            1, 0, 0, 0, 0, 0, 0, 1,
            1, 0, 0, 0, 0, 0, 0, 1,
            1, 1, 1, 1, 1, 1, 1, 1,
        ];
        let grid = GridMap::from_cells(5, 8, cells);
        let (bank, tex) = bank();
        let camera = Camera::new(Vec2::new(1.5, 2.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        // same lateral offset at depth 1 and depth 5
        let near = sim.spawn_wanderer(
            Vec2::new(2.5, 2.8),
            1.0,
            1.0,
            1_000.0,
            anim(tex),
            anim(tex),
        );
        let far = sim.spawn_wanderer(
            Vec2::new(6.5, 2.8),
            1.0,
            1.0,
            1_000.0,
            anim(tex),
            anim(tex),
        );

        sim.fire(&camera, &grid, &bank);
        assert!(!sim.world().contains(near), "near target fills the crosshair");
        assert!(sim.world().contains(far), "far target shrinks out of it");
    }

    #[test]
    fn weapon_cannot_shoot_through_walls() {
        #[rustfmt::skip]
        let cells = vec![
            1, 1, 1, 1, 1,
            1, 0, 1, 0, 1,
            1, 1, 1, 1, 1,
        ];
        let grid = GridMap::from_cells(3, 5, cells);
        let (bank, tex) = bank();
        let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        let ent = sim.spawn_wanderer(
            Vec2::new(3.5, 1.5),
            1.0,
            1.0,
            1_000.0,
            anim(tex),
            anim(tex),
        );

        sim.fire(&camera, &grid, &bank);
        assert!(sim.world().contains(ent));
    }

    #[test]
    fn pickup_collects_on_contact() {
        let grid = room();
        let (_, tex) = bank();
        let camera = Camera::new(Vec2::new(2.5, 2.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        let coin = sim.spawn_pickup(Vec2::new(2.7, 2.5), tex, 0.25, 3);
        let far = sim.spawn_pickup(Vec2::new(1.2, 3.7), tex, 0.25, 3);

        sim.update(&grid, &camera, DT);
        assert_eq!(sim.coins, 3);
        assert!(!sim.world().contains(coin));
        assert!(sim.world().contains(far));
    }

    #[test]
    fn sound_events_reach_the_sink_in_order() {
        let grid = room();
        let (bank, tex) = bank();
        let camera = Camera::new(Vec2::new(2.5, 2.5), Vec2::X, 0.66);

        let mut sim = Sim::new(1);
        sim.spawn_pickup(Vec2::new(2.7, 2.5), tex, 0.25, 1);

        sim.fire(&camera, &grid, &bank);
        sim.update(&grid, &camera, DT);

        let mut sink = crate::audio::RecordingSound::default();
        sim.drain_sounds(&mut sink);
        assert_eq!(sink.played, ["pistol", "coin"]);

        // queue is drained, not replayed
        sim.drain_sounds(&mut sink);
        assert_eq!(sink.played.len(), 2);
    }
}
