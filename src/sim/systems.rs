//! Per-tick systems over the hecs world.
//!
//! Systems queue side effects (despawns, player damage, coin credit)
//! instead of applying them mid-query, so iteration never fights the
//! borrow checker.

use hecs::{Entity, World};
use rand::Rng;
use smallvec::SmallVec;

use crate::nav::{self, Locomotion};
use crate::raycast;
use crate::world::{Camera, GridMap, Sprite, SpriteLayer, TextureBank};

use super::behavior::Behavior;
use super::components::{ActorFlags, Billboard, Health, Position};

pub const WEAPON_DAMAGE: f32 = 5.0;
pub const WEAPON_RANGE: f32 = 32.0;

/// Deferred side effect of one system pass.
pub enum Action {
    Despawn(Entity),
    DamagePlayer(f32),
    Collect(u32),
}
pub type Actions = SmallVec<[Action; 4]>;

/* ================================================================= */
/*  Behavior                                                         */
/* ================================================================= */

pub fn behavior_system<R: Rng>(
    world: &mut World,
    grid: &GridMap,
    camera: &Camera,
    dt: f32,
    now: f32,
    rng: &mut R,
) -> Actions {
    let mut acts = Actions::new();
    let player_pos = camera.pos;
    let inv = camera.inv_matrix();

    let query =
        world.query_mut::<(&Position, &mut Locomotion, &mut Behavior, &mut Billboard)>();
    for (ent, (pos, loco, behavior, billboard)) in query {
        match behavior {
            Behavior::Wander(w) => {
                if w.take_arrival() {
                    w.idle_for = 0.0;
                }
                if !loco.is_pathfinding() {
                    w.idle_for += dt;
                    if w.idle_for >= w.cooldown {
                        let start = GridMap::cell_of(pos.0);
                        loco.follow_path(nav::find_random_reachable_path(start, grid, rng));
                        w.idle_for = 0.0;
                    }
                }
                let anim = if loco.is_moving() { &w.walk } else { &w.idle };
                billboard.layers[0].tex = Some(anim.frame(now));
            }

            Behavior::Chase(c) => {
                let rel = player_pos - pos.0;
                let dist = rel.length();

                if dist > 0.0 {
                    let view = raycast::cast(pos.0, rel / dist, grid, dist);
                    if view.hit {
                        // wall in the way → BFS route, throttled
                        c.since_repath += dt;
                        if !loco.is_pathfinding() && c.since_repath >= c.repath_cooldown {
                            loco.follow_path_to(grid, pos.0, player_pos);
                            c.since_repath = 0.0;
                        }
                    } else {
                        loco.go_to(player_pos);
                    }
                }

                c.since_attack += dt;
                let swinging = !c.swing.finished(now);
                if !swinging && dist < c.attack_range && c.since_attack >= c.attack_cooldown {
                    c.swing.start(now);
                    c.since_attack = 0.0;
                    acts.push(Action::DamagePlayer(c.damage));
                }

                billboard.layers[0].tex = Some(c.walk.frame(now));
                if billboard.layers.len() > 1 {
                    billboard.layers[1] = if c.swing.finished(now) {
                        SpriteLayer::hidden()
                    } else {
                        SpriteLayer::new(c.swing.frame(now))
                    };
                }
            }

            Behavior::Pickup(p) => {
                billboard.v_offset = p.base_v_offset - (now.sin() + 1.0) * p.bob;
                if pos.0.distance(player_pos) < p.radius {
                    acts.push(Action::Collect(p.value));
                    acts.push(Action::Despawn(ent));
                }
            }
        }

        // mirror the first layer when moving rightward across the view
        let cam_movement = inv * loco.movement();
        billboard.layers[0].flip_x = cam_movement.x > 0.0;
    }

    acts
}

/* ================================================================= */
/*  Locomotion                                                       */
/* ================================================================= */

pub fn locomotion_system(world: &mut World, grid: &GridMap, dt: f32) {
    for (_, (pos, loco, flags)) in
        world.query_mut::<(&mut Position, &mut Locomotion, &ActorFlags)>()
    {
        let clip = flags.contains(ActorFlags::CLIPPING).then_some(grid);
        loco.tick(&mut pos.0, dt, clip);
    }
}

/* ================================================================= */
/*  Hit-scan weapon                                                  */
/* ================================================================= */

/// One trigger pull: every shootable billboard whose camera-space extent
/// covers the crosshair is damaged, provided the range-limited cast at
/// it reports no wall first.
pub fn fire_weapon(
    world: &mut World,
    camera: &Camera,
    grid: &GridMap,
    bank: &TextureBank,
) -> Actions {
    let mut acts = Actions::new();

    for (ent, (pos, health, billboard, flags)) in
        world.query_mut::<(&Position, &mut Health, &Billboard, &ActorFlags)>()
    {
        if !flags.contains(ActorFlags::SHOOTABLE) {
            continue;
        }

        let t = camera.to_cam(pos.0);
        if t.y <= 0.0 {
            continue;
        }

        // apparent billboard width from the first layer's aspect,
        // shrinking with depth like the projected sprite does
        let Some(tex_id) = billboard.layers[0].tex else {
            continue;
        };
        let Ok(tex) = bank.texture(tex_id) else {
            continue;
        };
        let width = billboard.scale / t.y * tex.w as f32 / tex.h as f32;
        if t.x.abs() >= width * 0.5 {
            continue; // crosshair off the target
        }

        let dist = pos.0.distance(camera.pos);
        if dist > WEAPON_RANGE {
            continue;
        }
        let blocked = raycast::cast(camera.pos, camera.forward(), grid, dist);
        if blocked.hit {
            continue; // wall between muzzle and target
        }

        if health.take_hit(WEAPON_DAMAGE) {
            acts.push(Action::Despawn(ent));
        }
    }

    acts
}

/* ================================================================= */
/*  Frame sprite list                                                */
/* ================================================================= */

/// Snapshot every billboard into the renderer's draw list.
pub fn collect_sprites(world: &World, out: &mut Vec<Sprite>) {
    out.clear();
    for (_, (pos, billboard)) in &mut world.query::<(&Position, &Billboard)>() {
        out.push(billboard.sprite(pos.0));
    }
}
