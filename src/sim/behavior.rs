//! Per-kind behavior strategies.
//!
//! Every agent moves through the one shared `nav::Locomotion`; what it
//! decides to do – wander, chase, get picked up – is a tagged variant
//! attached next to it, never a subclass of the movement code.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::components::Animation;

#[derive(Debug, Clone)]
pub enum Behavior {
    Wander(Wander),
    Chase(Chase),
    Pickup(Pickup),
}

/// Idle wanderer: waits out a cooldown, then walks to a uniformly random
/// reachable cell.  The cooldown bounds the flood-fill frequency when
/// many wanderers share a frame.
#[derive(Debug, Clone)]
pub struct Wander {
    /// Seconds to idle between wanders.
    pub cooldown: f32,
    pub idle_for: f32,
    /// Set by the locomotion arrival callback; consumed by the behavior
    /// system to restart the cooldown clock.
    pub arrived: Arc<AtomicBool>,
    pub walk: Animation,
    pub idle: Animation,
}

impl Wander {
    pub fn new(cooldown: f32, walk: Animation, idle: Animation) -> Self {
        Self {
            cooldown,
            idle_for: 0.0,
            arrived: Arc::new(AtomicBool::new(false)),
            walk,
            idle,
        }
    }

    /// Drain the arrival flag raised by the subscriber.
    pub fn take_arrival(&self) -> bool {
        self.arrived.swap(false, Ordering::Relaxed)
    }
}

/// Hostile chaser: heads straight for the player while there is line of
/// sight, falls back to BFS pathfinding when a wall blocks the view,
/// and swings inside melee range.
#[derive(Debug, Clone)]
pub struct Chase {
    pub attack_range: f32,
    pub damage: f32,
    /// Seconds between swings.
    pub attack_cooldown: f32,
    pub since_attack: f32,
    /// Throttle between BFS requests while the view stays blocked.
    pub repath_cooldown: f32,
    pub since_repath: f32,
    pub walk: Animation,
    /// One-shot swing overlay on the second sprite layer.
    pub swing: Animation,
}

impl Chase {
    pub fn new(attack_range: f32, damage: f32, walk: Animation, swing: Animation) -> Self {
        Self {
            attack_range,
            damage,
            attack_cooldown: 1.0,
            since_attack: f32::MAX,
            repath_cooldown: 0.5,
            since_repath: f32::MAX,
            walk,
            swing,
        }
    }
}

/// Contact pickup with a sinusoidal hover.
#[derive(Debug, Clone, Copy)]
pub struct Pickup {
    pub radius: f32,
    pub value: u32,
    /// Hover amplitude added onto the billboard's base height offset.
    pub bob: f32,
    pub base_v_offset: f32,
}
