use bitflags::bitflags;
use glam::Vec2;
use smallvec::SmallVec;

use crate::world::{Sprite, SpriteLayer, TextureId};

/// World-space position on the grid plane.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

bitflags! {
    #[derive(Debug, Clone, Copy)]
    pub struct ActorFlags: u8 {
        /// Displacements are clamped against walls; unset = noclip.
        const CLIPPING  = 0x01;
        /// Valid target for the hit-scan weapon.
        const SHOOTABLE = 0x02;
        /// Collected on contact with the player.
        const PICKUP    = 0x04;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage; returns `true` when this kills.
    pub fn take_hit(&mut self, damage: f32) -> bool {
        self.current -= damage;
        self.current <= 0.0
    }
}

/// Render-facing half of an entity: layer stack, scale, height offset.
/// `sprite()` snapshots it into the frame's draw list.
#[derive(Debug, Clone)]
pub struct Billboard {
    pub layers: SmallVec<[SpriteLayer; 2]>,
    pub scale: f32,
    pub v_offset: f32,
}

impl Billboard {
    pub fn new(tex: TextureId, scale: f32) -> Self {
        Self {
            layers: smallvec::smallvec![SpriteLayer::new(tex)],
            scale,
            v_offset: Sprite::floor_offset(scale),
        }
    }

    pub fn sprite(&self, pos: Vec2) -> Sprite {
        Sprite {
            pos,
            layers: self.layers.clone(),
            scale: self.scale,
            v_offset: self.v_offset,
        }
    }
}

/// Looping or one-shot frame sequence selected by elapsed time.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: SmallVec<[TextureId; 8]>,
    pub framerate: f32,
    pub looping: bool,
    started: Option<f32>,
}

impl Animation {
    pub fn new<I: IntoIterator<Item = TextureId>>(frames: I) -> Self {
        let frames: SmallVec<[TextureId; 8]> = frames.into_iter().collect();
        assert!(!frames.is_empty(), "animation needs at least one frame");
        Self {
            frames,
            framerate: 10.0,
            looping: true,
            started: None,
        }
    }

    pub fn one_shot<I: IntoIterator<Item = TextureId>>(frames: I) -> Self {
        let mut a = Self::new(frames);
        a.looping = false;
        a
    }

    /// (Re)start the sequence at time `now` (seconds).
    pub fn start(&mut self, now: f32) {
        self.started = Some(now);
    }

    pub fn stop(&mut self) {
        self.started = None;
    }

    /// A one-shot that ran past its last frame, or one never started.
    pub fn finished(&self, now: f32) -> bool {
        match self.started {
            Some(t0) => !self.looping && (now - t0) * self.framerate >= self.frames.len() as f32,
            None => true,
        }
    }

    /// Frame for time `now`; one-shots hold their last frame.
    pub fn frame(&self, now: f32) -> TextureId {
        let t0 = self.started.unwrap_or(now);
        let idx = ((now - t0) * self.framerate) as usize;
        let idx = if self.looping {
            idx % self.frames.len()
        } else {
            idx.min(self.frames.len() - 1)
        };
        self.frames[idx]
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
