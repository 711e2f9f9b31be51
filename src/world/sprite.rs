//! Billboard sprite description consumed by the sprite projector.

use glam::Vec2;
use smallvec::{SmallVec, smallvec};

use crate::world::texture::TextureId;

/// One compositing layer of a billboard (e.g. body + weapon-swing
/// overlay).  `tex = None` hides the layer for the frame.
#[derive(Clone, Copy, Debug)]
pub struct SpriteLayer {
    pub tex: Option<TextureId>,
    /// Mirror the strip horizontally; driven by movement direction
    /// relative to the camera.
    pub flip_x: bool,
}

impl SpriteLayer {
    pub fn new(tex: TextureId) -> Self {
        Self {
            tex: Some(tex),
            flip_x: false,
        }
    }

    pub fn hidden() -> Self {
        Self {
            tex: None,
            flip_x: false,
        }
    }
}

/// A flat, always-camera-facing textured quad in world space.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub pos: Vec2,
    /// Drawn in order; later layers composite over earlier ones.
    pub layers: SmallVec<[SpriteLayer; 2]>,
    /// 1.0 = one full wall height.
    pub scale: f32,
    /// Vertical shift in screen halves, scaled by camera-space depth at
    /// draw time (positive = down, toward the floor).
    pub v_offset: f32,
}

impl Sprite {
    pub fn new(pos: Vec2, tex: TextureId) -> Self {
        Self {
            pos,
            layers: smallvec![SpriteLayer::new(tex)],
            scale: 1.0,
            v_offset: 0.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        // small sprites sit on the floor rather than float mid-wall
        self.v_offset = Self::floor_offset(scale);
        self
    }

    pub fn with_v_offset(mut self, v_offset: f32) -> Self {
        self.v_offset = v_offset;
        self
    }

    pub fn with_layers(mut self, layers: SmallVec<[SpriteLayer; 2]>) -> Self {
        self.layers = layers;
        self
    }

    /// Offset that plants a `scale`-sized billboard on the floor line.
    #[inline]
    pub fn floor_offset(scale: f32) -> f32 {
        1.0 - scale
    }
}
