//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! The game hands the immutable world (grid + sprites + camera) to a
//! type that implements [`Renderer`]; the software back-end rasterises
//! it into a CPU frame the window layer presents.
//!
//! The wall pass and sprite pass of one frame are a single `draw_world`
//! call on purpose: the per-column depth buffer written by the wall pass
//! is only valid for the sprite pass that immediately follows it.

mod software;

pub use software::Software;

use crate::world::{Camera, GridMap, Sprite, TextureBank};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

pub trait Renderer {
    /// Reset per-frame state; `w`/`h` may change on window resize.
    fn begin_frame(&mut self, w: usize, h: usize);

    /// Rasterise walls, then depth-tested sprites, in that order.
    fn draw_world(
        &mut self,
        grid: &GridMap,
        sprites: &[Sprite],
        camera: &Camera,
        bank: &TextureBank,
    );

    /// Hand the finished frame to the presentation surface.
    fn end_frame<F: FnMut(&[Rgba], usize, usize)>(&mut self, present: F);
}
