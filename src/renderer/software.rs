//! Software rasteriser: one DDA cast per screen column, flat-filled
//! ceiling/floor halves, billboard sprites depth-tested against the
//! per-column wall distances.

mod sprites;
mod walls;

use std::collections::HashMap;

use crate::renderer::{Renderer, Rgba};
use crate::world::{Camera, GridMap, Sprite, TextureBank, TextureId};

use sprites::VisSprite;

const CEILING_RGB: Rgba = 0xFF_28_28_30;
const FLOOR_RGB: Rgba = 0xFF_4A_42_38;

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,

    /// One perpendicular wall distance per screen column, rewritten in
    /// full by every wall pass.  Sprites within a column are resolved by
    /// back-to-front paint order only – a deliberate 1-D approximation,
    /// not a per-pixel depth buffer.
    depth: Vec<f32>,

    /// Wall variant code → texture handle.
    wall_tex: HashMap<u8, TextureId>,

    /// Scratch list reused across frames by the sprite pass.
    vis: Vec<VisSprite>,

    width: usize,
    height: usize,
    width_f: f32,
    height_f: f32,
    half_w: f32,
    half_h: f32,
}

impl Software {
    /// Choose the texture drawn for wall cells carrying `code`.
    /// Unmapped codes fall back to the checkerboard.
    pub fn map_wall_texture(&mut self, code: u8, tex: TextureId) {
        self.wall_tex.insert(code, tex);
    }

    #[inline]
    pub(crate) fn depth_at(&self, column: usize) -> f32 {
        self.depth[column]
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, rgba: Rgba) {
        self.scratch[y * self.width + x] = rgba;
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.width_f = w as f32;
            self.height_f = h as f32;
            self.half_w = self.width_f * 0.5;
            self.half_h = self.height_f * 0.5;
            self.scratch.resize(w * h, 0);
            self.depth.resize(w, f32::INFINITY);
        }

        // flat ceiling / floor halves
        let split = self.height / 2 * self.width;
        self.scratch[..split].fill(CEILING_RGB);
        self.scratch[split..].fill(FLOOR_RGB);

        self.depth.fill(f32::INFINITY);
        self.vis.clear();
    }

    fn draw_world(
        &mut self,
        grid: &GridMap,
        sprites: &[Sprite],
        camera: &Camera,
        bank: &TextureBank,
    ) {
        // strict ordering: the sprite pass reads the depth buffer the
        // wall pass just wrote
        self.draw_walls(grid, camera, bank);
        self.draw_sprites(sprites, camera, bank);
    }

    fn end_frame<F: FnMut(&[Rgba], usize, usize)>(&mut self, mut present: F) {
        present(&self.scratch, self.width, self.height);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
