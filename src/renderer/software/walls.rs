//! Wall projector: one ray per screen column, textured slice per hit.

use crate::raycast::{self, Orientation};
use crate::renderer::{Rgba, software::Software};
use crate::world::{Camera, GridMap, NO_TEXTURE, TextureBank};

/// Below this distance the slice height is pinned to the full screen;
/// stops the near-zero division from exploding texture upscaling.
const NEAR_LIMIT: f32 = 0.01;

/// East-west faces are drawn darker so adjoining walls read as corners.
#[inline]
fn shade(rgba: Rgba) -> Rgba {
    (rgba & 0xFF_00_00_00) | ((rgba >> 1) & 0x00_7F_7F_7F)
}

impl Software {
    pub(super) fn draw_walls(&mut self, grid: &GridMap, camera: &Camera, bank: &TextureBank) {
        for x in 0..self.width {
            let camera_x = x as f32 / self.width_f - 0.5;
            let dir = camera.forward() + camera.plane() * camera_x;

            let info = raycast::cast(camera.pos, dir, grid, f32::INFINITY);
            self.depth[x] = info.perp_dist;
            if !info.hit {
                continue;
            }

            /* projected slice height; may exceed the screen, the draw
            range below clips while the texture mapping stays correct */
            let line_h = if info.perp_dist <= NEAR_LIMIT {
                self.height_f
            } else {
                self.height_f / info.perp_dist
            };

            /* horizontal texture coordinate: fractional part on the axis
            running along the wall face */
            let along = match info.orientation {
                Orientation::NorthSouth => info.collision.y,
                Orientation::EastWest => info.collision.x,
            };
            let wall_x = along.fract();

            let code = grid.code(info.cell.0 as usize, info.cell.1 as usize);
            let tex_id = self.wall_tex.get(&code).copied().unwrap_or(NO_TEXTURE);
            let Ok(tex) = bank.texture(tex_id) else {
                continue;
            };

            let tex_x = ((wall_x * tex.w as f32) as usize).min(tex.w - 1);
            let strip = tex.column(tex_x);

            /* vertically centred slice, clipped to the screen */
            let top = (self.height_f - line_h) * 0.5;
            let y0 = top.max(0.0) as usize;
            let y1 = ((self.height_f + line_h) * 0.5).min(self.height_f) as usize;

            let v_step = tex.h as f32 / line_h;
            let mut v_f = (y0 as f32 - top) * v_step;

            let dark = info.orientation == Orientation::EastWest;
            for y in y0..y1 {
                let texel = strip[(v_f as usize).min(tex.h - 1)];
                self.put(x, y, if dark { shade(texel) } else { texel });
                v_f += v_step;
            }
        }
    }
}
