//! Sprite projector: billboards transformed into camera space, painted
//! back-to-front, depth-tested per column against the wall pass.

use glam::Vec2;

use crate::renderer::software::Software;
use crate::world::{Camera, Sprite, TextureBank};

/// One sprite that survived the behind-camera cull.
pub(super) struct VisSprite {
    /// Index into the frame's sprite slice.
    idx: usize,
    /// Camera-space position: `.x` lateral, `.y` depth.
    t: Vec2,
    /// Squared world distance, the painter's sort key.
    dist2: f32,
}

impl Software {
    pub(super) fn draw_sprites(&mut self, sprites: &[Sprite], camera: &Camera, bank: &TextureBank) {
        let inv = camera.inv_matrix();

        let mut vis = std::mem::take(&mut self.vis);
        vis.clear();
        for (idx, s) in sprites.iter().enumerate() {
            let rel = s.pos - camera.pos;
            let t = inv * rel;
            if t.y <= 0.0 {
                continue; // behind the camera plane
            }
            vis.push(VisSprite {
                idx,
                t,
                dist2: rel.length_squared(),
            });
        }

        /* far-to-near painter's order; sprite-vs-sprite overlap within a
        column is resolved by this order alone */
        vis.sort_by(|a, b| b.dist2.total_cmp(&a.dist2));

        for v in &vis {
            let s = &sprites[v.idx];
            for layer in &s.layers {
                let Some(tex_id) = layer.tex else {
                    continue;
                };
                let Ok(tex) = bank.texture(tex_id) else {
                    continue;
                };

                let sprite_h = (self.height_f / v.t.y * s.scale).abs().min(self.height_f);
                if sprite_h < 1.0 {
                    continue;
                }
                let sprite_w = sprite_h * tex.w as f32 / tex.h as f32;

                let x_left = self.half_w * (1.0 + 2.0 * v.t.x / v.t.y) - sprite_w * 0.5;
                let x0 = x_left.floor() as i32;
                let x1 = (x_left + sprite_w).ceil() as i32;
                if x1 < 0 || x0 >= self.width as i32 {
                    continue; // completely off-screen
                }

                // height offset shrinks with depth like everything else
                let v_move = s.v_offset * self.half_h / v.t.y;
                let y_top = (self.height_f - sprite_h) * 0.5 + v_move;
                let y0 = y_top.max(0.0) as usize;
                let y1 = ((y_top + sprite_h).min(self.height_f).max(0.0)) as usize;
                if y0 >= y1 {
                    continue;
                }

                let v_step = tex.h as f32 / sprite_h;

                for x in x0.max(0)..x1.min(self.width as i32) {
                    let x = x as usize;
                    // nearer wall in this column wins
                    if v.t.y >= self.depth_at(x) {
                        continue;
                    }

                    let mut u = ((x as f32 - x_left) / sprite_w * tex.w as f32) as usize;
                    u = u.min(tex.w - 1);
                    if layer.flip_x {
                        u = tex.w - 1 - u;
                    }
                    let strip = tex.column(u);

                    let mut v_f = (y0 as f32 - y_top) * v_step;
                    for y in y0..y1 {
                        let texel = strip[(v_f as usize).min(tex.h - 1)];
                        if texel >> 24 != 0 {
                            self.put(x, y, texel);
                        }
                        v_f += v_step;
                    }
                }
            }
        }
        self.vis = vis;
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
