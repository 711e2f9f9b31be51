//! First-person playable demo: software raycaster + agent sim.
//!
//! ```bash
//! cargo run --release --bin play_sw -- [--map level.bin]
//! ```
//!
//! Controls  W/S = forward/back  A/D = strafe  ←/→ = turn
//!           Shift = run  Ctrl = fire  M = map overlay  Esc = quit

use clap::Parser;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use std::path::PathBuf;
use std::time::Instant;

use glam::Vec2;

use gloomcast_rs::audio::NullSound;
use gloomcast_rs::config::{Config, EscapeBehaviour};
use gloomcast_rs::hooks::{FpsLog, FrameHooks, NoHooks};
use gloomcast_rs::renderer::{Renderer, Software};
use gloomcast_rs::sim::{Animation, InputCmd, Sim, player_move};
use gloomcast_rs::world::{Camera, GridMap, Texture, TextureBank, TextureId};

const W: usize = 1024;
const H: usize = 640;
const PLANE_RATIO: f32 = 0.66;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Binary map file; omitted = built-in demo level
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// RNG seed for agent wandering
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Mouse look sensitivity multiplier
    #[arg(long, default_value_t = 1.0)]
    sensitivity: f32,

    /// Escape unlocks the mouse instead of quitting
    #[arg(long)]
    escape_unlocks: bool,

    /// Print a rolling frame-time average
    #[arg(long)]
    fps: bool,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let grid = match &opts.map {
        Some(path) => GridMap::from_file(path)?,
        None => demo_map(),
    };

    let mut config = Config::default();
    config.mouse_sensitivity = opts.sensitivity;
    if opts.escape_unlocks {
        config.escape_behaviour = EscapeBehaviour::UnlockMouse;
    }

    /* ----- textures -------------------------------------------------- */
    let mut bank = TextureBank::default_with_checker();
    let stone = bank.insert("STONE", brick("STONE", 0xFF_6A6A72, 0xFF_3A3A40))?;
    let moss = bank.insert("MOSS", brick("MOSS", 0xFF_4F6A4A, 0xFF_2E4030))?;
    let iron = bank.insert("IRON", brick("IRON", 0xFF_56505E, 0xFF_201C26))?;
    let rat = [
        bank.insert("RAT0", blob("RAT0", 0xFF_8A6A50, 5))?,
        bank.insert("RAT1", blob("RAT1", 0xFF_7A5A44, 6))?,
    ];
    let bones = [
        bank.insert("BONES0", figure("BONES0", 0xFF_D8D8C8))?,
        bank.insert("BONES1", figure("BONES1", 0xFF_BCBCAC))?,
    ];
    let swing_tex = bank.insert("SWING", blob("SWING", 0xFF_E0E0E0, 7))?;
    let coin = bank.insert("COIN", blob("COIN", 0xFF_E8C030, 4))?;
    let pistol_tex = [
        bank.insert("PISTOL0", pistol("PISTOL0", false))?,
        bank.insert("PISTOL1", pistol("PISTOL1", true))?,
    ];

    let mut renderer = Software::default();
    renderer.map_wall_texture(1, stone);
    renderer.map_wall_texture(2, moss);
    renderer.map_wall_texture(3, iron);

    /* ----- world ------------------------------------------------------ */
    let mut camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::X, PLANE_RATIO);

    let mut sim = Sim::new(opts.seed);
    for pos in [Vec2::new(8.5, 2.5), Vec2::new(3.5, 8.5)] {
        sim.spawn_wanderer(
            pos,
            1.2,
            0.4,
            1.5,
            looping(&rat, 6.0),
            looping(&rat[..1], 1.0),
        );
    }
    sim.spawn_chaser(
        Vec2::new(13.5, 9.5),
        1.8,
        0.9,
        1.0,
        5.0,
        looping(&bones, 4.0),
        Animation::one_shot([swing_tex, swing_tex]),
    );
    for pos in [
        Vec2::new(5.5, 1.5),
        Vec2::new(10.5, 5.5),
        Vec2::new(14.5, 2.5),
    ] {
        sim.spawn_pickup(pos, coin, 0.25, 1);
    }
    let barrel = bank.insert("BARREL", blob("BARREL", 0xFF_705038, 6))?;
    sim.spawn_prop(Vec2::new(6.5, 7.5), barrel, 0.6);

    let mut sink = NullSound;

    /* ----- window ----------------------------------------------------- */
    let mut win = Window::new("Gloomcast", W, H, WindowOptions::default())?;
    win.set_target_fps(60);

    let mut hooks_fps = FpsLog::default();
    let mut hooks_none = NoHooks;
    let hooks: &mut dyn FrameHooks = if opts.fps {
        &mut hooks_fps
    } else {
        &mut hooks_none
    };

    let mut mouse_locked = true;
    let mut last_mouse_x: Option<f32> = None;
    let mut show_map = false;
    let mut map_buf = vec![0u32; W * H];
    let mut frame = Vec::new();
    let mut last_hud = (sim.player_health as i32, sim.coins);

    // refire rate = one-shot length: 2 frames at 5 fps = 0.4 s
    let mut pistol = Animation::one_shot([pistol_tex[1], pistol_tex[0]]);
    pistol.framerate = 5.0;

    let keymap = config.keymap;

    /*========================== main loop ==========================*/
    while win.is_open() {
        hooks.frame_start();
        let t0 = Instant::now();
        let dt = 1.0 / 60.0;

        /* --------------- input --------------------------------------- */
        if win.is_key_pressed(Key::Escape, KeyRepeat::No) {
            match config.escape_behaviour {
                EscapeBehaviour::Quit => break,
                EscapeBehaviour::UnlockMouse => mouse_locked = false,
            }
        }
        if win.is_key_pressed(keymap.toggle_map, KeyRepeat::No) {
            show_map = !show_map;
        }

        let mut cmd = InputCmd::default();
        if win.is_key_down(keymap.forward) {
            cmd.forward += 1.0;
        }
        if win.is_key_down(keymap.back) {
            cmd.forward -= 1.0;
        }
        if win.is_key_down(keymap.left) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(keymap.right) {
            cmd.strafe += 1.0;
        }
        if win.is_key_down(keymap.turn_left) {
            cmd.turn -= 1.0;
        }
        if win.is_key_down(keymap.turn_right) {
            cmd.turn += 1.0;
        }
        cmd.run = win.is_key_down(keymap.run);
        cmd.fire = win.is_key_pressed(keymap.fire, KeyRepeat::No);

        if let Some((mx, _)) = win.get_mouse_pos(MouseMode::Pass) {
            if mouse_locked {
                cmd.mouse_dx = mx - last_mouse_x.unwrap_or(mx);
            } else if win.get_mouse_down(minifb::MouseButton::Left) {
                mouse_locked = true;
            }
            last_mouse_x = Some(mx);
        }

        /* --------------- update -------------------------------------- */
        player_move(&cmd, &mut camera, &config, &grid, dt);
        if cmd.fire && pistol.finished(sim.elapsed()) {
            pistol.start(sim.elapsed());
            sim.fire(&camera, &grid, &bank);
        }
        sim.update(&grid, &camera, dt);
        sim.drain_sounds(&mut sink);

        let hud = (sim.player_health as i32, sim.coins);
        if hud != last_hud {
            println!("health {:>3}   coins {}", hud.0, hud.1);
            last_hud = hud;
        }
        if sim.player_dead() {
            println!("you died");
            break;
        }

        /* --------------- draw ----------------------------------------- */
        if show_map {
            draw_overlay_map(&mut map_buf, &grid, &camera);
            win.update_with_buffer(&map_buf, W, H)?;
        } else {
            renderer.begin_frame(W, H);
            renderer.draw_world(&grid, sim.sprites(), &camera, &bank);
            let now = sim.elapsed();
            let weapon = if pistol.finished(now) {
                pistol_tex[0]
            } else {
                pistol.frame(now)
            };
            let mut present = Ok(());
            renderer.end_frame(|fb, w, h| {
                frame.clear();
                frame.extend_from_slice(fb);
                if let Ok(tex) = bank.texture(weapon) {
                    draw_weapon(&mut frame, w, h, tex);
                }
                draw_crosshair(&mut frame, w, h);
                present = win.update_with_buffer(&frame, w, h);
            });
            present?;
        }

        hooks.frame_end(t0.elapsed());
    }
    Ok(())
}

/* ------------------------------------------------------------------ */
/*  demo content                                                       */
/* ------------------------------------------------------------------ */

fn looping(frames: &[TextureId], framerate: f32) -> Animation {
    let mut a = Animation::new(frames.iter().copied());
    a.framerate = framerate;
    a.start(0.0);
    a
}

#[rustfmt::skip]
fn demo_map() -> GridMap {
    const M: &[&[u8]] = &[
        &[1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
        &[1,0,0,0,0,0,0,2,0,0,0,0,0,0,0,1],
        &[1,0,0,0,0,0,0,2,0,0,0,0,0,0,0,1],
        &[1,0,0,3,3,0,0,2,0,0,2,2,2,0,0,1],
        &[1,0,0,3,0,0,0,0,0,0,0,0,2,0,0,1],
        &[1,0,0,3,0,0,0,0,0,0,0,0,2,0,0,1],
        &[1,0,0,3,3,3,0,0,0,2,2,0,2,0,0,1],
        &[1,0,0,0,0,0,0,0,0,2,0,0,0,0,0,1],
        &[1,0,0,0,0,0,0,0,0,2,0,0,0,0,0,1],
        &[1,0,1,1,1,0,0,0,0,2,0,0,0,0,0,1],
        &[1,0,0,0,1,0,0,0,0,0,0,0,0,0,0,1],
        &[1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    ];
    let cells = M.iter().flat_map(|r| r.iter().copied()).collect();
    GridMap::from_cells(M.len(), M[0].len(), cells)
}

const TEX_SIDE: usize = 16;

/// Brick pattern: base colour with mortar rows and staggered joints.
fn brick(name: &str, base: u32, mortar: u32) -> Texture {
    let mut px = vec![base; TEX_SIDE * TEX_SIDE];
    for y in 0..TEX_SIDE {
        for x in 0..TEX_SIDE {
            let course = y / 4;
            let joint = (x + course * 4) % 8 == 0;
            if y % 4 == 0 || joint {
                px[y * TEX_SIDE + x] = mortar;
            }
        }
    }
    Texture::new(name, TEX_SIDE, TEX_SIDE, px)
}

/// Filled disc on a transparent field.
fn blob(name: &str, colour: u32, radius: usize) -> Texture {
    let mut px = vec![0u32; TEX_SIDE * TEX_SIDE];
    let c = TEX_SIDE as i32 / 2;
    let r2 = (radius * radius) as i32;
    for y in 0..TEX_SIDE {
        for x in 0..TEX_SIDE {
            let dx = x as i32 - c;
            let dy = y as i32 - c;
            if dx * dx + dy * dy <= r2 {
                px[y * TEX_SIDE + x] = colour;
            }
        }
    }
    Texture::new(name, TEX_SIDE, TEX_SIDE, px)
}

/// Crude biped silhouette on a transparent field.
fn figure(name: &str, colour: u32) -> Texture {
    let mut px = vec![0u32; TEX_SIDE * TEX_SIDE];
    let mut put = |x: usize, y: usize| px[y * TEX_SIDE + x] = colour;
    for y in 2..5 {
        for x in 6..10 {
            put(x, y); // head
        }
    }
    for y in 5..11 {
        for x in 5..11 {
            put(x, y); // torso + arms
        }
    }
    for y in 11..15 {
        put(6, y);
        put(9, y); // legs
    }
    Texture::new(name, TEX_SIDE, TEX_SIDE, px)
}

/// Side-view pistol on a transparent field; `flash` adds a muzzle burst.
fn pistol(name: &str, flash: bool) -> Texture {
    const STEEL: u32 = 0xFF_44444C;
    const GRIP: u32 = 0xFF_2A1E14;
    const FLASH: u32 = 0xFF_FFD860;
    let mut px = vec![0u32; TEX_SIDE * TEX_SIDE];
    for y in 6..9 {
        for x in 2..13 {
            px[y * TEX_SIDE + x] = STEEL; // barrel
        }
    }
    for y in 9..15 {
        for x in 9..12 {
            px[y * TEX_SIDE + x] = GRIP;
        }
    }
    if flash {
        for (x, y) in [(1, 5), (0, 7), (1, 7), (2, 7), (1, 9)] {
            px[y * TEX_SIDE + x] = FLASH;
        }
    }
    Texture::new(name, TEX_SIDE, TEX_SIDE, px)
}

/// Top-down overlay: walls, grid gaps, player dot and facing tick.
fn draw_overlay_map(buf: &mut [u32], grid: &GridMap, camera: &Camera) {
    buf.fill(0xFF_101010);
    let scale =
        (W as f32 / grid.cols() as f32).min(H as f32 / grid.rows() as f32) * 0.9;
    let off_x = (W as f32 - grid.cols() as f32 * scale) * 0.5;
    let off_y = (H as f32 - grid.rows() as f32 * scale) * 0.5;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let colour = if grid.code(row, col) != 0 {
                0xFF_C8C8C8
            } else {
                0xFF_242424
            };
            let x0 = (off_x + col as f32 * scale) as usize;
            let y0 = (off_y + row as f32 * scale) as usize;
            let side = (scale as usize).max(1);
            for y in y0..(y0 + side - 1).min(H) {
                for x in x0..(x0 + side - 1).min(W) {
                    buf[y * W + x] = colour;
                }
            }
        }
    }

    // player dot plus a short facing tick
    let px = off_x + camera.pos.x * scale;
    let py = off_y + camera.pos.y * scale;
    for step in 0..(scale as i32) {
        let tip = Vec2::new(px, py) + camera.forward() * step as f32;
        plot(buf, tip.x as i32, tip.y as i32, 0xFF_E03030);
    }
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            plot(buf, px as i32 + dx, py as i32 + dy, 0xFF_30C030);
        }
    }
}

/// Small plus-shaped crosshair composited over the finished frame.
fn draw_crosshair(buf: &mut [u32], w: usize, h: usize) {
    const ARM: i32 = 6;
    const GAP: i32 = 2;
    let (cx, cy) = (w as i32 / 2, h as i32 / 2);
    for d in GAP..=ARM {
        for (x, y) in [(cx + d, cy), (cx - d, cy), (cx, cy + d), (cx, cy - d)] {
            if (0..w as i32).contains(&x) && (0..h as i32).contains(&y) {
                buf[y as usize * w + x as usize] = 0xFF_F0F0F0;
            }
        }
    }
}

/// Weapon sprite scaled to a third of the screen height and composited
/// bottom-centre over the finished frame. Zero-alpha texels are skipped.
fn draw_weapon(buf: &mut [u32], w: usize, h: usize, tex: &Texture) {
    let dst_h = h / 3;
    let dst_w = dst_h * tex.w / tex.h;
    if dst_h == 0 || dst_w == 0 || dst_w > w {
        return;
    }
    let x0 = (w - dst_w) / 2;
    let y0 = h - dst_h;
    for dy in 0..dst_h {
        let src_y = dy * tex.h / dst_h;
        for dx in 0..dst_w {
            let src_x = dx * tex.w / dst_w;
            let texel = tex.pixels[src_y * tex.w + src_x];
            if texel >> 24 != 0 {
                buf[(y0 + dy) * w + x0 + dx] = texel;
            }
        }
    }
}

fn plot(buf: &mut [u32], x: i32, y: i32, colour: u32) {
    if (0..W as i32).contains(&x) && (0..H as i32).contains(&y) {
        buf[y as usize * W + x as usize] = colour;
    }
}

/*============================== tests ==============================*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_overlay_lands_bottom_centre() {
        const INK: u32 = 0xFF_112233;
        let tex = Texture::new(
            "GUN",
            3,
            3,
            vec![0, INK, 0, INK, INK, INK, 0, INK, 0],
        );
        let mut buf = vec![0u32; 90 * 90];
        draw_weapon(&mut buf, 90, 90, &tex);

        // 30x30 destination at x 30..60, y 60..90; centre texel is opaque
        assert_eq!(buf[75 * 90 + 45], INK);
        // transparent corner texel leaves the frame untouched
        assert_eq!(buf[62 * 90 + 32], 0);
        // nothing above the overlay band
        assert_eq!(buf[30 * 90 + 45], 0);
    }

    #[test]
    fn weapon_overlay_skips_degenerate_frames() {
        let tex = Texture::new("GUN", 2, 2, vec![0xFF_FFFFFF; 4]);
        let mut buf = vec![0u32; 4];
        draw_weapon(&mut buf, 2, 2, &tex);
        assert!(buf.iter().all(|&px| px == 0));
    }

    #[test]
    fn pistol_frames_share_a_silhouette() {
        let idle = pistol("PISTOL0", false);
        let fire = pistol("PISTOL1", true);
        // firing only adds texels, never removes the gun itself
        for (a, b) in idle.pixels.iter().zip(&fire.pixels) {
            if *a != 0 {
                assert_eq!(a, b);
            }
        }
        assert!(fire.pixels.iter().filter(|&&px| px != 0).count()
            > idle.pixels.iter().filter(|&&px| px != 0).count());
    }
}
