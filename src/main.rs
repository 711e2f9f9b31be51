//! Minimal top-down map viewer.
//!
//! ```bash
//! cargo run --release --bin gloomcast_rs -- <map.bin>
//! ```

use minifb::{Key, Window, WindowOptions};
use std::error::Error;

use gloomcast_rs::world::GridMap;

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;

const WALL_RGB: u32 = 0x00_FFFFFF;
const GRID_RGB: u32 = 0x00_303030;

fn main() -> Result<(), Box<dyn Error>> {
    // ─────────── parse CLI ────────────
    let mut args = std::env::args().skip(1);
    let map_path = args.next().expect("usage: <prog> <map.bin>");

    // ─────────── load map ─────────────
    let grid = GridMap::from_file(&map_path)?;
    println!("{}: {} x {} cells", map_path, grid.rows(), grid.cols());

    // ─────────── cell-space → screen-space transform ────────────
    let scale = (WIDTH as f32 / grid.cols() as f32).min(HEIGHT as f32 / grid.rows() as f32) * 0.9; // 10 % margin
    let offset_x = ((WIDTH as f32 - grid.cols() as f32 * scale) / 2.0) as usize;
    let offset_y = ((HEIGHT as f32 - grid.rows() as f32 * scale) / 2.0) as usize;

    // ─────────── rasterise cells ────────────
    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let colour = if grid.code(row, col) != 0 {
                WALL_RGB
            } else {
                GRID_RGB
            };
            fill_cell(&mut buffer, row, col, scale, offset_x, offset_y, colour);
        }
    }

    // ─────────── show window ────────────
    let mut window = Window::new("Grid map", WIDTH, HEIGHT, WindowOptions::default())?;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

/// Paint one cell as a filled square with a 1 px gap for the grid lines.
fn fill_cell(
    buf: &mut [u32],
    row: usize,
    col: usize,
    scale: f32,
    off_x: usize,
    off_y: usize,
    colour: u32,
) {
    let x0 = off_x + (col as f32 * scale) as usize;
    let y0 = off_y + (row as f32 * scale) as usize;
    let side = (scale as usize).max(1);
    for y in y0..(y0 + side - 1).min(HEIGHT) {
        for x in x0..(x0 + side - 1).min(WIDTH) {
            buf[y * WIDTH + x] = colour;
        }
    }
}
