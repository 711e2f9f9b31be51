//! Player-controlled movement: one `InputCmd` per frame in, a rotated,
//! collision-clamped camera out.

use glam::Vec2;

use crate::config::Config;
use crate::nav;
use crate::world::{Camera, GridMap};

/// Radians of turn per mouse count before sensitivity scaling.
pub const MOUSE_SPEED_FACTOR: f32 = 0.005;

/// Everything the update phase needs from the input devices for one
/// frame, already mapped through the key bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (keys; left / right)
    pub mouse_dx: f32,
    pub run: bool,
    pub fire: bool,
}

/// Apply one frame of player input to the camera.
pub fn player_move(cmd: &InputCmd, camera: &mut Camera, config: &Config, grid: &GridMap, dt: f32) {
    /* rotation first so the displacement uses the new basis */
    let turn = cmd.turn * config.turn_speed * dt
        + cmd.mouse_dx * MOUSE_SPEED_FACTOR * config.mouse_sensitivity;
    if turn != 0.0 {
        camera.rotate(turn);
    }

    let wish = camera.forward() * cmd.forward + camera.right() * cmd.strafe;
    // normalize_or_zero: an idle or self-cancelling input is a no-op,
    // and diagonals do not outrun straight lines
    let dir = wish.normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }

    let speed = if cmd.run { config.run_speed } else { config.walk_speed };
    let delta = dir * speed * dt;
    camera.pos += nav::clip_displacement(grid, camera.pos, delta);
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> GridMap {
        #[rustfmt::skip]
        let cells = vec![
            1, 1, 1, 1, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 1,
            1, 1, 1, 1, 1,
        ];
        GridMap::from_cells(5, 5, cells)
    }

    fn setup() -> (Camera, Config, GridMap) {
        (
            Camera::new(Vec2::new(2.5, 2.5), Vec2::X, 0.66),
            Config::default(),
            room(),
        )
    }

    #[test]
    fn forward_moves_along_facing() {
        let (mut cam, cfg, grid) = setup();
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };
        player_move(&cmd, &mut cam, &cfg, &grid, 0.1);
        assert!(cam.pos.x > 2.5);
        assert!((cam.pos.y - 2.5).abs() < 1e-6);
    }

    #[test]
    fn cancelling_input_is_a_no_op() {
        let (mut cam, cfg, grid) = setup();
        let cmd = InputCmd {
            forward: 1.0,
            strafe: 0.0,
            ..Default::default()
        };
        let opposing = InputCmd {
            forward: -1.0,
            ..cmd
        };
        // forward + back pressed together must not produce NaN drift
        let both = InputCmd {
            forward: cmd.forward + opposing.forward,
            ..cmd
        };
        player_move(&both, &mut cam, &cfg, &grid, 0.1);
        assert_eq!(cam.pos, Vec2::new(2.5, 2.5));
    }

    #[test]
    fn diagonal_speed_matches_straight() {
        let (mut cam, cfg, grid) = setup();
        let start = cam.pos;
        let cmd = InputCmd {
            forward: 1.0,
            strafe: 1.0,
            ..Default::default()
        };
        player_move(&cmd, &mut cam, &cfg, &grid, 0.1);
        let moved = cam.pos.distance(start);
        assert!((moved - cfg.walk_speed * 0.1).abs() < 1e-5);
    }

    #[test]
    fn walls_stop_the_player() {
        let (mut cam, cfg, grid) = setup();
        let cmd = InputCmd {
            forward: 1.0,
            run: true,
            ..Default::default()
        };
        // sprint at the east wall for a while; never pass x = 4.0
        for _ in 0..120 {
            player_move(&cmd, &mut cam, &cfg, &grid, 1.0 / 30.0);
        }
        assert!(cam.pos.x < 4.0);
        assert!(cam.pos.x > 3.9);
    }

    #[test]
    fn turning_rotates_the_basis() {
        let (mut cam, cfg, grid) = setup();
        let cmd = InputCmd {
            turn: 1.0,
            ..Default::default()
        };
        player_move(&cmd, &mut cam, &cfg, &grid, 0.25);
        let expected = cfg.turn_speed * 0.25;
        assert!((cam.forward().angle_to(Vec2::X).abs() - expected).abs() < 1e-5);
    }
}
