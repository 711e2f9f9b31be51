//! Continuous-motion state machine reconciling discrete path cells with
//! per-frame movement.
//!
//! One `Locomotion` is shared by every agent kind; what an agent *does*
//! on top of moving lives in a behavior strategy (`sim::behavior`), not
//! in a subclass.

use glam::Vec2;

use crate::nav::Path;
use crate::raycast;
use crate::world::GridMap;

/// Arrival is registered when the goal is nearer than this.
///
/// Must stay well above a single-tick displacement at the target frame
/// rate, or the agent oscillates around the goal instead of arriving.
pub const ARRIVAL_THRESHOLD: f32 = 0.3;

/// How far short of a wall a clipped displacement stops.
pub const COLLISION_EPS: f32 = 1e-4;

type ArrivalCallback = Box<dyn FnMut() + Send + Sync>;

/// States: *Idle* (no goal), *Pathfinding* (multi-cell path cursor),
/// *Moving* (single continuous goal).
pub struct Locomotion {
    goal: Vec2,
    path: Option<Path>,
    pathfinding: bool,
    moving: bool,
    speed: f32,
    /// Displacement committed last tick; the renderer reads this for
    /// camera-relative sprite facing.
    movement: Vec2,
    on_reached_goal: Vec<ArrivalCallback>,
}

impl Locomotion {
    pub fn new(speed: f32) -> Self {
        Self {
            goal: Vec2::ZERO,
            path: None,
            pathfinding: false,
            moving: false,
            speed,
            movement: Vec2::ZERO,
            on_reached_goal: Vec::new(),
        }
    }

    /*──────────────────────── observers ─────────────────────────────*/

    /// Register a callback invoked exactly once per reached goal.
    pub fn subscribe<F: FnMut() + Send + Sync + 'static>(&mut self, f: F) {
        self.on_reached_goal.push(Box::new(f));
    }

    #[inline]
    pub fn is_pathfinding(&self) -> bool {
        self.pathfinding
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    #[inline]
    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    #[inline]
    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /*──────────────────────── transitions ───────────────────────────*/

    /// Enter *Pathfinding*: store the cursor and advance to the first
    /// cell-centre goal immediately.
    pub fn follow_path(&mut self, path: Path) {
        self.path = Some(path);
        self.pathfinding = true;
        self.moving = true;
        self.next_goal();
    }

    /// BFS from the cell under `from` to the cell under `goal`, then
    /// follow the result.  Returns `false` (and stays put) when the goal
    /// is unreachable.
    pub fn follow_path_to(&mut self, grid: &GridMap, from: Vec2, goal: Vec2) -> bool {
        match crate::nav::find_path(GridMap::cell_of(from), GridMap::cell_of(goal), grid) {
            Some(path) => {
                self.follow_path(path);
                true
            }
            None => false,
        }
    }

    /// Enter *Moving*: chase a single continuous goal, dropping any
    /// active path.
    pub fn go_to(&mut self, goal: Vec2) {
        self.goal = goal;
        self.moving = true;
        self.pathfinding = false;
        self.path = None;
    }

    fn next_goal(&mut self) -> bool {
        match self.path.as_mut().and_then(Path::next) {
            Some(cell) => {
                self.goal = GridMap::cell_centre(cell);
                true
            }
            None => false,
        }
    }

    /// Terminal transition to *Idle*; notifies every subscriber once.
    fn end_path(&mut self) {
        self.pathfinding = false;
        self.moving = false;
        self.path = None;
        for f in &mut self.on_reached_goal {
            f();
        }
    }

    /*──────────────────────── per-tick update ───────────────────────*/

    /// Advance one tick: arrival detection, path-cursor advance, then
    /// displacement along the goal direction.  With `clip` set, the
    /// displacement is clamped against walls before committing
    /// (noclip agents pass `None`).
    pub fn tick(&mut self, pos: &mut Vec2, dt: f32, clip: Option<&GridMap>) {
        if self.moving && pos.distance(self.goal) < ARRIVAL_THRESHOLD {
            let advanced = self.pathfinding && self.next_goal();
            if !advanced {
                self.end_path();
            }
        }

        self.movement = Vec2::ZERO;
        if self.moving {
            let rel = self.goal - *pos;
            let len = rel.length();
            if len > 0.0 {
                // zero-length guard: already-at-goal ticks are a no-op
                let mut displacement = rel / len * self.speed * dt;
                if let Some(grid) = clip {
                    displacement = clip_displacement(grid, *pos, displacement);
                }
                self.movement = displacement;
                *pos += displacement;
            }
        }
    }
}

/// Clamp an intended displacement so it stops [`COLLISION_EPS`] short of
/// the first wall along its direction.
pub fn clip_displacement(grid: &GridMap, pos: Vec2, delta: Vec2) -> Vec2 {
    let len = delta.length();
    if len == 0.0 {
        return delta;
    }
    let dir = delta / len;

    let info = raycast::cast(pos, dir, grid, f32::INFINITY);
    if info.hit {
        let free = pos.distance(info.collision) - COLLISION_EPS;
        if free < len {
            return dir * free.max(0.0);
        }
    }
    delta
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::find_path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DT: f32 = 1.0 / 60.0;

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

    #[test]
    fn deterministic_ticks_to_arrival() {
        // 2.0 units at speed 1.0, threshold 0.3 → first arrival once
        // 1.7 units are covered: ceil(1.7 / (1/60)) = 102 ticks, twice
        let count = |speed: f32| {
            let mut loco = Locomotion::new(speed);
            let mut pos = Vec2::new(1.5, 1.5);
            loco.go_to(Vec2::new(3.5, 1.5));
            let mut ticks = 0;
            while loco.is_moving() {
                loco.tick(&mut pos, DT, None);
                ticks += 1;
                assert!(ticks < 10_000, "never arrived");
            }
            ticks
        };
        assert_eq!(count(1.0), count(1.0));
        assert!(count(2.0) < count(1.0));
    }

    #[test]
    fn arrival_invokes_each_callback_exactly_once() {
        let grid = room();
        let hits = Arc::new(AtomicUsize::new(0));

        let mut loco = Locomotion::new(2.0);
        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            loco.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        let mut pos = Vec2::new(1.5, 1.5);
        loco.follow_path(find_path((1, 1), (3, 3), &grid).unwrap());
        assert!(loco.is_pathfinding());

        for _ in 0..10_000 {
            loco.tick(&mut pos, DT, Some(&grid));
        }
        assert!(!loco.is_pathfinding());
        assert!(!loco.is_moving());
        // 3 subscribers, one arrival each – extra idle ticks add nothing
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(pos.distance(GridMap::cell_centre((3, 3))) < ARRIVAL_THRESHOLD);
    }

    #[test]
    fn path_following_walks_cell_centres() {
        let grid = room();
        let mut loco = Locomotion::new(1.5);
        let mut pos = Vec2::new(1.5, 1.5);
        loco.follow_path(find_path((1, 1), (1, 3), &grid).unwrap());

        // first goal is the start cell's own centre
        assert_eq!(loco.goal(), Vec2::new(1.5, 1.5));
        loco.tick(&mut pos, DT, Some(&grid));
        // already inside the threshold → cursor advanced to (1,2)
        assert_eq!(loco.goal(), Vec2::new(2.5, 1.5));
    }

    #[test]
    fn degenerate_direction_is_a_no_op() {
        let mut loco = Locomotion::new(1.0);
        let mut pos = Vec2::new(2.5, 2.5);
        // goal exactly at the position, threshold crossed after end_path
        loco.go_to(Vec2::new(2.5, 2.5));
        loco.tick(&mut pos, DT, None);
        assert_eq!(pos, Vec2::new(2.5, 2.5));
        assert!(!loco.movement().x.is_nan() && !loco.movement().y.is_nan());
        assert_eq!(loco.movement(), Vec2::ZERO);
    }

    #[test]
    fn clip_stops_short_of_the_wall() {
        let grid = room();
        let pos = Vec2::new(2.5, 2.5);
        // wall face at x = 4.0, 1.5 away; ask for 3.0
        let clipped = clip_displacement(&grid, pos, Vec2::new(3.0, 0.0));
        assert!((clipped.x - (1.5 - COLLISION_EPS)).abs() < 1e-5);
        assert!((pos + clipped).x < 4.0);

        // short moves pass through untouched
        let free = clip_displacement(&grid, pos, Vec2::new(0.5, 0.0));
        assert_eq!(free, Vec2::new(0.5, 0.0));

        // zero displacement never normalises to NaN
        assert_eq!(clip_displacement(&grid, pos, Vec2::ZERO), Vec2::ZERO);
    }
}
