//! Unweighted breadth-first pathfinding over the occupancy grid.
//!
//! FIFO frontier, 4-connected walkable neighbours, predecessor map –
//! the returned path has minimum *hop count*, nothing is weighted.
//! Cost is O(cells + edges) of the connected component per call, so
//! callers throttle invocation per agent (see `sim::behavior`).

use rand::Rng;
use smallvec::SmallVec;
use std::collections::{HashMap, VecDeque};

use crate::world::{Cell, GridMap};

/// Forward-only cursor over a finite cell sequence, start cell first.
///
/// Consumed one cell at a time and not restartable – a fresh `Path` is
/// issued per traversal.
#[derive(Debug)]
pub struct Path(std::vec::IntoIter<Cell>);

impl Path {
    fn from_cells(cells: Vec<Cell>) -> Self {
        Self(cells.into_iter())
    }

    /// Cells not yet consumed.
    pub fn remaining(&self) -> usize {
        self.0.len()
    }
}

impl Iterator for Path {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        self.0.next()
    }
}

/// Walkable 4-neighbours of `cell`, in row-then-column step order.
fn neighbours(cell: Cell, grid: &GridMap) -> SmallVec<[Cell; 4]> {
    let (row, col) = (cell.0 as i32, cell.1 as i32);
    let mut out = SmallVec::new();
    for (r, c) in [(row + 1, col), (row - 1, col), (row, col + 1), (row, col - 1)] {
        if grid.is_walkable(r, c) {
            out.push((r as usize, c as usize));
        }
    }
    out
}

/// Walk predecessor links from `target` back to `start`, then reverse.
fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, target: Cell) -> Path {
    let mut cells = Vec::new();
    let mut current = target;
    while current != start {
        cells.push(current);
        current = came_from[&current];
    }
    cells.push(start);
    cells.reverse();
    Path::from_cells(cells)
}

/// Shortest (fewest-hops) path from `start` to `goal`.
///
/// `None` means the goal is unreachable; that is an ordinary outcome,
/// callers fall back to idling or a different goal.
pub fn find_path(start: Cell, goal: Cell, grid: &GridMap) -> Option<Path> {
    let mut frontier = VecDeque::new();
    frontier.push_back(start);
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    came_from.insert(start, start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        for next in neighbours(current, grid) {
            if !came_from.contains_key(&next) {
                came_from.insert(next, current);
                frontier.push_back(next);
            }
        }
    }
    None
}

/// Path to a cell picked uniformly at random from everything reachable
/// from `start` – the idle-wander variant.
///
/// Same flood fill as [`find_path`] but without early termination; the
/// discovered set always contains at least `start` itself.
pub fn find_random_reachable_path<R: Rng>(start: Cell, grid: &GridMap, rng: &mut R) -> Path {
    let mut frontier = VecDeque::new();
    frontier.push_back(start);
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    came_from.insert(start, start);
    let mut discovered = vec![start];

    while let Some(current) = frontier.pop_front() {
        for next in neighbours(current, grid) {
            if !came_from.contains_key(&next) {
                came_from.insert(next, current);
                discovered.push(next);
                frontier.push_back(next);
            }
        }
    }

    let target = discovered[rng.gen_range(0..discovered.len())];
    reconstruct(&came_from, start, target)
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn open_grid_minimum_hop_count() {
        let grid = GridMap::empty(6, 6);
        let path: Vec<Cell> = find_path((0, 0), (3, 3), &grid).unwrap().collect();
        // |Δrow| + |Δcol| + 1 cells, start first, goal last
        assert_eq!(path.len(), 7);
        assert_eq!(path[0], (0, 0));
        assert_eq!(path[6], (3, 3));
        // consecutive cells are 4-connected
        for pair in path.windows(2) {
            let dr = pair[0].0.abs_diff(pair[1].0);
            let dc = pair[0].1.abs_diff(pair[1].1);
            assert_eq!(dr + dc, 1);
        }
    }

    #[test]
    fn walls_force_a_detour() {
        #[rustfmt::skip]
        let cells = vec![
            0, 1, 0,
            0, 1, 0,
            0, 0, 0,
        ];
        let grid = GridMap::from_cells(3, 3, cells);
        let path: Vec<Cell> = find_path((0, 0), (0, 2), &grid).unwrap().collect();
        // around the wall column: 2 down, 2 right, 2 up
        assert_eq!(path.len(), 7);
        assert!(path.iter().all(|&(r, c)| grid.is_walkable(r as i32, c as i32)));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 1, 1, 1,
            0, 0, 1, 0, 1,
            0, 0, 1, 1, 1,
        ];
        let grid = GridMap::from_cells(3, 5, cells);
        assert!(find_path((0, 0), (1, 3), &grid).is_none());
    }

    #[test]
    fn start_equals_goal() {
        let grid = GridMap::empty(2, 2);
        let path: Vec<Cell> = find_path((1, 1), (1, 1), &grid).unwrap().collect();
        assert_eq!(path, vec![(1, 1)]);
    }

    #[test]
    fn random_goal_stays_in_component() {
        // left room sealed off from the right column
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 1, 0,
            0, 0, 1, 0,
            0, 0, 1, 0,
        ];
        let grid = GridMap::from_cells(3, 4, cells);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let path: Vec<Cell> = find_random_reachable_path((0, 0), &grid, &mut rng).collect();
            assert_eq!(path[0], (0, 0));
            assert!(path.iter().all(|&(_, c)| c < 2), "leaked into sealed column: {path:?}");
            for pair in path.windows(2) {
                assert_eq!(pair[0].0.abs_diff(pair[1].0) + pair[0].1.abs_diff(pair[1].1), 1);
            }
        }
    }

    #[test]
    fn path_cursor_is_forward_only() {
        let grid = GridMap::empty(3, 3);
        let mut path = find_path((0, 0), (0, 2), &grid).unwrap();
        assert_eq!(path.remaining(), 3);
        assert_eq!(path.next(), Some((0, 0)));
        assert_eq!(path.remaining(), 2);
        assert_eq!(path.next(), Some((0, 1)));
        assert_eq!(path.next(), Some((0, 2)));
        assert_eq!(path.next(), None);
    }
}
