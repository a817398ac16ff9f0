use log::{debug, info, trace};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{MazeError, Result};
use crate::generators::{Generator, Phase, Step};
use crate::grid::{Coord, Dimensions, Direction, Neighborhood};
use crate::state::MazeState;

/// Randomized iterative depth-first backtracker.
///
/// Walks from a random start cell, always stepping into a random unvisited
/// neighbour and popping back when none is left. The carved passages form a
/// spanning tree of the grid, so the result is a perfect maze.
pub struct Backtracker<R: Rng> {
    dims: Dimensions,
    // generator-side mirror of the VISITED bits, it is the only writer
    visited: Vec<bool>,
    stack: Vec<Coord>,
    carved: usize,
    rng: R,
    phase: Phase,
}

impl Backtracker<StdRng> {
    pub fn from_entropy(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, StdRng::from_entropy())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        Self::new(width, height, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Backtracker<R> {
    pub fn new(width: usize, height: usize, mut rng: R) -> Result<Self> {
        let dims = Dimensions { width, height };
        if dims.is_empty() {
            return Err(MazeError::InvalidDimension { width, height });
        }

        let start = (rng.gen_range(0, width), rng.gen_range(0, height));

        Ok(Self {
            dims,
            visited: vec![false; dims.area()],
            stack: vec![start],
            carved: 0,
            rng,
            phase: Phase::Idle,
        })
    }

    #[inline]
    fn index_of(&self, (x, y): Coord) -> usize {
        (self.dims.width * y) + x
    }

    fn finish(&mut self, state: &MazeState) {
        let dims = self.dims;
        let rng = &mut self.rng;

        let (start, win) = state.with_lock(|carving| {
            let leaves = carving.grid().leaves();
            let (start, win) = pick_endpoints(rng, leaves, dims);
            carving.set_start_cell(start.0, start.1);
            carving.set_win_cell(win.0, win.1);
            carving.mark_complete();
            (start, win)
        });

        self.phase = Phase::Complete;
        info!(
            "maze {}x{} complete, start {:?}, win {:?}",
            dims.width, dims.height, start, win
        );
    }
}

impl<R: Rng> Generator for Backtracker<R> {
    fn step_generation(&mut self, state: &MazeState) -> Step {
        match self.phase {
            Phase::Complete => return Step::Finished,
            Phase::Idle => {
                debug!(
                    "starting generation of {}x{} maze at {:?}",
                    self.dims.width,
                    self.dims.height,
                    self.stack.last()
                );
                self.phase = Phase::Running;
            }
            Phase::Running => {}
        }

        let current = match self.stack.last() {
            Some(&current) => current,
            None => {
                self.finish(state);
                return Step::Finished;
            }
        };

        let newly_visited = state.with_lock(|carving| {
            carving.set_cursor(current);
            carving.mark_visited(current)
        });
        if newly_visited {
            let index = self.index_of(current);
            self.visited[index] = true;
            self.carved += 1;
        }

        let candidates: Vec<(Coord, Direction)> = Neighborhood::new(current, self.dims)
            .filter(|&(neighbor, _)| !self.visited[self.index_of(neighbor)])
            .collect();

        if candidates.is_empty() {
            if self.carved == self.dims.area() {
                self.finish(state);
                return Step::Finished;
            }

            trace!("backtracking from {:?}", current);
            self.stack.pop();
            return Step::Backtracked;
        }

        let (next, dir) = candidates[self.rng.gen_range(0, candidates.len())];
        state.with_lock(|carving| carving.carve(current, dir));
        trace!("carved {:?} {:?} to {:?}", current, dir, next);

        self.stack.push(next);
        Step::Carved(next)
    }

    fn is_done(&self) -> bool {
        self.phase == Phase::Complete
    }
}

/// Chooses start and win among the dead ends.
///
/// More than two leaves: two distinct random picks. Exactly two: scan order.
/// Fewer: the opposite corners of the grid.
pub fn pick_endpoints<R: Rng>(
    rng: &mut R,
    mut leaves: Vec<Coord>,
    dims: Dimensions,
) -> (Coord, Coord) {
    match leaves.len() {
        0 | 1 => (
            (0, 0),
            (
                dims.width.saturating_sub(1),
                dims.height.saturating_sub(1),
            ),
        ),
        2 => (leaves[0], leaves[1]),
        len => {
            let start = leaves.remove(rng.gen_range(0, len));
            let win = leaves[rng.gen_range(0, leaves.len())];
            (start, win)
        }
    }
}

#[cfg(test)]
mod test_backtracker {
    use super::*;
    use crate::grid::Grid;
    use std::collections::{HashSet, VecDeque};
    use std::time::Duration;

    fn generate(width: usize, height: usize, seed: u64) -> MazeState {
        let state = MazeState::new(width, height);
        let mut generator = Backtracker::with_seed(width, height, seed).unwrap();
        generator.generate_maze(&state, Duration::from_millis(0));
        assert!(generator.is_done());
        state
    }

    fn reachable_from_origin(grid: &Grid) -> usize {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert((0, 0));
        queue.push_back((0, 0));

        while let Some(coord) = queue.pop_front() {
            for (neighbor, dir) in grid.neighborhood(coord) {
                if grid.is_open(coord, dir) && seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        seen.len()
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Backtracker::with_seed(0, 5, 1),
            Err(MazeError::InvalidDimension {
                width: 0,
                height: 5
            })
        ));
        assert!(Backtracker::with_seed(5, 0, 1).is_err());
    }

    #[test]
    fn produces_spanning_tree() {
        for &(width, height, seed) in &[(2, 2, 1), (5, 7, 2), (16, 16, 3), (1, 9, 4), (9, 1, 5)] {
            let state = generate(width, height, seed);
            let snapshot = state.try_snapshot().unwrap();
            let area = width * height;

            assert!(snapshot.is_complete());
            assert_eq!(snapshot.carved.len(), area);
            let unique: HashSet<_> = snapshot.carved.iter().collect();
            assert_eq!(unique.len(), area);

            assert_eq!(snapshot.grid.passage_count(), area - 1);
            assert_eq!(reachable_from_origin(&snapshot.grid), area);
            assert!(snapshot.grid.coords().all(|c| snapshot.grid.is_visited(c)));
        }
    }

    #[test]
    fn passage_bits_stay_on_origin_cell() {
        let state = generate(8, 8, 11);
        let grid = state.try_snapshot().unwrap().grid;

        // every passage is recorded by exactly one of its two cells
        for coord in grid.coords() {
            for (neighbor, dir) in grid.neighborhood(coord) {
                let mine = grid.is_set(coord, dir.bit());
                let theirs = grid.is_set(neighbor, (-dir).bit());
                assert!(!(mine && theirs));
            }
        }
    }

    #[test]
    fn endpoints_are_distinct_leaves() {
        for seed in 0..20 {
            let state = generate(6, 5, seed);
            let snapshot = state.try_snapshot().unwrap();
            let start = snapshot.start_cell().unwrap();
            let win = snapshot.win_cell().unwrap();
            let leaves = snapshot.grid.leaves();
            if leaves.len() < 2 {
                continue;
            }

            assert!(leaves.contains(&start));
            assert!(leaves.contains(&win));
            assert_ne!(start, win);
            assert_eq!(snapshot.grid.degree(start), 1);
            assert_eq!(snapshot.grid.degree(win), 1);
            assert_eq!(state.start_cell(), start);
            assert_eq!(state.win_cell(), win);
        }
    }

    #[test]
    fn walk_root_is_never_an_endpoint() {
        for seed in 0..50 {
            let state = generate(6, 5, seed);
            let snapshot = state.try_snapshot().unwrap();
            let root = snapshot.carved[0];

            assert!(!snapshot.grid.leaves().contains(&root));
            if snapshot.grid.leaves().len() >= 2 {
                assert_ne!(snapshot.start_cell(), Some(root));
                assert_ne!(snapshot.win_cell(), Some(root));
            }
        }
    }

    #[test]
    fn single_cell_falls_back_to_corners() {
        let state = generate(1, 1, 9);
        let snapshot = state.try_snapshot().unwrap();

        assert!(snapshot.is_complete());
        assert_eq!(snapshot.carved, vec![(0, 0)]);
        assert_eq!(snapshot.start_cell(), Some((0, 0)));
        assert_eq!(snapshot.win_cell(), Some((0, 0)));
    }

    #[test]
    fn corridor_has_one_leaf_and_uses_corners() {
        for seed in 0..8 {
            let state = generate(2, 1, seed);
            assert_eq!(state.try_snapshot().unwrap().grid.leaves().len(), 1);
            assert_eq!(state.start_cell(), (0, 0));
            assert_eq!(state.win_cell(), (1, 0));
        }
    }

    #[test]
    fn three_cell_corridor_from_middle_uses_scan_order() {
        // a walk starting in the middle carves out both ways, leaving the two ends
        for seed in 0..64 {
            let state = generate(3, 1, seed);
            let snapshot = state.try_snapshot().unwrap();
            if snapshot.carved[0] != (1, 0) {
                continue;
            }
            assert_eq!(snapshot.grid.leaves(), vec![(0, 0), (2, 0)]);
            assert_eq!(state.start_cell(), (0, 0));
            assert_eq!(state.win_cell(), (2, 0));
        }
    }

    #[test]
    fn four_by_four_carves_every_cell_once() {
        let state = MazeState::new(4, 4);
        let mut generator = Backtracker::with_seed(4, 4, 42).unwrap();

        let mut carves = 0;
        let mut steps = 0;
        loop {
            steps += 1;
            match generator.step_generation(&state) {
                Step::Carved(_) => carves += 1,
                Step::Backtracked => {}
                Step::Finished => break,
            }
            assert!(steps < 64, "generation did not terminate");
        }

        assert_eq!(carves, 15);
        assert!(generator.is_done());
        let snapshot = state.try_snapshot().unwrap();
        assert_eq!(snapshot.carved.len(), 16);
        let unique: HashSet<_> = snapshot.carved.iter().collect();
        assert_eq!(unique.len(), 16);

        // further steps are inert
        assert_eq!(generator.step_generation(&state), Step::Finished);
        assert_eq!(state.try_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generate(10, 6, 1234).try_snapshot().unwrap();
        let b = generate(10, 6, 1234).try_snapshot().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn pick_endpoints_branches() {
        let dims = Dimensions {
            width: 4,
            height: 3,
        };
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(pick_endpoints(&mut rng, vec![], dims), ((0, 0), (3, 2)));
        assert_eq!(pick_endpoints(&mut rng, vec![(2, 2)], dims), ((0, 0), (3, 2)));
        assert_eq!(
            pick_endpoints(&mut rng, vec![(1, 0), (2, 2)], dims),
            ((1, 0), (2, 2))
        );

        let leaves = vec![(0, 1), (3, 0), (2, 2), (1, 1)];
        for _ in 0..50 {
            let (start, win) = pick_endpoints(&mut rng, leaves.clone(), dims);
            assert_ne!(start, win);
            assert!(leaves.contains(&start));
            assert!(leaves.contains(&win));
        }
    }
}
