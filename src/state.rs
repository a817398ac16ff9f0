//! Maze state shared between the generation worker and polling readers.
//!
//! Everything that changes during generation lives in [`Carving`] behind a
//! single mutex. Writers go through [`MazeState::with_lock`]; readers call
//! [`MazeState::try_snapshot`], which never blocks and hands back a deep copy.

use parking_lot::Mutex;

use crate::grid::{cell_count, Coord, Dimensions, Direction, Grid, VISITED};

/// Lock-protected generation state.
#[derive(Debug)]
pub struct Carving {
    grid: Grid,
    carved: Vec<Coord>,
    cursor: Option<Coord>,
    start: Coord,
    win: Coord,
    complete: bool,
}

impl Carving {
    fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::with_dims(width, height),
            carved: Vec::with_capacity(cell_count(width, height)),
            cursor: None,
            start: (0, 0),
            win: (0, 0),
            complete: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn carved(&self) -> &[Coord] {
        &self.carved
    }

    pub fn cursor(&self) -> Option<Coord> {
        self.cursor
    }

    pub fn set_cursor(&mut self, coord: Coord) {
        self.cursor = Some(coord);
    }

    /// Marks `coord` visited and appends it to the carved order. Returns
    /// false if it was already visited or lies outside the grid.
    pub fn mark_visited(&mut self, coord: Coord) -> bool {
        if !self.grid.dims.contains(coord) || self.grid.is_visited(coord) {
            return false;
        }

        self.grid.set_flag(coord, VISITED);
        self.carved.push(coord);
        true
    }

    /// Opens a passage from `from` towards `dir`. Only `from` records the
    /// bit, and only once it has been visited.
    pub fn carve(&mut self, from: Coord, dir: Direction) -> bool {
        if !self.grid.is_visited(from) || dir.step(from, self.grid.dims).is_none() {
            return false;
        }

        self.grid.set_flag(from, dir.bit()).is_some()
    }

    pub fn set_start_cell(&mut self, x: usize, y: usize) {
        self.start = (x, y);
    }

    pub fn set_win_cell(&mut self, x: usize, y: usize) {
        self.win = (x, y);
    }

    pub fn start_cell(&self) -> Coord {
        self.start
    }

    pub fn win_cell(&self) -> Coord {
        self.win
    }

    /// One-way transition; there is no way to clear the flag.
    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Point-in-time copy of a [`Carving`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub carved: Vec<Coord>,
    pub cursor: Option<Coord>,
    pub complete: bool,
    endpoints: Option<(Coord, Coord)>,
}

impl Snapshot {
    /// What a reader holds before its first successful poll.
    pub fn empty(dims: Dimensions) -> Self {
        Self {
            grid: Grid::with_dims(dims.width, dims.height),
            carved: Vec::new(),
            cursor: None,
            complete: false,
            endpoints: None,
        }
    }

    fn capture(carving: &Carving) -> Self {
        let endpoints = if carving.complete {
            Some((carving.start, carving.win))
        } else {
            None
        };

        Self {
            grid: carving.grid.clone(),
            carved: carving.carved.clone(),
            cursor: carving.cursor,
            complete: carving.complete,
            endpoints,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn start_cell(&self) -> Option<Coord> {
        self.endpoints.map(|(start, _)| start)
    }

    pub fn win_cell(&self) -> Option<Coord> {
        self.endpoints.map(|(_, win)| win)
    }
}

/// Owned maze handle. Share it with `Arc` between the worker and readers.
#[derive(Debug)]
pub struct MazeState {
    dims: Dimensions,
    inner: Mutex<Carving>,
}

impl MazeState {
    /// Zero-sized mazes are accepted here; generation is what refuses them.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            dims: Dimensions { width, height },
            inner: Mutex::new(Carving::new(width, height)),
        }
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Runs `fun` with exclusive access. The lock is released when `fun`
    /// returns or unwinds.
    pub fn with_lock<F, T>(&self, fun: F) -> T
    where
        F: FnOnce(&mut Carving) -> T,
    {
        let mut guard = self.inner.lock();
        fun(&mut guard)
    }

    /// Copies the current state if the lock is free right now, otherwise
    /// returns `None` and the caller keeps its previous snapshot.
    pub fn try_snapshot(&self) -> Option<Snapshot> {
        let guard = self.inner.try_lock()?;
        Some(Snapshot::capture(&guard))
    }

    /// `(0, 0)` until generation completes. Blocks on the lock; a render
    /// loop should read [`Snapshot::start_cell`] instead.
    pub fn start_cell(&self) -> Coord {
        self.inner.lock().start_cell()
    }

    /// `(0, 0)` until generation completes. Blocks like
    /// [`MazeState::start_cell`]; see [`Snapshot::win_cell`].
    pub fn win_cell(&self) -> Coord {
        self.inner.lock().win_cell()
    }

    /// Blocks on the lock; per-tick callers use [`Snapshot::is_complete`].
    pub fn is_complete(&self) -> bool {
        self.inner.lock().is_complete()
    }
}
