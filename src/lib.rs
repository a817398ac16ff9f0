//! Background maze generation with non-blocking snapshot polling.
//!
//! ```no_run
//! use std::sync::Arc;
//! use maze_gen::{begin_generation, MazeState};
//!
//! let maze = Arc::new(MazeState::new(16, 16));
//! let _worker = begin_generation(&maze, 10).unwrap();
//!
//! let mut latest = maze_gen::Snapshot::empty(maze.dims());
//! loop {
//!     if let Some(snapshot) = maze.try_snapshot() {
//!         latest = snapshot;
//!     }
//!     if latest.is_complete() {
//!         break;
//!     }
//! }
//! ```

pub mod error;
pub mod generators;
pub mod grid;
pub mod mesh;
pub mod state;

pub use error::MazeError;
pub use generators::{begin_generation, begin_seeded_generation, GenerationHandle};
pub use grid::{Coord, Dimensions, Direction, Grid};
pub use state::{MazeState, Snapshot};
