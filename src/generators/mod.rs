pub mod backtracker;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::error::Result;
use crate::grid::Coord;
use crate::state::MazeState;
use backtracker::Backtracker;

/// Outcome of a single generation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A passage was opened into this cell.
    Carved(Coord),
    /// Dead end, the top of the stack was popped.
    Backtracked,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Complete,
}

pub trait Generator {
    fn step_generation(&mut self, state: &MazeState) -> Step;

    /// Steps until finished, sleeping `step_delay` after every carve. The
    /// sleep happens with the state unlocked.
    fn generate_maze(&mut self, state: &MazeState, step_delay: Duration) {
        while !self.is_done() {
            if let Step::Carved(_) = self.step_generation(state) {
                if step_delay > Duration::from_millis(0) {
                    thread::sleep(step_delay);
                }
            }
        }
    }

    fn is_done(&self) -> bool;
}

/// Handle to the background generation worker.
///
/// Dropping it detaches the worker; nothing ever has to wait for it.
#[derive(Debug)]
pub struct GenerationHandle {
    worker: thread::JoinHandle<()>,
}

impl GenerationHandle {
    /// Blocks until the worker exits. Returns false if it panicked.
    pub fn join(self) -> bool {
        self.worker.join().is_ok()
    }
}

/// Spawns the generation worker with an entropy-seeded generator and
/// returns immediately.
pub fn begin_generation(state: &Arc<MazeState>, step_delay_ms: u64) -> Result<GenerationHandle> {
    spawn_worker(state, Duration::from_millis(step_delay_ms), None)
}

/// Like [`begin_generation`], but reproducible for a given seed.
pub fn begin_seeded_generation(
    state: &Arc<MazeState>,
    step_delay_ms: u64,
    seed: u64,
) -> Result<GenerationHandle> {
    spawn_worker(state, Duration::from_millis(step_delay_ms), Some(seed))
}

fn spawn_worker(
    state: &Arc<MazeState>,
    step_delay: Duration,
    seed: Option<u64>,
) -> Result<GenerationHandle> {
    let state = Arc::clone(state);

    let worker = thread::Builder::new()
        .name("maze-generator".into())
        .spawn(move || {
            let (width, height) = (state.width(), state.height());
            let generator = match seed {
                Some(seed) => Backtracker::with_seed(width, height, seed),
                None => Backtracker::from_entropy(width, height),
            };

            match generator {
                Ok(mut generator) => generator.generate_maze(&state, step_delay),
                Err(err) => debug!("not generating: {}", err),
            }
        })?;

    Ok(GenerationHandle { worker })
}
