use std::sync::Arc;
use std::thread;

use clap::Parser;
use log::{debug, info, trace};

use maze_gen::{begin_generation, begin_seeded_generation, mesh, MazeState, Snapshot};

mod config;
use config::Args;

fn draw(snapshot: &Snapshot, area: usize) {
    // clear screen, cursor home
    print!("\x1b[2J\x1b[H");
    print!("{}", mesh::ascii(snapshot));
    println!("carved {}/{}", snapshot.carved.len(), area);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (width, height) = args.dimensions();
    let maze = Arc::new(MazeState::new(width, height));
    let area = width * height;

    // dropping the handle detaches the worker, exit never waits on it
    let _worker = match args.seed {
        Some(seed) => begin_seeded_generation(&maze, args.step_delay_ms, seed)?,
        None => begin_generation(&maze, args.step_delay_ms)?,
    };
    info!("generating {}x{} maze", width, height);

    let tick = args.tick_interval();
    let mut latest = Snapshot::empty(maze.dims());
    let mut skipped = 0u64;

    loop {
        match maze.try_snapshot() {
            Some(snapshot) => latest = snapshot,
            None => {
                skipped += 1;
                trace!("maze busy, reusing previous snapshot");
            }
        }

        if !args.quiet {
            draw(&latest, area);
        }

        if latest.is_complete() {
            break;
        }
        thread::sleep(tick);
    }

    if args.quiet {
        print!("{}", mesh::ascii(&latest));
    }
    debug!("{} polls found the maze locked", skipped);

    if let (Some(start), Some(win)) = (latest.start_cell(), latest.win_cell()) {
        println!("start {:?}, win {:?}", start, win);
    }

    Ok(())
}
