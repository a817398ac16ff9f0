use std::time::Duration;

use clap::Parser;
use log::warn;

pub const MIN_SIDE: usize = 4;
pub const MAX_SIDE: usize = 128;

#[derive(Parser, Debug)]
#[command(name = "maze-gen", about = "Generate a perfect maze and watch it being carved")]
pub struct Args {
    /// Maze width in cells
    #[arg(short = 'x', long, default_value = "16")]
    pub width: usize,

    /// Maze height in cells
    #[arg(short = 'y', long, default_value = "16")]
    pub height: usize,

    /// Pause after every carved passage, in milliseconds
    #[arg(short = 'd', long, default_value = "10")]
    pub step_delay_ms: u64,

    /// Snapshot polls per second
    #[arg(short, long, default_value = "20")]
    pub tick_rate: u32,

    /// Seed for a reproducible maze
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Only print the finished maze
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn dimensions(&self) -> (usize, usize) {
        (clamp_side("width", self.width), clamp_side("height", self.height))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

fn clamp_side(name: &str, side: usize) -> usize {
    if side < MIN_SIDE {
        warn!("{} {} too small, clipped to {}", name, side, MIN_SIDE);
        MIN_SIDE
    } else if side > MAX_SIDE {
        warn!("{} {} too large, clipped to {}", name, side, MAX_SIDE);
        MAX_SIDE
    } else {
        side
    }
}

#[cfg(test)]
mod test_config {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["maze-gen"]);
        assert_eq!(args.dimensions(), (16, 16));
        assert_eq!(args.step_delay_ms, 10);
        assert_eq!(args.tick_interval(), Duration::from_millis(50));
        assert_eq!(args.seed, None);
        assert!(!args.quiet);
    }

    #[test]
    fn sides_are_clamped() {
        let args = Args::parse_from(["maze-gen", "-x", "1", "-y", "500", "--seed", "3"]);
        assert_eq!(args.dimensions(), (MIN_SIDE, MAX_SIDE));
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn zero_tick_rate_still_ticks() {
        let args = Args::parse_from(["maze-gen", "--tick-rate", "0"]);
        assert_eq!(args.tick_interval(), Duration::from_secs(1));
    }
}
