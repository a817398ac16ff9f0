use thiserror::Error;

#[derive(Debug, Error)]
pub enum MazeError {
    /// Generation refuses to start on a grid with no cells.
    #[error("invalid maze dimensions {width}x{height}: both sides must be non-zero")]
    InvalidDimension { width: usize, height: usize },

    #[error("failed to spawn generation worker: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
