use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board width and height must be positive")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Replay has no steps left")]
    ReplayFinished,
}

impl GameError {
    /// Rejections a live session tolerates silently: the move is dropped and
    /// nothing changes.
    pub const fn is_illegal_move(self) -> bool {
        matches!(self, Self::AlreadyRevealed | Self::AlreadyEnded)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
