use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a game: starts `Playing`, ends `Won` or `Lost` exactly once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome label stored with every move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveResult {
    Ok,
    Exploded,
    Won,
}

impl MoveResult {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Exploded | Self::Won)
    }

    /// Game status a move with this result moves the game into, if any.
    pub const fn terminal_status(self) -> Option<GameStatus> {
        match self {
            Self::Ok => None,
            Self::Exploded => Some(GameStatus::Lost),
            Self::Won => Some(GameStatus::Won),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Exploded => "exploded",
            Self::Won => "won",
        }
    }
}

impl fmt::Display for MoveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a game's move log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// 1-based, strictly increasing per game.
    pub step_number: u32,
    pub row: Coord,
    pub col: Coord,
    pub result: MoveResult,
}

impl Move {
    pub const fn new(step_number: u32, (row, col): Coord2, result: MoveResult) -> Self {
        Self {
            step_number,
            row,
            col,
            result,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }
}

/// A cell whose visible state changed, with its new state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub cell: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_results_use_lowercase_labels() {
        let json = serde_json::to_string(&Move::new(3, (1, 2), MoveResult::Exploded)).unwrap();

        assert_eq!(json, r#"{"step_number":3,"row":1,"col":2,"result":"exploded"}"#);
    }

    #[test]
    fn unknown_result_label_is_rejected() {
        let parsed = serde_json::from_str::<MoveResult>(r#""boom""#);

        assert!(parsed.is_err());
    }

    #[test]
    fn terminal_results_map_to_final_status() {
        assert_eq!(MoveResult::Ok.terminal_status(), None);
        assert_eq!(MoveResult::Exploded.terminal_status(), Some(GameStatus::Lost));
        assert_eq!(MoveResult::Won.terminal_status(), Some(GameStatus::Won));
    }
}
