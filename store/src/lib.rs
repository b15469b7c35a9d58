//! Persistence for finished and running games.
//!
//! A [`GameStore`] keeps one row per game and an append-only move log per
//! game. [`GameService`] sits on top and speaks the wire shapes of
//! `sapper-protocol`.

use sapper_core::{CellCount, Coord, GameStatus, Move};
use sapper_protocol::{CreateGameRequest, GameDetails, GameId, GameSummary};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub use error::*;
pub use file::*;
pub use memory::*;
pub use service::*;

mod error;
mod file;
mod memory;
mod service;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A game as submitted by the client that created it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGame {
    pub player_name: String,
    pub width: Coord,
    pub height: Coord,
    pub mines_count: CellCount,
    pub mine_locations: Vec<CellCount>,
    pub created_at: OffsetDateTime,
}

impl NewGame {
    pub fn from_request(request: CreateGameRequest, created_at: OffsetDateTime) -> Self {
        Self {
            player_name: request.player_name,
            width: request.width,
            height: request.height,
            mines_count: request.mines_count,
            mine_locations: request.mine_locations,
            created_at,
        }
    }
}

/// One stored game: metadata plus its mine layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub player_name: String,
    pub width: Coord,
    pub height: Coord,
    pub mines_count: CellCount,
    /// Kept in the order the client sent them.
    pub mine_locations: Vec<CellCount>,
    pub status: GameStatus,
}

impl GameRecord {
    pub(crate) fn new(id: GameId, game: NewGame) -> Self {
        Self {
            id,
            created_at: game.created_at,
            player_name: game.player_name,
            width: game.width,
            height: game.height,
            mines_count: game.mines_count,
            mine_locations: game.mine_locations,
            status: GameStatus::Playing,
        }
    }

    pub fn date_string(&self) -> String {
        let utc = self.created_at.to_offset(time::UtcOffset::UTC);
        utc.format(DATE_FORMAT)
            .unwrap_or_else(|_| self.created_at.to_string())
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            date: self.date_string(),
            player_name: self.player_name.clone(),
            width: self.width,
            height: self.height,
            mines_count: self.mines_count,
            status: self.status,
        }
    }

    pub fn details(&self, moves: Vec<Move>) -> GameDetails {
        GameDetails {
            summary: self.summary(),
            mine_locations: self.mine_locations.clone(),
            moves,
        }
    }
}

/// The move log and game table.
///
/// Ids are assigned by the store, start at 1 and are never reused. Writes
/// against an unknown game fail with [`StoreError::NotFound`] and leave the
/// store untouched.
pub trait GameStore {
    fn create_game(&mut self, game: NewGame) -> Result<GameId>;

    fn append_move(&mut self, id: GameId, mv: Move) -> Result<()>;

    fn set_game_status(&mut self, id: GameId, status: GameStatus) -> Result<()>;

    fn get_game(&self, id: GameId) -> Result<GameRecord>;

    /// Ascending by step number.
    fn get_moves(&self, id: GameId) -> Result<Vec<Move>>;

    /// Most recent first.
    fn list_games(&self) -> Result<Vec<GameRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn date_uses_plain_utc_format() {
        let record = GameRecord {
            id: 1,
            created_at: datetime!(2024-03-05 07:08:09 +03:00),
            player_name: "ann".to_string(),
            width: 2,
            height: 2,
            mines_count: 1,
            mine_locations: vec![0],
            status: GameStatus::Playing,
        };

        assert_eq!(record.date_string(), "2024-03-05 04:08:09");
    }
}
