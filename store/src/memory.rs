use std::collections::BTreeMap;

use sapper_core::{GameStatus, Move};
use sapper_protocol::GameId;
use serde::{Deserialize, Serialize};

use crate::*;

/// A row of the move log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRow {
    pub id: u64,
    pub game_id: GameId,
    #[serde(flatten)]
    pub mv: Move,
}

/// In-memory store, also the document format of [`JsonFileStore`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    last_game_id: GameId,
    last_move_id: u64,
    games: BTreeMap<GameId, GameRecord>,
    moves: Vec<MoveRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    fn game_mut(&mut self, id: GameId) -> Result<&mut GameRecord> {
        self.games.get_mut(&id).ok_or(StoreError::NotFound(id))
    }
}

impl GameStore for MemoryStore {
    fn create_game(&mut self, game: NewGame) -> Result<GameId> {
        self.last_game_id += 1;
        let id = self.last_game_id;
        log::debug!(
            "Created game {} for {:?}, {}x{} with {} mines",
            id,
            game.player_name,
            game.width,
            game.height,
            game.mines_count
        );
        self.games.insert(id, GameRecord::new(id, game));
        Ok(id)
    }

    fn append_move(&mut self, id: GameId, mv: Move) -> Result<()> {
        let game = self.game_mut(id)?;
        if game.status.is_finished() {
            log::warn!(
                "Game {} is already {}, logging step {} anyway",
                id,
                game.status,
                mv.step_number
            );
        }
        self.last_move_id += 1;
        self.moves.push(MoveRow {
            id: self.last_move_id,
            game_id: id,
            mv,
        });
        log::trace!("Game {} step {} logged as {}", id, mv.step_number, mv.result);
        Ok(())
    }

    fn set_game_status(&mut self, id: GameId, status: GameStatus) -> Result<()> {
        let game = self.game_mut(id)?;
        log::debug!("Game {} status {} -> {}", id, game.status, status);
        game.status = status;
        Ok(())
    }

    fn get_game(&self, id: GameId) -> Result<GameRecord> {
        self.games.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn get_moves(&self, id: GameId) -> Result<Vec<Move>> {
        if !self.games.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        let mut moves: Vec<_> = self
            .moves
            .iter()
            .filter(|row| row.game_id == id)
            .map(|row| row.mv)
            .collect();
        moves.sort_by_key(|mv| mv.step_number);
        Ok(moves)
    }

    fn list_games(&self) -> Result<Vec<GameRecord>> {
        Ok(self.games.values().rev().cloned().collect())
    }
}
