use sapper_core::{Move, Replay};
use sapper_protocol::{
    Ack, CreateGameRequest, CreateGameResponse, GameDetails, GameId, GameSummary, StepRequest,
};
use time::OffsetDateTime;

use crate::*;

/// The backend side of the game: accepts what clients submit and hands back
/// stored games. Outcome labels are trusted as sent.
#[derive(Debug)]
pub struct GameService<S> {
    store: S,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn create_game(&mut self, request: CreateGameRequest) -> Result<CreateGameResponse> {
        self.create_game_at(request, OffsetDateTime::now_utc())
    }

    pub fn create_game_at(
        &mut self,
        request: CreateGameRequest,
        created_at: OffsetDateTime,
    ) -> Result<CreateGameResponse> {
        request.validate()?;
        if request.mine_locations.len() != request.mines_count as usize {
            log::warn!(
                "Game for {:?} declares {} mines but lists {}",
                request.player_name,
                request.mines_count,
                request.mine_locations.len()
            );
        }
        let id = self
            .store
            .create_game(NewGame::from_request(request, created_at))?;
        Ok(CreateGameResponse { id })
    }

    /// Appends a move; a terminal result also settles the game status, but
    /// only the first one does.
    pub fn record_step(&mut self, id: GameId, step: StepRequest) -> Result<Ack> {
        let mv = Move::from(step);
        self.store.append_move(id, mv)?;

        if let Some(status) = mv.result.terminal_status() {
            let current = self.store.get_game(id)?.status;
            if current.is_finished() {
                log::warn!(
                    "Game {} already {}, ignoring {} at step {}",
                    id,
                    current,
                    mv.result,
                    mv.step_number
                );
            } else {
                self.store.set_game_status(id, status)?;
            }
        }
        Ok(Ack::ok())
    }

    pub fn fetch_game(&self, id: GameId) -> Result<GameDetails> {
        let record = self.store.get_game(id)?;
        let moves = self.store.get_moves(id)?;
        Ok(record.details(moves))
    }

    pub fn list_games(&self) -> Result<Vec<GameSummary>> {
        Ok(self
            .store
            .list_games()?
            .iter()
            .map(GameRecord::summary)
            .collect())
    }

    /// A replay of a stored game, positioned before its first move.
    pub fn replay(&self, id: GameId) -> Result<Replay> {
        let record = self.store.get_game(id)?;
        let moves = self.store.get_moves(id)?;
        Ok(Replay::from_parts(
            record.width,
            record.height,
            &record.mine_locations,
            moves,
        )?)
    }

    pub fn create_game_json(&mut self, body: &str) -> Result<CreateGameResponse> {
        let request = CreateGameRequest::from_json(body)?;
        self.create_game(request)
    }

    pub fn record_step_json(&mut self, id: GameId, body: &str) -> Result<Ack> {
        let step = StepRequest::from_json(body)?;
        self.record_step(id, step)
    }
}
