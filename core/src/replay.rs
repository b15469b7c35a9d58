use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// One recorded move played back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// The move exactly as it was logged.
    pub record: Move,
    /// Result recomputed from the layout, `None` when the move was skipped.
    pub result: Option<MoveResult>,
    pub delta: Vec<CellChange>,
}

impl ReplayStep {
    /// The session rejected the move: it targeted a revealed cell, came after
    /// the game ended, or lies outside the board.
    pub const fn is_skipped(&self) -> bool {
        self.result.is_none()
    }

    /// Whether the recomputed result matches the logged label.
    pub fn is_consistent(&self) -> bool {
        self.result == Some(self.record.result)
    }
}

/// Status line shown while stepping through a replay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayBanner {
    InProgress { step: usize, total: usize },
    Exploded,
    Won,
    /// The log ran out without a terminal move.
    Unfinished,
}

impl fmt::Display for ReplayBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress { step, total } => write!(f, "Replay: step {step} of {total}"),
            Self::Exploded => f.write_str("Game over (exploded)"),
            Self::Won => f.write_str("Game over (won)"),
            Self::Unfinished => f.write_str("Replay over"),
        }
    }
}

/// Steps a stored move log through a fresh session, one move per call.
#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    session: GameSession,
    initial: GameSession,
    moves: Vec<Move>,
    cursor: usize,
}

impl Replay {
    pub fn new(mine_layout: MineLayout, moves: impl IntoIterator<Item = Move>) -> Self {
        let mut moves: Vec<_> = moves.into_iter().collect();
        moves.sort_by_key(|mv| mv.step_number);
        let session = GameSession::new(mine_layout);
        Self {
            initial: session.clone(),
            session,
            moves,
            cursor: 0,
        }
    }

    /// Builds the layout from persisted dimensions and mine indices.
    pub fn from_parts(
        width: Coord,
        height: Coord,
        mine_indices: &[CellCount],
        moves: impl IntoIterator<Item = Move>,
    ) -> Result<Self> {
        let layout = MineLayout::from_mine_indices(width, height, mine_indices)?;
        Ok(Self::new(layout, moves))
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn total_steps(&self) -> usize {
        self.moves.len()
    }

    /// Number of steps already played.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn steps_remaining(&self) -> usize {
        self.moves.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.moves.len()
    }

    /// Status reached by the moves played so far.
    pub fn status(&self) -> GameStatus {
        self.session.state()
    }

    pub fn advance(&mut self) -> Result<ReplayStep> {
        let Some(&record) = self.moves.get(self.cursor) else {
            return Err(GameError::ReplayFinished);
        };
        self.cursor += 1;

        let step = match self.session.reveal(record.coords()) {
            Ok(revealed) => ReplayStep {
                record,
                result: Some(revealed.result()),
                delta: revealed.delta,
            },
            Err(err) => {
                log::warn!("Replay step {} skipped: {}", record.step_number, err);
                ReplayStep {
                    record,
                    result: None,
                    delta: Vec::new(),
                }
            }
        };

        if let Some(result) = step.result {
            if result != record.result {
                log::warn!(
                    "Replay step {} recorded as {} but plays out as {}",
                    record.step_number,
                    record.result,
                    result
                );
            }
        }
        Ok(step)
    }

    /// Plays every remaining step.
    pub fn run_to_end(&mut self) -> Vec<ReplayStep> {
        let mut steps = Vec::with_capacity(self.steps_remaining());
        while let Ok(step) = self.advance() {
            steps.push(step);
        }
        steps
    }

    /// Back to the empty board, ready to play the log again.
    pub fn rewind(&mut self) {
        self.session = self.initial.clone();
        self.cursor = 0;
    }

    /// The board decides an explosion; the label of the final move decides a
    /// win message.
    pub fn banner(&self) -> ReplayBanner {
        if self.session.state() == GameStatus::Lost {
            return ReplayBanner::Exploded;
        }
        if !self.is_finished() {
            return ReplayBanner::InProgress {
                step: self.cursor,
                total: self.moves.len(),
            };
        }
        match self.moves.last() {
            Some(last) if last.result == MoveResult::Won => ReplayBanner::Won,
            _ => ReplayBanner::Unfinished,
        }
    }
}
