use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a single successful reveal produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealStep {
    /// The entry to append to the move log.
    pub record: Move,
    /// Cells whose visible state changed, in the order they changed.
    pub delta: Vec<CellChange>,
}

impl RevealStep {
    pub const fn result(&self) -> MoveResult {
        self.record.result
    }
}

/// Live state of one game being played against a fixed mine layout.
///
/// Sessions can be serialized for inspection but are only ever built from a
/// layout, never read back:
///
/// ```compile_fail
/// let _: sapper_core::GameSession = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSession {
    mine_layout: MineLayout,
    board: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    step_count: u32,
    state: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            step_count: 0,
            state: GameStatus::Playing,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameStatus {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    /// Number of safe cells revealed so far.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Number of successful reveals, which is also the last step number.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn mines_left(&self) -> i64 {
        i64::from(self.mine_layout.mine_count()) - i64::from(self.flagged_count)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_playing()?;

        Ok(match self.board[coords.to_nd_index()] {
            Cell::Hidden => {
                self.board[coords.to_nd_index()] = Cell::Flagged;
                self.flagged_count += 1;
                Changed
            }
            Cell::Flagged => {
                self.board[coords.to_nd_index()] = Cell::Hidden;
                self.flagged_count -= 1;
                Changed
            }
            _ => NoChange,
        })
    }

    /// Reveals a cell and returns the move to record.
    ///
    /// Revealing an already revealed cell or playing after the game ended is
    /// rejected without touching any state or consuming a step. A flag on the
    /// target cell does not protect it.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealStep> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_playing()?;

        if !self.board[coords.to_nd_index()].is_unrevealed() {
            return Err(GameError::AlreadyRevealed);
        }

        let mut delta = Vec::new();
        let result = if self.mine_layout.contains_mine(coords) {
            self.explode(coords, &mut delta);
            MoveResult::Exploded
        } else {
            self.open_region(coords, &mut delta);
            if self.revealed_count == self.mine_layout.safe_cell_count() {
                self.end_game(GameStatus::Won);
                MoveResult::Won
            } else {
                MoveResult::Ok
            }
        };

        self.step_count += 1;
        let record = Move::new(self.step_count, coords, result);
        log::debug!(
            "Step {} at {:?}: {}, {} cells changed",
            record.step_number,
            coords,
            result,
            delta.len()
        );
        Ok(RevealStep { record, delta })
    }

    /// Opens one safe cell, returning its adjacent mine count.
    fn open_cell(&mut self, coords: Coord2, delta: &mut Vec<CellChange>) -> u8 {
        let count = self.mine_layout.adjacent_mine_count(coords);
        if self.board[coords.to_nd_index()] == Cell::Flagged {
            self.flagged_count -= 1;
        }
        let cell = Cell::Revealed(count);
        self.board[coords.to_nd_index()] = cell;
        self.revealed_count += 1;
        delta.push(CellChange { coords, cell });
        count
    }

    /// Opens a safe cell and, when it touches no mine, the whole connected
    /// zero region together with its numbered border.
    fn open_region(&mut self, start: Coord2, delta: &mut Vec<CellChange>) {
        if self.open_cell(start, delta) != 0 {
            return;
        }

        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .mine_layout
            .iter_neighbors(start)
            .filter(|&pos| self.board[pos.to_nd_index()].is_unrevealed())
            .collect();
        log::trace!("Starting flood-fill from {:?}, initial neighbors: {:?}", start, to_visit);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            if !self.board[visit_coords.to_nd_index()].is_unrevealed() {
                continue;
            }

            let visit_count = self.open_cell(visit_coords, delta);
            log::trace!("Flood opened cell at {:?}, mine count: {}", visit_coords, visit_count);

            // zero cells keep spreading, numbered cells form the border
            if visit_count == 0 {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()].is_unrevealed())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn explode(&mut self, coords: Coord2, delta: &mut Vec<CellChange>) {
        self.triggered_mine = Some(coords);
        self.set_cell(coords, Cell::Exploded, delta);

        let mines: Vec<_> = self
            .mine_layout
            .mine_coords()
            .filter(|&pos| pos != coords)
            .collect();
        for pos in mines {
            if self.board[pos.to_nd_index()].is_unrevealed() {
                self.set_cell(pos, Cell::Mine, delta);
            }
        }

        self.end_game(GameStatus::Lost);
    }

    fn set_cell(&mut self, coords: Coord2, cell: Cell, delta: &mut Vec<CellChange>) {
        if self.board[coords.to_nd_index()] == Cell::Flagged {
            self.flagged_count -= 1;
        }
        self.board[coords.to_nd_index()] = cell;
        delta.push(CellChange { coords, cell });
    }

    fn end_game(&mut self, state: GameStatus) {
        if self.state.is_finished() {
            return;
        }
        log::debug!("Game ended: {}", state);
        self.state = state;
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Text grid, one line per row, using [`Cell::glyph`].
impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.rows() {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
