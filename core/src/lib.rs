#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use record::*;
pub use replay::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod record;
mod replay;
mod tile;
mod types;

/// Largest board, in cells, a layout is built for.
pub const MAX_CELLS: CellCount = 1 << 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// A board needs at least one cell and at least one safe cell.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        check_size(width, height)?;
        let config = Self::new_unchecked(width, height, mines);
        if mines >= config.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// `(rows, cols)`
    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }
}

fn check_size(width: Coord, height: Coord) -> Result<()> {
    if width == 0 || height == 0 || mult(width, height) > MAX_CELLS {
        return Err(GameError::InvalidSize);
    }
    Ok(())
}

/// The fixed mine set of one game.
///
/// Cells are addressed either by `(row, col)` or by the flat index
/// `row * width + col` used in persisted layouts. The mine set can only be
/// read once built:
///
/// ```compile_fail
/// let mut layout = sapper_core::MineLayout::from_mine_indices(2, 1, &[]).unwrap();
/// layout[(0, 1)] = true;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout from flat indices. Duplicates collapse into one mine,
    /// the declared mine count of a game is not checked here. Boards over
    /// [`MAX_CELLS`] are refused.
    pub fn from_mine_indices(
        width: Coord,
        height: Coord,
        mine_indices: &[CellCount],
    ) -> Result<Self> {
        check_size(width, height)?;
        let size = (height, width);
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let total = mult(width, height);

        for &index in mine_indices {
            if index >= total {
                return Err(GameError::InvalidCoords);
            }
            let row = index / CellCount::from(width);
            let col = index % CellCount::from(width);
            mine_mask[(row as Coord, col as Coord).to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(mine_mask);
        if (layout.mine_count as usize) < mine_indices.len() {
            log::warn!(
                "Duplicate mine indices collapsed, given: {}, distinct: {}",
                mine_indices.len(),
                layout.mine_count
            );
        }
        Ok(layout)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn index_of(&self, (row, col): Coord2) -> CellCount {
        CellCount::from(row) * CellCount::from(self.width()) + CellCount::from(col)
    }

    pub fn coords_of(&self, index: CellCount) -> Option<Coord2> {
        if index >= self.total_cells() {
            return None;
        }
        let width = CellCount::from(self.width());
        Some(((index / width) as Coord, (index % width) as Coord))
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Membership by flat index; indices outside the board hold no mine.
    pub fn is_mine(&self, index: CellCount) -> bool {
        self.coords_of(index).is_some_and(|coords| self[coords])
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    /// Mine indices in ascending order, the persisted form of the layout.
    pub fn mine_indices(&self) -> Vec<CellCount> {
        self.mine_mask
            .iter()
            .enumerate()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|(index, _)| index as CellCount)
            .collect()
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn flat_index_is_row_major() {
        let layout = MineLayout::from_mine_indices(4, 3, &[5]).unwrap();

        assert!(layout.contains_mine((1, 1)));
        assert!(layout.is_mine(5));
        assert_eq!(layout.index_of((2, 3)), 11);
        assert_eq!(layout.coords_of(11), Some((2, 3)));
        assert_eq!(layout.coords_of(12), None);
    }

    #[test]
    fn adjacent_count_skips_self_and_out_of_bounds() {
        // center mine of a 3x3 board
        let layout = MineLayout::from_mine_indices(3, 3, &[4]).unwrap();

        assert_eq!(layout.adjacent_mine_count((0, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 0);
        assert_eq!(layout.adjacent_mine_count((2, 1)), 1);
    }

    #[test]
    fn adjacent_count_on_corner_of_full_board() {
        let layout = MineLayout::from_mine_indices(3, 3, &[0, 1, 2, 3, 5, 6, 7, 8]).unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1)), 8);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 2);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(
            MineLayout::from_mine_indices(2, 2, &[4]),
            Err(GameError::InvalidCoords)
        );
        assert!(!MineLayout::from_mine_indices(2, 2, &[]).unwrap().is_mine(4));
    }

    #[test]
    fn duplicate_indices_collapse() {
        let layout = MineLayout::from_mine_indices(3, 2, &[2, 2, 4]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.mine_indices(), vec![2, 4]);
        assert_eq!(layout.safe_cell_count(), 4);
    }

    #[test]
    fn zero_sized_board_is_rejected() {
        assert_eq!(
            MineLayout::from_mine_indices(0, 3, &[]),
            Err(GameError::InvalidSize)
        );
    }

    #[test]
    fn oversized_board_is_rejected() {
        assert_eq!(
            MineLayout::from_mine_indices(65535, 65535, &[]),
            Err(GameError::InvalidSize)
        );
        assert_eq!(GameConfig::new(2048, 1024, 1), Err(GameError::InvalidSize));
        assert!(MineLayout::from_mine_indices(1024, 1024, &[0]).is_ok());
    }

    #[test]
    fn counts_follow_the_mine_set() {
        let layout = MineLayout::from_mine_indices(2, 1, &[1]).unwrap();
        let mut session = GameSession::new(layout.clone());

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 1);
        assert_eq!(session.reveal((0, 0)).unwrap().result(), MoveResult::Won);
    }

    #[test]
    fn config_requires_a_safe_cell() {
        assert_eq!(GameConfig::new(2, 2, 4), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new(0, 2, 1), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new(2, 2, 3).unwrap().total_cells(), 4);
    }
}
