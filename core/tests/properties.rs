use std::collections::{BTreeSet, VecDeque};

use proptest::collection::vec;
use proptest::prelude::*;
use sapper_core::*;

#[derive(Debug, Clone)]
struct Board {
    width: Coord,
    height: Coord,
    mines: Vec<CellCount>,
    clicks: Vec<Coord2>,
}

impl Board {
    fn layout(&self) -> MineLayout {
        MineLayout::from_mine_indices(self.width, self.height, &self.mines).unwrap()
    }
}

fn board() -> impl Strategy<Value = Board> {
    (1u16..9, 1u16..9).prop_flat_map(|(width, height)| {
        let cells = usize::from(width) * usize::from(height);
        (
            vec(prop::bool::weighted(0.2), cells),
            vec((0..height, 0..width), 0..24),
        )
            .prop_map(move |(mask, clicks)| Board {
                width,
                height,
                mines: mask
                    .iter()
                    .enumerate()
                    .filter(|&(_, &mine)| mine)
                    .map(|(index, _)| index as CellCount)
                    .collect(),
                clicks,
            })
    })
}

fn brute_neighbors((row, col): Coord2, (rows, cols): Coord2) -> Vec<Coord2> {
    let mut out = Vec::new();
    for d_row in -1i32..=1 {
        for d_col in -1i32..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let r = i32::from(row) + d_row;
            let c = i32::from(col) + d_col;
            if r >= 0 && c >= 0 && r < i32::from(rows) && c < i32::from(cols) {
                out.push((r as Coord, c as Coord));
            }
        }
    }
    out
}

/// Cells a recursive reveal of a zero cell would open.
fn expected_region(layout: &MineLayout, start: Coord2) -> BTreeSet<Coord2> {
    let mut opened = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        if layout.adjacent_mine_count(pos) != 0 {
            continue;
        }
        for next in brute_neighbors(pos, layout.size()) {
            if opened.insert(next) {
                queue.push_back(next);
            }
        }
    }
    opened
}

fn revealed(session: &GameSession) -> BTreeSet<Coord2> {
    let (rows, cols) = session.size();
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&pos| session.cell_at(pos).is_revealed())
        .collect()
}

/// Plays the clicks the way the live client does, ignoring rejected moves.
fn play(board: &Board) -> (GameSession, Vec<Move>, Vec<Vec<CellChange>>) {
    let mut session = GameSession::new(board.layout());
    let mut moves = Vec::new();
    let mut deltas = Vec::new();
    for &click in &board.clicks {
        match session.reveal(click) {
            Ok(step) => {
                moves.push(step.record);
                deltas.push(step.delta);
            }
            Err(err) => assert!(err.is_illegal_move()),
        }
    }
    (session, moves, deltas)
}

proptest! {
    #[test]
    fn adjacent_count_matches_brute_force(board in board()) {
        let layout = board.layout();
        for row in 0..board.height {
            for col in 0..board.width {
                let expected = brute_neighbors((row, col), layout.size())
                    .into_iter()
                    .filter(|&pos| layout.contains_mine(pos))
                    .count();
                prop_assert_eq!(usize::from(layout.adjacent_mine_count((row, col))), expected);
            }
        }
    }

    #[test]
    fn zero_reveal_opens_whole_region_and_border(board in board()) {
        let layout = board.layout();
        let start = (0..board.height)
            .flat_map(|row| (0..board.width).map(move |col| (row, col)))
            .find(|&pos| !layout.contains_mine(pos) && layout.adjacent_mine_count(pos) == 0);
        prop_assume!(start.is_some());
        let start = start.unwrap();

        let mut session = GameSession::new(layout.clone());
        let step = session.reveal(start).unwrap();

        prop_assert_eq!(revealed(&session), expected_region(&layout, start));
        // no cell is opened twice
        let opened: BTreeSet<_> = step.delta.iter().map(|change| change.coords).collect();
        prop_assert_eq!(opened.len(), step.delta.len());
    }

    #[test]
    fn won_exactly_when_all_safe_cells_are_open(board in board()) {
        let layout = board.layout();
        let mut session = GameSession::new(layout.clone());
        for &click in &board.clicks {
            if layout.contains_mine(click) {
                continue;
            }
            let before = session.state();
            if let Ok(step) = session.reveal(click) {
                let all_open = session.revealed_count() == layout.safe_cell_count();
                prop_assert_eq!(before, GameStatus::Playing);
                prop_assert_eq!(step.result() == MoveResult::Won, all_open);
                prop_assert_eq!(session.state() == GameStatus::Won, all_open);
            }
            prop_assert_eq!(revealed(&session).len() as CellCount, session.revealed_count());
        }
    }

    #[test]
    fn finished_games_never_change(board in board()) {
        let (mut session, _, _) = play(&board);
        prop_assume!(session.is_finished());
        let frozen = session.clone();

        for &click in &board.clicks {
            prop_assert_eq!(session.reveal(click), Err(GameError::AlreadyEnded));
            prop_assert_eq!(session.toggle_flag(click), Err(GameError::AlreadyEnded));
        }
        prop_assert_eq!(session, frozen);
    }

    #[test]
    fn replay_reproduces_live_play(board in board()) {
        let (session, moves, deltas) = play(&board);

        let mut replay = Replay::new(board.layout(), moves.clone());
        let first = replay.run_to_end();
        let mut again = Replay::new(board.layout(), moves);
        let second = again.run_to_end();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), deltas.len());
        for (step, delta) in first.iter().zip(&deltas) {
            prop_assert!(step.is_consistent());
            prop_assert_eq!(&step.delta, delta);
        }
        prop_assert_eq!(replay.status(), session.state());
        prop_assert_eq!(replay.session(), &session);
    }
}
