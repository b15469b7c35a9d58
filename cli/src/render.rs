use std::fmt;

use sapper_core::GameSession;

/// The board with column numbers on top and row numbers on the left.
pub struct Labelled<'a>(pub &'a GameSession);

impl fmt::Display for Labelled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.0.size();
        let label_width = rows.saturating_sub(1).to_string().len();
        let cell_width = cols.saturating_sub(1).to_string().len();

        write!(f, "{:label_width$} ", "")?;
        for col in 0..cols {
            write!(f, " {col:>cell_width$}")?;
        }
        writeln!(f)?;

        for (row, line) in self.0.to_string().lines().enumerate() {
            write!(f, "{row:>label_width$} ")?;
            for glyph in line.chars() {
                write!(f, " {glyph:>cell_width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn board(session: &GameSession) -> String {
    Labelled(session).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::MineLayout;

    #[test]
    fn adds_row_and_column_labels() {
        let layout = MineLayout::from_mine_indices(3, 2, &[5]).unwrap();
        let mut session = GameSession::new(layout);
        session.reveal((0, 0)).unwrap();

        assert_eq!(board(&session), "   0 1 2\n0  . 1 #\n1  . 1 #\n");
    }

    #[test]
    fn wide_boards_pad_every_column() {
        let layout = MineLayout::from_mine_indices(11, 1, &[]).unwrap();
        let session = GameSession::new(layout);

        let text = board(&session);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "    0  1  2  3  4  5  6  7  8  9 10");
        assert_eq!(lines[1], "0   #  #  #  #  #  #  #  #  #  #  #");
    }
}
