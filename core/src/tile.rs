use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mine shown after the game was lost.
    Mine,
    /// The mine that ended the game.
    Exploded,
}

impl Cell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Hidden => '#',
            Self::Flagged => 'F',
            Self::Revealed(0) => '.',
            Self::Revealed(count) if count <= 8 => (b'0' + count) as char,
            Self::Revealed(_) => '?',
            Self::Mine => '*',
            Self::Exploded => 'X',
        }
    }
}
