use crate::*;
pub use random::*;

mod random;

/// Chooses where the mines of a new game go. Placement happens on the client
/// side; the layout is then submitted as-is.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
