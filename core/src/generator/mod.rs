use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    /// Builds a layout for `config`, keeping the cell at `start` (and ideally its neighbors) free of mines.
    fn generate(self, config: GameConfig, start: Coord2) -> MineLayout;
}
