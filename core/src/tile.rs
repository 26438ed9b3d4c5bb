use serde::{Deserialize, Serialize};

/// Full state of one board position, hidden mine information included.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub mine: bool,
    /// Only meaningful for tiles without a mine.
    pub adjacent_mines: u8,
    pub revealed: bool,
    pub marked: bool,
}

impl Tile {
    pub const fn is_hidden(self) -> bool {
        !self.revealed
    }

    pub const fn view(self) -> TileView {
        match (self.revealed, self.mine, self.marked) {
            (true, true, _) => TileView::Mine,
            (true, false, _) => TileView::Revealed(self.adjacent_mines),
            (false, _, true) => TileView::Marked,
            (false, _, false) => TileView::Hidden,
        }
    }
}

/// Player-visible state of a tile, what a renderer draws.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    #[default]
    Hidden,
    Marked,
    Revealed(u8),
    Mine,
}

impl TileView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tile_is_hidden() {
        assert_eq!(Tile::default().view(), TileView::Hidden);
        assert!(Tile::default().is_hidden());
    }

    #[test]
    fn view_prefers_revealed_over_marked() {
        let tile = Tile {
            mine: true,
            adjacent_mines: 0,
            revealed: true,
            marked: true,
        };
        assert_eq!(tile.view(), TileView::Mine);
        assert!(!tile.view().is_unrevealed());
    }

    #[test]
    fn view_hides_mine_under_mark() {
        let tile = Tile {
            mine: true,
            marked: true,
            ..Tile::default()
        };
        assert_eq!(tile.view(), TileView::Marked);
        assert!(tile.view().is_unrevealed());
    }
}
