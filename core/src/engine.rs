use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Derived lifecycle state, computed from the board on demand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No reveal yet, mines are not placed.
    Ready,
    Active,
    /// Every mine is marked.
    Won,
    /// A mine tile is revealed.
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Board state and rules for one play session.
///
/// Mines are placed lazily on the first reveal so the picked tile and its neighbors are always safe. Player moves never
/// fail: moves that do not apply (out of range, already revealed, marked, mark cap reached) report `NoChange`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineSnapshot")]
pub struct PlayEngine {
    config: GameConfig,
    board: Array2<Tile>,
    mines_placed: bool,
    marked_count: CellCount,
    move_history: Vec<Coord2>,
    seed: u64,
}

/// Raw shape of a serialized [`PlayEngine`], checked before it becomes a live engine.
#[derive(Deserialize)]
struct EngineSnapshot {
    config: GameConfig,
    board: Array2<Tile>,
    mines_placed: bool,
    marked_count: CellCount,
    move_history: Vec<Coord2>,
    seed: u64,
}

impl TryFrom<EngineSnapshot> for PlayEngine {
    type Error = GameError;

    fn try_from(snapshot: EngineSnapshot) -> Result<Self> {
        let EngineSnapshot {
            config,
            board,
            mines_placed,
            marked_count,
            move_history,
            seed,
        } = snapshot;

        config.validate()?;
        if board.dim() != (usize::from(config.size.0), usize::from(config.size.1)) {
            return Err(GameError::InvalidBoardShape);
        }

        let engine = Self {
            config,
            board,
            mines_placed,
            marked_count,
            move_history,
            seed,
        };

        if engine
            .move_history
            .iter()
            .any(|&coords| engine.tile_at(coords).is_none())
        {
            return Err(GameError::InvalidCoords);
        }

        let marked = engine.board.iter().filter(|tile| tile.marked).count();
        let mines = engine.board.iter().filter(|tile| tile.mine).count();
        let expected_mines = if mines_placed {
            usize::from(config.mines)
        } else {
            0
        };
        if marked != usize::from(marked_count)
            || marked_count > config.mines
            || mines != expected_mines
            || engine.board.iter().any(|tile| tile.revealed && tile.marked)
        {
            return Err(GameError::InconsistentSnapshot);
        }

        Ok(engine)
    }
}

impl PlayEngine {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::blank(config, seed))
    }

    /// Starts a session on a fixed layout, skipping lazy placement.
    pub fn from_layout(layout: &MineLayout) -> Result<Self> {
        let config = layout.game_config();
        config.validate()?;
        let mut engine = Self::blank(config, 0);
        engine.apply_layout(layout);
        Ok(engine)
    }

    fn blank(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            board: Array2::default(config.size.to_nd_index()),
            mines_placed: false,
            marked_count: 0,
            move_history: Vec::new(),
            seed,
        }
    }

    pub fn reset(&mut self, config: GameConfig) -> Result<()> {
        self.reset_with_seed(config, rand::random())
    }

    /// Discards every tile, mark and history entry. On error the current session is left untouched.
    pub fn reset_with_seed(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        config.validate()?;
        log::debug!(
            "Reset to {}x{} with {} mines",
            config.size.0,
            config.size.1,
            config.mines
        );
        *self = Self::blank(config, seed);
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count
    }

    pub fn tiles(&self) -> &Array2<Tile> {
        &self.board
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&Tile> {
        self.board.get(coords.to_nd_index())
    }

    pub fn view_at(&self, coords: Coord2) -> Option<TileView> {
        self.tile_at(coords).map(|tile| tile.view())
    }

    pub fn move_history(&self) -> &[Coord2] {
        &self.move_history
    }

    /// How many mines have not been marked yet.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.marked_count as isize)
    }

    /// Won once every mine is marked. Hidden safe tiles do not prevent a win.
    pub fn check_win(&self) -> bool {
        if !self.mines_placed {
            return false;
        }

        self.board.iter().all(|tile| !tile.mine || tile.marked)
    }

    pub fn state(&self) -> EngineState {
        if !self.mines_placed {
            EngineState::Ready
        } else if self.board.iter().any(|tile| tile.mine && tile.revealed) {
            EngineState::Lost
        } else if self.check_win() {
            EngineState::Won
        } else {
            EngineState::Active
        }
    }

    pub fn toggle_mark_tile(&mut self, coords: Coord2) -> MarkOutcome {
        use MarkOutcome::*;

        let Some(&tile) = self.tile_at(coords) else {
            return NoChange;
        };

        if tile.revealed {
            NoChange
        } else if tile.marked {
            self.board[coords.to_nd_index()].marked = false;
            self.marked_count -= 1;
            Changed
        } else if self.marked_count < self.config.mines {
            self.board[coords.to_nd_index()].marked = true;
            self.marked_count += 1;
            Changed
        } else {
            log::trace!("Mark at {:?} ignored, all {} marks used", coords, self.config.mines);
            NoChange
        }
    }

    pub fn reveal_tile(&mut self, coords: Coord2) -> RevealOutcome {
        self.reveal_tile_with_events(coords, &mut Vec::new())
    }

    /// Reveals a tile and cascades over zero tiles, appending one event per newly revealed tile.
    pub fn reveal_tile_with_events(
        &mut self,
        coords: Coord2,
        events: &mut Vec<RevealEvent>,
    ) -> RevealOutcome {
        let Some(&tile) = self.tile_at(coords) else {
            return RevealOutcome::NoChange;
        };
        if tile.revealed {
            return RevealOutcome::NoChange;
        }

        if !self.mines_placed {
            self.place_mines(coords);
        }

        let tile = self.board[coords.to_nd_index()];
        if tile.marked {
            return RevealOutcome::NoChange;
        }

        if tile.mine {
            self.board[coords.to_nd_index()].revealed = true;
            events.push(RevealEvent { coords, wave: 0 });
            log::debug!("Revealed mine at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(coords, events);
        RevealOutcome::Revealed
    }

    /// Opens `start` and, through zero tiles, the connected zero region plus its border.
    fn flood_reveal(&mut self, start: Coord2, events: &mut Vec<RevealEvent>) {
        let mut to_visit = VecDeque::from([(start, 0u16)]);

        while let Some((coords, wave)) = to_visit.pop_front() {
            let tile = &mut self.board[coords.to_nd_index()];
            if tile.revealed || tile.marked || tile.mine {
                continue;
            }

            tile.revealed = true;
            let adjacent_mines = tile.adjacent_mines;
            events.push(RevealEvent { coords, wave });
            log::trace!(
                "Opened tile at {:?}, mine count: {}, wave: {}",
                coords,
                adjacent_mines,
                wave
            );

            if adjacent_mines == 0 {
                let next_wave = wave.saturating_add(1);
                to_visit.extend(
                    self.board
                        .iter_neighbors(coords)
                        .filter(|&pos| {
                            let neighbor = self.board[pos.to_nd_index()];
                            !neighbor.revealed && !neighbor.marked
                        })
                        .map(|pos| (pos, next_wave)),
                );
            }
        }
    }

    fn place_mines(&mut self, excluding: Coord2) {
        let layout = RandomMinefieldGenerator::new(self.seed).generate(self.config, excluding);
        self.apply_layout(&layout);
        log::debug!(
            "Placed {} mines around first reveal at {:?}, seed {}",
            layout.mine_count(),
            excluding,
            self.seed
        );
    }

    /// Copies mines from `layout` and recomputes adjacency for every safe tile. Marks are kept.
    fn apply_layout(&mut self, layout: &MineLayout) {
        for coords in iter_coords(self.config.size) {
            let mine = layout.contains_mine(coords);
            let tile = &mut self.board[coords.to_nd_index()];
            tile.mine = mine;
            tile.adjacent_mines = if mine {
                0
            } else {
                layout.adjacent_mine_count(coords)
            };
        }
        self.mines_placed = true;
    }

    /// Records a losing reveal so it can be taken back with [`Self::undo_last_move`].
    pub fn register_losing_move(&mut self, coords: Coord2) {
        if self.tile_at(coords).is_none() {
            return;
        }
        log::debug!("Losing move at {:?}", coords);
        self.move_history.push(coords);
    }

    /// Hides the tile of the most recent losing move again. Nothing else from that move is undone.
    pub fn undo_last_move(&mut self) -> Option<Coord2> {
        let coords = self.move_history.pop()?;
        let Some(tile) = self.board.get_mut(coords.to_nd_index()) else {
            log::warn!("Dropped out of range losing move at {:?}", coords);
            return None;
        };
        if tile.marked {
            self.marked_count -= 1;
        }
        tile.revealed = false;
        tile.marked = false;
        log::debug!("Undid losing move at {:?}", coords);
        Some(coords)
    }
}
