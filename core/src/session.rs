use serde::{Deserialize, Serialize};

use crate::*;

/// Undo attempts granted per game.
pub const DEFAULT_UNDO_LIMIT: u8 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoOutcome {
    Restored(Coord2),
    NothingToUndo,
    LimitReached,
}

/// One game at a chosen level, with the player-facing move rules layered over [`PlayEngine`].
///
/// Sound, haptics and alerts are left to the caller, driven by the outcomes returned here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    level: Level,
    engine: PlayEngine,
    undo_limit: u8,
    undos_used: u8,
    move_count: u32,
}

impl GameSession {
    pub fn new(level: Level, table: &LevelTable) -> Result<Self> {
        Ok(Self::from_engine(level, PlayEngine::new(table.config(level))?))
    }

    pub fn with_seed(level: Level, table: &LevelTable, seed: u64) -> Result<Self> {
        Ok(Self::from_engine(
            level,
            PlayEngine::with_seed(table.config(level), seed)?,
        ))
    }

    pub fn from_engine(level: Level, engine: PlayEngine) -> Self {
        Self {
            level,
            engine,
            undo_limit: DEFAULT_UNDO_LIMIT,
            undos_used: 0,
            move_count: 0,
        }
    }

    pub fn with_undo_limit(mut self, undo_limit: u8) -> Self {
        self.undo_limit = undo_limit;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Reveals and mark toggles that changed the board since the last restart.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn undos_left(&self) -> u8 {
        self.undo_limit.saturating_sub(self.undos_used)
    }

    pub fn open(&mut self, coords: Coord2) -> RevealOutcome {
        self.open_with_events(coords, &mut Vec::new())
    }

    /// Tap rule: marked tiles ignore taps, a hidden mine is recorded as the losing move and shown on its own, anything
    /// else goes through the regular reveal.
    pub fn open_with_events(
        &mut self,
        coords: Coord2,
        events: &mut Vec<RevealEvent>,
    ) -> RevealOutcome {
        let Some(&tile) = self.engine.tile_at(coords) else {
            return RevealOutcome::NoChange;
        };
        if tile.marked || tile.revealed || self.engine.state().is_finished() {
            return RevealOutcome::NoChange;
        }

        if tile.mine {
            self.engine.register_losing_move(coords);
        }
        let outcome = self.engine.reveal_tile_with_events(coords, events);
        self.count_move(outcome.has_update());
        outcome
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> MarkOutcome {
        if self.engine.state().is_finished() {
            return MarkOutcome::NoChange;
        }
        let outcome = self.engine.toggle_mark_tile(coords);
        self.count_move(outcome.has_update());
        outcome
    }

    fn count_move(&mut self, has_update: bool) {
        if has_update {
            self.move_count = self.move_count.saturating_add(1);
        }
    }

    pub fn undo(&mut self) -> UndoOutcome {
        if self.undos_used >= self.undo_limit {
            return UndoOutcome::LimitReached;
        }

        match self.engine.undo_last_move() {
            Some(coords) => {
                self.undos_used += 1;
                UndoOutcome::Restored(coords)
            }
            None => UndoOutcome::NothingToUndo,
        }
    }

    /// New board at the same level, with a fresh seed and the undo budget refilled.
    pub fn restart(&mut self) -> Result<()> {
        self.engine.reset(self.engine.config())?;
        self.undos_used = 0;
        self.move_count = 0;
        Ok(())
    }

    pub fn change_level(&mut self, level: Level, table: &LevelTable) -> Result<()> {
        self.engine.reset(table.config(level))?;
        self.level = level;
        self.undos_used = 0;
        self.move_count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mines: &[Coord2]) -> GameSession {
        let layout = MineLayout::from_mine_coords((3, 3), mines).unwrap();
        GameSession::from_engine(Level::Easy, PlayEngine::from_layout(&layout).unwrap())
    }

    #[test]
    fn tapping_mine_records_losing_move() {
        let mut session = session(&[(0, 0)]);

        assert_eq!(session.open((0, 0)), RevealOutcome::HitMine);
        assert_eq!(session.engine().move_history(), &[(0, 0)]);
        assert_eq!(session.engine().view_at((0, 0)), Some(TileView::Mine));
        assert_eq!(session.state(), EngineState::Lost);
    }

    #[test]
    fn tapping_marked_tile_is_ignored() {
        let mut session = session(&[(0, 0)]);
        session.toggle_mark((0, 0));

        assert_eq!(session.open((0, 0)), RevealOutcome::NoChange);
        assert!(session.engine().move_history().is_empty());
    }

    #[test]
    fn moves_are_ignored_after_loss_until_undo() {
        let mut session = session(&[(0, 0), (2, 2)]);
        session.open((0, 0));

        assert_eq!(session.open((2, 2)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_mark((2, 2)), MarkOutcome::NoChange);

        assert_eq!(session.undo(), UndoOutcome::Restored((0, 0)));
        assert_eq!(session.state(), EngineState::Active);
        assert_eq!(session.toggle_mark((2, 2)), MarkOutcome::Changed);
    }

    #[test]
    fn undo_budget_runs_out() {
        let mut session = session(&[(0, 0)]).with_undo_limit(2);

        for _ in 0..2 {
            session.open((0, 0));
            assert!(matches!(session.undo(), UndoOutcome::Restored(_)));
        }
        session.open((0, 0));

        assert_eq!(session.undos_left(), 0);
        assert_eq!(session.undo(), UndoOutcome::LimitReached);
        assert_eq!(session.state(), EngineState::Lost);
    }

    #[test]
    fn undo_without_losing_move_keeps_budget() {
        let mut session = session(&[(0, 0)]);

        assert_eq!(session.undo(), UndoOutcome::NothingToUndo);
        assert_eq!(session.undos_left(), DEFAULT_UNDO_LIMIT);
    }

    #[test]
    fn restart_refills_undo_budget() {
        let table = LevelTable::default();
        let mut session = GameSession::with_seed(Level::Normal, &table, 5).unwrap();
        session.open((8, 8));
        let mine = iter_coords(session.engine().size())
            .find(|&coords| session.engine().tile_at(coords).unwrap().mine)
            .unwrap();
        session.open(mine);
        session.undo();
        assert_eq!(session.undos_left(), DEFAULT_UNDO_LIMIT - 1);

        assert_eq!(session.restart(), Ok(()));

        assert_eq!(session.undos_left(), DEFAULT_UNDO_LIMIT);
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.level(), Level::Normal);
        assert_eq!(session.engine().config(), table.config(Level::Normal));
        assert_eq!(session.state(), EngineState::Ready);
    }

    #[test]
    fn move_count_ignores_moves_without_effect() {
        let mut session = session(&[(0, 0), (2, 2)]);

        session.open((1, 1));
        session.open((1, 1));
        session.open((5, 5));
        assert_eq!(session.move_count(), 1);

        session.toggle_mark((0, 0));
        session.toggle_mark((1, 1));
        assert_eq!(session.move_count(), 2);

        session.toggle_mark((0, 0));
        assert_eq!(session.move_count(), 3);
    }

    #[test]
    fn undo_outcome_survives_json() {
        let outcome = UndoOutcome::Restored((2, 7));

        let json = serde_json::to_string(&outcome).unwrap();

        assert_eq!(serde_json::from_str::<UndoOutcome>(&json).unwrap(), outcome);
    }

    #[test]
    fn change_level_resizes_board() {
        let table = LevelTable::default();
        let mut session = GameSession::with_seed(Level::Easy, &table, 5).unwrap();

        session.change_level(Level::Master, &table).unwrap();

        assert_eq!(session.level(), Level::Master);
        assert_eq!(session.engine().size(), (24, 30));
        assert_eq!(session.engine().mines_left(), 180);
    }

    #[test]
    fn first_tap_opens_start_block() {
        let table = LevelTable::default();
        let mut session = GameSession::with_seed(Level::Easy, &table, 12).unwrap();
        let mut events = Vec::new();

        assert_eq!(
            session.open_with_events((4, 4), &mut events),
            RevealOutcome::Revealed
        );
        assert!(events.len() >= 9);
        assert_eq!(session.state(), EngineState::Active);
    }
}
