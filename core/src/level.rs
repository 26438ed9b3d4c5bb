use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Named difficulty presets offered by the level picker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Easy,
    Normal,
    Hard,
    Master,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Easy, Level::Normal, Level::Hard, Level::Master];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Master => "Master",
        }
    }

    /// Built-in board for this level.
    pub const fn preset(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((9, 9), 10),
            Self::Normal => GameConfig::new_unchecked((16, 16), 40),
            Self::Hard => GameConfig::new_unchecked((16, 30), 99),
            Self::Master => GameConfig::new_unchecked((24, 30), 180),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownLevel)
    }
}

/// Board configuration per level. Missing entries fall back to the presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTable {
    pub easy: GameConfig,
    pub normal: GameConfig,
    pub hard: GameConfig,
    pub master: GameConfig,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            easy: Level::Easy.preset(),
            normal: Level::Normal.preset(),
            hard: Level::Hard.preset(),
            master: Level::Master.preset(),
        }
    }
}

impl LevelTable {
    /// Parses a table such as `{"hard": {"size": [20, 30], "mines": 120}}` and validates every entry.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected level table: {}", err);
            GameError::InvalidLevelTable
        })?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        for level in Level::ALL {
            self.config(level).validate()?;
        }
        Ok(())
    }

    pub const fn config(&self, level: Level) -> GameConfig {
        match level {
            Level::Easy => self.easy,
            Level::Normal => self.normal,
            Level::Hard => self.hard,
            Level::Master => self.master,
        }
    }
}
