use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Too many mines, at least one cell must stay safe")]
    TooManyMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Snapshot counters do not match its board")]
    InconsistentSnapshot,
    #[error("Unknown level name")]
    UnknownLevel,
    #[error("Level table could not be parsed")]
    InvalidLevelTable,
}

pub type Result<T> = core::result::Result<T, GameError>;
