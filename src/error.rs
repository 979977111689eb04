use std::io;

/// Everything that can be wrong with a board handed to the solver.
#[derive(thiserror::Error, Debug)]
pub enum PuzzleError {
    #[error("board is empty")]
    EmptyGrid,
    #[error("board dimension must be at least 2, got {0}")]
    DimensionTooSmall(usize),
    #[error("board dimension {0} is too large")]
    DimensionTooLarge(usize),
    #[error("row {row} has {len} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("expected {expected} tiles, found {found}")]
    TileCount { expected: usize, found: usize },
    #[error("tile {value} does not fit on a {size}x{size} board")]
    TileOutOfRange { value: u32, size: usize },
    #[error("tile {0} appears more than once")]
    DuplicateTile(u32),
    #[error("invalid token {token:?} at position {position}")]
    InvalidToken { token: String, position: usize },
    #[error("input ended early: {0}")]
    UnexpectedEof(&'static str),
    #[error("unexpected trailing input {0:?}")]
    TrailingInput(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
