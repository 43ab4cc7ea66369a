use thiserror::Error;

/// Rejected custom key layouts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has no keys")]
    EmptyRow { row: usize },

    #[error("key {column} in row {row} has a blank label")]
    BlankLabel { row: usize, column: usize },
}

