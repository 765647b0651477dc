use freak_descriptor::ExtractError;
use freak_pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("Only {accepted} pairs passed the correlation filter, {required} required")]
    InsufficientPairs { accepted: usize, required: usize },
    #[error("Invalid correlation threshold: {0} (must be in [0, 1])")]
    InvalidThreshold(f64),
    #[error("No training keypoint produced a descriptor")]
    EmptyTrainingSet,
    #[error("Bit matrix has {actual} columns, expected {expected}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    #[error("Bit column {column} has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Descriptor extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("Pair table error: {0}")]
    Pattern(#[from] PatternError),
}

pub type SelectResult<T> = Result<T, SelectError>;
