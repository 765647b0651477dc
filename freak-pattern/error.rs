use std::path::PathBuf;

use freak_core::consts::NB_POINTS;
use thiserror::Error;

/// Configuration and pair-table failures, all reported at build time
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid pattern scale: {0} (must be finite and > 0)")]
    InvalidPatternScale(f32),
    #[error("Invalid octave count: {0} (must be > 0)")]
    InvalidOctaveCount(u32),
    #[error("Pattern scale {pattern_scale} over {n_octaves} octaves overflows the largest pattern scale")]
    PatternTooLarge { pattern_scale: f32, n_octaves: u32 },
    #[error("Pair table I/O failed for {}: {source}", path.display())]
    PairTableIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed pair-table record on line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },
    #[error("Pair table holds {actual} pairs, expected {expected}")]
    WrongPairCount { expected: usize, actual: usize },
    #[error("Pair #{record} ({i}, {j}) has an index outside 0..{}", NB_POINTS)]
    IndexOutOfRange { record: usize, i: usize, j: usize },
    #[error("Pair #{record} compares point {i} with itself")]
    DegeneratePair { record: usize, i: usize },
    #[error("Pair #{record} ({i}, {j}) duplicates pair #{first}")]
    DuplicatePair {
        record: usize,
        i: usize,
        j: usize,
        first: usize,
    },
}

pub type PatternResult<T> = Result<T, PatternError>;
