//! Offline selection of FREAK description pairs.
//!
//! Training keypoints are described with all 903 point pairs. Pairs are then
//! ranked by how close their activation rate is to one half and accepted
//! greedily while their bit columns stay decorrelated from every pair already
//! accepted, until 512 pairs are found.

pub mod error;
pub mod selector;
pub mod stats;

pub use error::{SelectError, SelectResult};
pub use selector::{
    decorrelate, rank_by_balance, PairSelection, PairSelector, PairStat, TrainingImage,
    DEFAULT_CORRELATION_THRESHOLD,
};
pub use stats::BitColumns;
