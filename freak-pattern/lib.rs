//! Pattern Table Builder for the FREAK descriptor.
//!
//! Builds the immutable retina-like sampling template (43 points on 7 rings
//! plus the centre) at 64 scales and 256 orientations, the fixed 45-pair
//! orientation set, and the description-pair table: built-in, loaded from a
//! pair-table file, or all 903 pairs for calibration.

pub mod error;
pub mod geometry;
pub mod pair_file;
pub mod pairs;
pub mod table;
pub mod types;

pub use error::{PatternError, PatternResult};
pub use pair_file::{format_pair_table, parse_pair_table, read_pair_table, write_pair_table};
pub use pairs::{all_pairs, default_pairs, pair_identity, validate_description_pairs};
pub use table::{validate_geometry, PatternTable};
pub use types::{DescriptionPair, OrientationPair, PatternPoint};
