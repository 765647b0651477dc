//! Plain-text description-pair tables.
//!
//! One `i j` record per line, in table order. Blank lines and `#` comments are
//! skipped.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use freak_core::consts::{NB_PAIRS, NB_POINTS};
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::{PatternError, PatternResult};
use crate::pairs::validate_description_pairs;
use crate::types::DescriptionPair;

/// Parse and validate a 512-pair table
pub fn parse_pair_table(text: &str) -> PatternResult<Vec<DescriptionPair>> {
    let mut pairs = Vec::with_capacity(NB_PAIRS);

    for (line_no, line) in text.lines().enumerate() {
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let malformed = || PatternError::MalformedRecord {
            line: line_no + 1,
            content: content.to_string(),
        };
        let mut fields = content.split_whitespace();
        let (i, j) = match (fields.next(), fields.next(), fields.next()) {
            (Some(i), Some(j), None) => (
                i.parse::<usize>().map_err(|_| malformed())?,
                j.parse::<usize>().map_err(|_| malformed())?,
            ),
            _ => return Err(malformed()),
        };
        if i >= NB_POINTS || j >= NB_POINTS {
            return Err(PatternError::IndexOutOfRange {
                record: pairs.len(),
                i,
                j,
            });
        }
        pairs.push(DescriptionPair::new(i as u8, j as u8));
    }

    validate_description_pairs(&pairs, NB_PAIRS)?;
    Ok(pairs)
}

/// Load a pair table from disk
pub fn read_pair_table<P: AsRef<Path>>(path: P) -> PatternResult<Vec<DescriptionPair>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PatternError::PairTableIo {
        path: path.to_path_buf(),
        source,
    })?;
    let pairs = parse_pair_table(&text)?;
    info!("loaded {} description pairs from {}", pairs.len(), path.display());
    Ok(pairs)
}

/// Render pairs in the table format, with a leading comment line
pub fn format_pair_table(pairs: &[DescriptionPair]) -> String {
    let mut out = String::with_capacity(pairs.len() * 6 + 64);
    let _ = writeln!(out, "# FREAK description pairs: {} records, one `i j` per line", pairs.len());
    for pair in pairs {
        let _ = writeln!(out, "{} {}", pair.i, pair.j);
    }
    out
}

/// Validate and write a 512-pair table.
///
/// The records go to a temporary file next to `path` which then replaces the
/// target, so an existing table is either fully replaced or left untouched.
pub fn write_pair_table<P: AsRef<Path>>(path: P, pairs: &[DescriptionPair]) -> PatternResult<()> {
    validate_description_pairs(pairs, NB_PAIRS)?;

    let path = path.as_ref();
    let io_err = |source: std::io::Error| PatternError::PairTableIo {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(format_pair_table(pairs).as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    debug!("wrote {} description pairs to {}", pairs.len(), path.display());
    Ok(())
}
