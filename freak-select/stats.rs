//! Per-bit activation statistics over a set of descriptors.

use rayon::prelude::*;

use crate::error::{SelectError, SelectResult};

/// Descriptor bits stored column-wise, one packed bitset per bit position.
///
/// Row `r` of column `c` is bit `c` of training descriptor `r`.
#[derive(Debug, Clone)]
pub struct BitColumns {
    n_rows: usize,
    n_columns: usize,
    words: usize,
    data: Vec<u64>,
    ones: Vec<u64>,
}

impl BitColumns {
    /// Transpose packed descriptors (most significant bit first) into columns
    pub fn from_descriptors(descriptors: &[Vec<u8>], n_columns: usize) -> Self {
        let n_rows = descriptors.len();
        let words = (n_rows + 63) / 64;
        let data: Vec<u64> = (0..n_columns)
            .into_par_iter()
            .flat_map_iter(|c| {
                let (byte, mask) = (c >> 3, 0x80u8 >> (c & 7));
                let mut column = vec![0u64; words];
                for (r, desc) in descriptors.iter().enumerate() {
                    if desc.get(byte).map_or(false, |b| b & mask != 0) {
                        column[r >> 6] |= 1 << (r & 63);
                    }
                }
                column
            })
            .collect();
        Self::from_raw(n_rows, n_columns, data)
    }

    /// Build from explicit boolean columns of equal length
    pub fn from_columns(columns: &[Vec<bool>]) -> SelectResult<Self> {
        let n_rows = columns.first().map_or(0, Vec::len);
        let words = (n_rows + 63) / 64;
        let mut data = vec![0u64; columns.len() * words];
        for (c, column) in columns.iter().enumerate() {
            if column.len() != n_rows {
                return Err(SelectError::RowCountMismatch {
                    column: c,
                    expected: n_rows,
                    actual: column.len(),
                });
            }
            for (r, &bit) in column.iter().enumerate() {
                if bit {
                    data[c * words + (r >> 6)] |= 1 << (r & 63);
                }
            }
        }
        Ok(Self::from_raw(n_rows, columns.len(), data))
    }

    fn from_raw(n_rows: usize, n_columns: usize, data: Vec<u64>) -> Self {
        let words = (n_rows + 63) / 64;
        let ones = data
            .chunks(words.max(1))
            .take(n_columns)
            .map(|col| col.iter().map(|w| w.count_ones() as u64).sum())
            .collect::<Vec<u64>>();
        // Zero rows leave `data` empty, so pad the counts
        let ones = if ones.len() < n_columns {
            vec![0; n_columns]
        } else {
            ones
        };
        Self {
            n_rows,
            n_columns,
            words,
            data,
            ones,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    #[inline]
    fn column(&self, c: usize) -> &[u64] {
        &self.data[c * self.words..(c + 1) * self.words]
    }

    /// Rows with bit `c` set
    pub fn ones(&self, c: usize) -> u64 {
        self.ones[c]
    }

    /// Fraction of rows with bit `c` set
    pub fn mean(&self, c: usize) -> f64 {
        if self.n_rows == 0 {
            return 0.0;
        }
        self.ones[c] as f64 / self.n_rows as f64
    }

    /// Pearson correlation of two columns, in `[-1, 1]`.
    ///
    /// A constant column carries no information and counts as fully
    /// correlated with every column.
    pub fn correlation(&self, a: usize, b: usize) -> f64 {
        let n = self.n_rows as i128;
        let na = self.ones[a] as i128;
        let nb = self.ones[b] as i128;
        let nab: u64 = self
            .column(a)
            .iter()
            .zip(self.column(b))
            .map(|(x, y)| (x & y).count_ones() as u64)
            .sum();

        let var_a = n * na - na * na;
        let var_b = n * nb - nb * nb;
        if var_a == 0 || var_b == 0 {
            return 1.0;
        }
        let cov = n * nab as i128 - na * nb;
        let corr = cov as f64 / ((var_a as f64) * (var_b as f64)).sqrt();
        corr.clamp(-1.0, 1.0)
    }
}
