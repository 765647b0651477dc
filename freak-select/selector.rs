use std::path::Path;

use freak_core::consts::{NB_ALL_PAIRS, NB_PAIRS};
use freak_core::{
    Descriptor, DescriptorExtractor, FreakConfig, Image, IntegralError, IntegralImage, Keypoint,
};
use freak_descriptor::FreakExtractor;
use freak_pattern::{all_pairs, write_pair_table, DescriptionPair};
use log::{debug, info, warn};

use crate::error::{SelectError, SelectResult};
use crate::stats::BitColumns;

/// Default maximum absolute correlation between two selected pairs
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;

/// One training image with the keypoints to describe in it
#[derive(Debug, Clone)]
pub struct TrainingImage {
    pub pixels: Image,
    pub integral: IntegralImage,
    pub keypoints: Vec<Keypoint>,
}

impl TrainingImage {
    /// Build the integral image for a `width`x`height` grayscale image
    pub fn new(
        pixels: Image,
        width: usize,
        height: usize,
        keypoints: Vec<Keypoint>,
    ) -> Result<Self, IntegralError> {
        let integral = IntegralImage::new(&pixels, width, height)?;
        Ok(Self {
            pixels,
            integral,
            keypoints,
        })
    }
}

/// Activation rate of one candidate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairStat {
    /// Fraction of training descriptors with this bit set
    pub mean: f64,
    /// Position in the canonical all-pairs enumeration
    pub idx: usize,
}

/// Outcome of a successful selection run
#[derive(Debug, Clone)]
pub struct PairSelection {
    /// Accepted pairs in selection order
    pub pairs: Vec<DescriptionPair>,
    /// Canonical identities of `pairs`
    pub identities: Vec<usize>,
    /// Every candidate, most balanced first
    pub stats: Vec<PairStat>,
    /// Training descriptors the statistics were computed from
    pub n_samples: usize,
}

/// Greedy selection of balanced, mutually decorrelated description pairs
#[derive(Debug, Clone)]
pub struct PairSelector {
    extractor: FreakExtractor,
    threshold: f64,
}

impl PairSelector {
    /// Selector describing training keypoints with all 903 pairs under `cfg`.
    ///
    /// Any pair table named in `cfg` is ignored.
    pub fn new(cfg: &FreakConfig) -> SelectResult<Self> {
        let cfg = FreakConfig {
            pair_table: None,
            ..cfg.clone()
        };
        Ok(Self {
            extractor: FreakExtractor::with_all_pairs(&cfg)?,
            threshold: DEFAULT_CORRELATION_THRESHOLD,
        })
    }

    /// Set the maximum absolute correlation, in `[0, 1]`
    pub fn with_threshold(mut self, threshold: f64) -> SelectResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SelectError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn extractor(&self) -> &FreakExtractor {
        &self.extractor
    }

    /// Extended descriptors of every training keypoint that survives extraction
    pub fn collect_descriptors(&self, images: &[TrainingImage]) -> SelectResult<Vec<Descriptor>> {
        let mut descriptors = Vec::new();
        let mut requested = 0usize;
        for image in images {
            requested += image.keypoints.len();
            let extraction =
                self.extractor
                    .compute_with_integral(&image.pixels, &image.integral, &image.keypoints)?;
            descriptors.extend(extraction.descriptors);
        }
        if descriptors.is_empty() {
            return Err(SelectError::EmptyTrainingSet);
        }
        info!(
            "computed {} extended descriptors from {} keypoints in {} images",
            descriptors.len(),
            requested,
            images.len()
        );
        Ok(descriptors)
    }

    /// Run the selection on the training images
    pub fn select(&self, images: &[TrainingImage]) -> SelectResult<PairSelection> {
        let descriptors = self.collect_descriptors(images)?;
        let columns = BitColumns::from_descriptors(&descriptors, NB_ALL_PAIRS);
        self.select_from_columns(&columns)
    }

    /// Run the selection and write the pairs as a pair table.
    ///
    /// Nothing is written unless a full table was selected.
    pub fn select_and_save<P: AsRef<Path>>(
        &self,
        images: &[TrainingImage],
        path: P,
    ) -> SelectResult<PairSelection> {
        let selection = self.select(images)?;
        write_pair_table(path.as_ref(), &selection.pairs)?;
        info!(
            "wrote {} selected pairs to {}",
            selection.pairs.len(),
            path.as_ref().display()
        );
        Ok(selection)
    }

    /// Select from precomputed all-pairs bit columns
    pub fn select_from_columns(&self, columns: &BitColumns) -> SelectResult<PairSelection> {
        if columns.n_columns() != NB_ALL_PAIRS {
            return Err(SelectError::ColumnCountMismatch {
                expected: NB_ALL_PAIRS,
                actual: columns.n_columns(),
            });
        }
        if columns.n_rows() == 0 {
            return Err(SelectError::EmptyTrainingSet);
        }

        let stats = rank_by_balance(columns);
        let identities = decorrelate(columns, &stats, self.threshold, NB_PAIRS);

        if identities.len() < NB_PAIRS {
            warn!(
                "only {} of {} pairs pass correlation threshold {}",
                identities.len(),
                NB_PAIRS,
                self.threshold
            );
            return Err(SelectError::InsufficientPairs {
                accepted: identities.len(),
                required: NB_PAIRS,
            });
        }

        let canonical = all_pairs();
        let pairs = identities.iter().map(|&idx| canonical[idx]).collect();
        info!(
            "selected {} pairs from {} samples at threshold {}",
            identities.len(),
            columns.n_rows(),
            self.threshold
        );
        Ok(PairSelection {
            pairs,
            identities,
            stats,
            n_samples: columns.n_rows(),
        })
    }
}

/// Column statistics sorted by distance of the mean from 0.5, ties by identity
pub fn rank_by_balance(columns: &BitColumns) -> Vec<PairStat> {
    let mut stats: Vec<PairStat> = (0..columns.n_columns())
        .map(|idx| PairStat {
            mean: columns.mean(idx),
            idx,
        })
        .collect();
    stats.sort_by(|a, b| {
        (a.mean - 0.5)
            .abs()
            .total_cmp(&(b.mean - 0.5).abs())
            .then(a.idx.cmp(&b.idx))
    });
    stats
}

/// Walk candidates in order, keeping each one whose absolute correlation with
/// every kept column is at most `threshold`. Stops after `target` columns.
pub fn decorrelate(
    columns: &BitColumns,
    ranked: &[PairStat],
    threshold: f64,
    target: usize,
) -> Vec<usize> {
    let mut accepted: Vec<usize> = Vec::with_capacity(target);
    for candidate in ranked {
        if accepted.len() >= target {
            break;
        }
        let independent = accepted
            .iter()
            .all(|&kept| columns.correlation(candidate.idx, kept).abs() <= threshold);
        if independent {
            accepted.push(candidate.idx);
        }
    }
    debug!(
        "decorrelation kept {} of {} candidates",
        accepted.len(),
        ranked.len()
    );
    accepted
}
