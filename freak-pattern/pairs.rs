use std::collections::HashMap;

use freak_core::consts::{
    NB_ALL_PAIRS, NB_ORIENTATION_PAIRS, NB_PAIRS, NB_POINTS, ORIENTATION_WEIGHT_SCALE,
};

use crate::error::{PatternError, PatternResult};
use crate::types::{DescriptionPair, OrientationPair, PatternPoint};

/// Identities of the built-in description pairs, as positions in [`all_pairs`].
///
/// This is the published FREAK selection, obtained by running the pair
/// selector on a large natural-image corpus.
pub const DEFAULT_PAIR_IDS: [u16; NB_PAIRS] = [
    404, 431, 818, 511, 181, 52, 311, 874, 774, 543, 719, 230, 417, 205, 11, 560,
    149, 265, 39, 306, 165, 857, 250, 8, 61, 15, 55, 717, 44, 412, 592, 134,
    761, 695, 660, 782, 625, 487, 549, 516, 271, 665, 762, 392, 178, 796, 773, 31,
    672, 845, 548, 794, 677, 654, 241, 831, 225, 238, 849, 83, 691, 484, 826, 707,
    122, 517, 583, 731, 328, 339, 571, 475, 394, 472, 580, 381, 137, 93, 380, 327,
    619, 729, 808, 218, 213, 459, 141, 806, 341, 95, 382, 568, 124, 750, 193, 749,
    706, 843, 79, 199, 317, 329, 768, 198, 100, 466, 613, 78, 562, 783, 689, 136,
    838, 94, 142, 164, 679, 219, 419, 366, 418, 423, 77, 89, 523, 259, 683, 312,
    555, 20, 470, 684, 123, 458, 453, 833, 72, 113, 253, 108, 313, 25, 153, 648,
    411, 607, 618, 128, 305, 232, 301, 84, 56, 264, 371, 46, 407, 360, 38, 99,
    176, 710, 114, 578, 66, 372, 653, 129, 359, 424, 159, 821, 10, 323, 393, 5,
    340, 891, 9, 790, 47, 0, 175, 346, 236, 26, 172, 147, 574, 561, 32, 294,
    429, 724, 755, 398, 787, 288, 299, 769, 565, 767, 722, 757, 224, 465, 723, 498,
    467, 235, 127, 802, 446, 233, 544, 482, 800, 318, 16, 532, 801, 441, 554, 173,
    60, 530, 713, 469, 30, 212, 630, 899, 170, 266, 799, 88, 49, 512, 399, 23,
    500, 107, 524, 90, 194, 143, 135, 192, 206, 345, 148, 71, 119, 101, 563, 870,
    158, 254, 214, 276, 464, 332, 725, 188, 385, 24, 476, 40, 231, 620, 171, 258,
    67, 109, 844, 244, 187, 388, 701, 690, 50, 7, 850, 479, 48, 522, 22, 154,
    12, 659, 736, 655, 577, 737, 830, 811, 174, 21, 237, 335, 353, 234, 53, 270,
    62, 182, 45, 177, 245, 812, 673, 355, 556, 612, 166, 204, 54, 248, 365, 226,
    242, 452, 700, 685, 573, 14, 842, 481, 468, 781, 564, 416, 179, 405, 35, 819,
    608, 624, 367, 98, 643, 448, 2, 460, 676, 440, 240, 130, 146, 184, 185, 430,
    65, 807, 377, 82, 121, 708, 239, 310, 138, 596, 730, 575, 477, 851, 797, 247,
    27, 85, 586, 307, 779, 326, 494, 856, 324, 827, 96, 748, 13, 397, 125, 688,
    702, 92, 293, 716, 277, 140, 112, 4, 80, 855, 839, 1, 413, 347, 584, 493,
    289, 696, 19, 751, 379, 76, 73, 115, 6, 590, 183, 734, 197, 483, 217, 344,
    330, 400, 186, 243, 587, 220, 780, 200, 793, 246, 824, 41, 735, 579, 81, 703,
    322, 760, 720, 139, 480, 490, 91, 814, 813, 163, 152, 488, 763, 263, 425, 410,
    576, 120, 319, 668, 150, 160, 302, 491, 515, 260, 145, 428, 97, 251, 395, 272,
    252, 18, 106, 358, 854, 485, 144, 550, 131, 133, 378, 68, 102, 104, 58, 361,
    275, 209, 697, 582, 338, 742, 589, 325, 408, 229, 28, 304, 191, 189, 110, 126,
    486, 211, 547, 533, 70, 215, 670, 249, 36, 581, 389, 605, 331, 518, 442, 822,
];

/// Offsets within one ring of six; each ring contributes these nine pairs.
const RING_ORIENTATION_OFFSETS: [(u8, u8); 9] = [
    (0, 3),
    (1, 4),
    (2, 5),
    (0, 2),
    (1, 3),
    (2, 4),
    (3, 5),
    (4, 0),
    (5, 1),
];

/// Rings sampled for orientation, outermost first
const ORIENTATION_RINGS: usize = NB_ORIENTATION_PAIRS / RING_ORIENTATION_OFFSETS.len();

/// Every unordered pair of pattern points in canonical order:
/// `(1,0), (2,0), (2,1), (3,0), ...`, i.e. `i` ascending and `j < i`.
///
/// A pair's position in this list is its identity.
pub fn all_pairs() -> Vec<DescriptionPair> {
    let mut pairs = Vec::with_capacity(NB_ALL_PAIRS);
    for i in 1..NB_POINTS as u8 {
        for j in 0..i {
            pairs.push(DescriptionPair::new(i, j));
        }
    }
    pairs
}

/// Canonical identity of a pair, independent of its point order.
///
/// Returns `None` for a degenerate or out-of-range pair.
pub fn pair_identity(pair: DescriptionPair) -> Option<usize> {
    let (hi, lo) = pair.unordered();
    if hi == lo || hi as usize >= NB_POINTS {
        return None;
    }
    let hi = hi as usize;
    Some(hi * (hi - 1) / 2 + lo as usize)
}

/// The built-in 512-pair description table
pub fn default_pairs() -> Vec<DescriptionPair> {
    let all = all_pairs();
    DEFAULT_PAIR_IDS.iter().map(|&id| all[id as usize]).collect()
}

/// Point indices of the 45 orientation pairs, weights left at zero
pub fn orientation_pair_indices() -> [OrientationPair; NB_ORIENTATION_PAIRS] {
    let mut pairs = [OrientationPair::default(); NB_ORIENTATION_PAIRS];
    let offsets_per_ring = RING_ORIENTATION_OFFSETS.len();
    for ring in 0..ORIENTATION_RINGS {
        let base = (ring * 6) as u8;
        for (k, &(a, b)) in RING_ORIENTATION_OFFSETS.iter().enumerate() {
            let pair = &mut pairs[ring * offsets_per_ring + k];
            pair.i = base + a;
            pair.j = base + b;
        }
    }
    pairs
}

/// Orientation pairs with fixed-point weights derived from the reference
/// (scale 0, orientation 0) point positions
pub fn orientation_pairs(reference: &[PatternPoint]) -> [OrientationPair; NB_ORIENTATION_PAIRS] {
    let scale = ORIENTATION_WEIGHT_SCALE as f64;
    let mut pairs = orientation_pair_indices();
    for pair in pairs.iter_mut() {
        let pi = reference[pair.i as usize];
        let pj = reference[pair.j as usize];
        let dx = (pi.x - pj.x) as f64;
        let dy = (pi.y - pj.y) as f64;
        let norm_sq = dx * dx + dy * dy;
        pair.weight_dx = (dx / norm_sq * scale).round() as i32;
        pair.weight_dy = (dy / norm_sq * scale).round() as i32;
    }
    pairs
}

/// Check a description table: exact length, indices in range, no
/// self-comparisons and no repeated unordered pair
pub fn validate_description_pairs(pairs: &[DescriptionPair], expected: usize) -> PatternResult<()> {
    if pairs.len() != expected {
        return Err(PatternError::WrongPairCount {
            expected,
            actual: pairs.len(),
        });
    }

    let mut seen: HashMap<(u8, u8), usize> = HashMap::with_capacity(pairs.len());
    for (record, pair) in pairs.iter().enumerate() {
        let (i, j) = (pair.i as usize, pair.j as usize);
        if i >= NB_POINTS || j >= NB_POINTS {
            return Err(PatternError::IndexOutOfRange { record, i, j });
        }
        if i == j {
            return Err(PatternError::DegeneratePair { record, i });
        }
        if let Some(&first) = seen.get(&pair.unordered()) {
            return Err(PatternError::DuplicatePair { record, i, j, first });
        }
        seen.insert(pair.unordered(), record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_pairs_enumeration() {
        let pairs = all_pairs();
        assert_eq!(pairs.len(), NB_ALL_PAIRS);
        assert_eq!(pairs[0], DescriptionPair::new(1, 0));
        assert_eq!(pairs[1], DescriptionPair::new(2, 0));
        assert_eq!(pairs[2], DescriptionPair::new(2, 1));
        assert_eq!(pairs[NB_ALL_PAIRS - 1], DescriptionPair::new(42, 41));
        validate_description_pairs(&pairs, NB_ALL_PAIRS).unwrap();
    }

    #[test]
    fn test_default_pairs_are_valid() {
        let pairs = default_pairs();
        validate_description_pairs(&pairs, NB_PAIRS).unwrap();
        assert_eq!(pairs[0], all_pairs()[404]);
    }

    #[test]
    fn test_orientation_pair_indices() {
        let pairs = orientation_pair_indices();
        assert_eq!((pairs[0].i, pairs[0].j), (0, 3));
        assert_eq!((pairs[7].i, pairs[7].j), (4, 0));
        assert_eq!((pairs[9].i, pairs[9].j), (6, 9));
        assert_eq!((pairs[44].i, pairs[44].j), (29, 25));
        for p in pairs.iter() {
            assert_ne!(p.i, p.j);
            // Only the five outer rings
            assert!(p.i < 30 && p.j < 30);
        }
    }

    #[test]
    fn test_orientation_weights_follow_direction() {
        // Two points on the x axis, 10 px apart: weight = 4096 / 10
        let mut reference = vec![PatternPoint::default(); NB_POINTS];
        reference[0] = PatternPoint { x: 5.0, y: 0.0, sigma: 1.0 };
        reference[3] = PatternPoint { x: -5.0, y: 0.0, sigma: 1.0 };
        let pairs = orientation_pairs(&reference);
        assert_eq!(pairs[0].weight_dx, 410);
        assert_eq!(pairs[0].weight_dy, 0);
    }

    #[test]
    fn test_validation_errors() {
        let mut pairs = default_pairs();
        pairs.truncate(511);
        assert!(matches!(
            validate_description_pairs(&pairs, NB_PAIRS),
            Err(PatternError::WrongPairCount { expected: 512, actual: 511 })
        ));

        let mut pairs = default_pairs();
        pairs[10] = DescriptionPair::new(43, 1);
        assert!(matches!(
            validate_description_pairs(&pairs, NB_PAIRS),
            Err(PatternError::IndexOutOfRange { record: 10, .. })
        ));

        let mut pairs = default_pairs();
        pairs[3] = DescriptionPair::new(5, 5);
        assert!(matches!(
            validate_description_pairs(&pairs, NB_PAIRS),
            Err(PatternError::DegeneratePair { record: 3, i: 5 })
        ));

        let mut pairs = default_pairs();
        let first = pairs[2];
        pairs[20] = DescriptionPair::new(first.j, first.i);
        assert!(matches!(
            validate_description_pairs(&pairs, NB_PAIRS),
            Err(PatternError::DuplicatePair { record: 20, first: 2, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_identity_matches_enumeration(idx in 0usize..NB_ALL_PAIRS) {
            let pair = all_pairs()[idx];
            prop_assert_eq!(pair_identity(pair), Some(idx));
            prop_assert_eq!(pair_identity(DescriptionPair::new(pair.j, pair.i)), Some(idx));
        }

        #[test]
        fn prop_degenerate_pairs_have_no_identity(i in 0u8..60) {
            prop_assert_eq!(pair_identity(DescriptionPair::new(i, i)), None);
        }
    }
}
