use freak_core::consts::NB_POINTS;
use freak_core::Descriptor;
use freak_pattern::DescriptionPair;

/// Bytes needed for one bit per pair
#[inline]
pub fn descriptor_len(n_pairs: usize) -> usize {
    (n_pairs + 7) / 8
}

/// Pack one comparison bit per pair, in table order.
///
/// Bit `n` is set when `I(i) < I(j)` for pair `n`, and lives in byte `n / 8`
/// at position `7 - n % 8` (most significant bit first).
pub fn encode(values: &[u8; NB_POINTS], pairs: &[DescriptionPair]) -> Descriptor {
    let mut out = vec![0u8; descriptor_len(pairs.len())];
    for (n, pair) in pairs.iter().enumerate() {
        if values[pair.i as usize] < values[pair.j as usize] {
            out[n >> 3] |= 0x80 >> (n & 7);
        }
    }
    out
}

/// Read bit `n` back out of a packed descriptor
#[inline]
pub fn descriptor_bit(descriptor: &[u8], n: usize) -> bool {
    descriptor[n >> 3] & (0x80 >> (n & 7)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use freak_core::consts::{DESCRIPTOR_SIZE, EXTENDED_DESCRIPTOR_SIZE, NB_ALL_PAIRS, NB_PAIRS};
    use freak_pattern::{all_pairs, default_pairs};
    use proptest::prelude::*;

    fn ramp_values() -> [u8; NB_POINTS] {
        let mut values = [0u8; NB_POINTS];
        for (k, v) in values.iter_mut().enumerate() {
            *v = (k * 5) as u8;
        }
        values
    }

    #[test]
    fn test_msb_first_packing() {
        let values = ramp_values();
        // 0 < 1 sets bit, 2 > 1 clears it
        let pairs = [
            DescriptionPair::new(0, 1),
            DescriptionPair::new(2, 1),
            DescriptionPair::new(3, 4),
            DescriptionPair::new(4, 4),
            DescriptionPair::new(0, 1),
            DescriptionPair::new(0, 1),
            DescriptionPair::new(0, 1),
            DescriptionPair::new(9, 1),
            DescriptionPair::new(1, 9),
        ];
        let d = encode(&values, &pairs);
        assert_eq!(d.len(), 2);
        assert_eq!(d[0], 0b1010_1110);
        assert_eq!(d[1], 0b1000_0000);
        assert!(descriptor_bit(&d, 0));
        assert!(!descriptor_bit(&d, 1));
        assert!(descriptor_bit(&d, 8));
    }

    #[test]
    fn test_equal_values_clear_the_bit() {
        let values = [42u8; NB_POINTS];
        let d = encode(&values, &default_pairs());
        assert!(d.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_lengths() {
        let values = ramp_values();
        assert_eq!(encode(&values, &default_pairs()).len(), DESCRIPTOR_SIZE);
        assert_eq!(descriptor_len(NB_PAIRS), DESCRIPTOR_SIZE);
        let extended = encode(&values, &all_pairs());
        assert_eq!(extended.len(), EXTENDED_DESCRIPTOR_SIZE);
        // Canonical pairs are (i, j) with j < i, so with increasing values
        // no bit is set and the padding stays clear
        assert!(extended.iter().all(|&b| b == 0));
        assert_eq!(descriptor_len(NB_ALL_PAIRS), EXTENDED_DESCRIPTOR_SIZE);
    }

    proptest! {
        #[test]
        fn prop_bits_follow_comparisons(
            raw in proptest::collection::vec(any::<u8>(), NB_POINTS),
        ) {
            let mut values = [0u8; NB_POINTS];
            values.copy_from_slice(&raw);
            let pairs = all_pairs();
            let d = encode(&values, &pairs);
            for (n, p) in pairs.iter().enumerate() {
                prop_assert_eq!(descriptor_bit(&d, n), values[p.i as usize] < values[p.j as usize]);
            }
        }
    }
}
