//! Bounded-scratch element swapping.
//!
//! Swaps two equally sized, non-overlapping byte ranges of one buffer
//! through a fixed stack buffer of [`SWAP_CHUNK`] bytes. Elements larger
//! than the scratch are swapped chunk by chunk, so no heap allocation
//! happens regardless of stride.

use crate::policy::SWAP_CHUNK;

/// Exchange `data[a..a + len]` with `data[b..b + len]`.
///
/// Each chunk is copied out of `a` into scratch, `b` is moved over `a`,
/// and the scratch is copied into `b`. `a == b` leaves the bytes as they
/// were.
///
/// # Panics
///
/// Panics if either range lies outside `data`, or if the two ranges
/// partially overlap.
pub(crate) fn swap_ranges(data: &mut [u8], a: usize, b: usize, len: usize) {
    if a == b {
        return;
    }
    assert!(
        a.abs_diff(b) >= len,
        "swap ranges overlap: {a} and {b} with length {len}"
    );

    let mut scratch = [0u8; SWAP_CHUNK];
    let mut done = 0;
    while done < len {
        let n = (len - done).min(SWAP_CHUNK);
        let (ca, cb) = (a + done, b + done);
        scratch[..n].copy_from_slice(&data[ca..ca + n]);
        data.copy_within(cb..cb + n, ca);
        data[cb..cb + n].copy_from_slice(&scratch[..n]);
        done += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_small_ranges() {
        let mut data = [1, 2, 3, 4, 5, 6];
        swap_ranges(&mut data, 0, 4, 2);
        assert_eq!(data, [5, 6, 3, 4, 1, 2]);
    }

    #[test]
    fn same_range_is_untouched() {
        let mut data = [9, 8, 7];
        swap_ranges(&mut data, 1, 1, 2);
        assert_eq!(data, [9, 8, 7]);
    }

    #[test]
    fn swaps_ranges_larger_than_scratch() {
        let len = SWAP_CHUNK * 2 + 17;
        let mut data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let original_a = data.clone();
        data.extend((0..len).map(|i| (i % 13) as u8 + 100));
        let original_b = data[len..].to_vec();

        swap_ranges(&mut data, 0, len, len);
        assert_eq!(&data[..len], &original_b[..]);
        assert_eq!(&data[len..], &original_a[..]);
    }

    #[test]
    fn adjacent_ranges_are_allowed() {
        let mut data = [1, 2, 3, 4];
        swap_ranges(&mut data, 2, 0, 2);
        assert_eq!(data, [3, 4, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn overlapping_ranges_panic() {
        let mut data = [0u8; 8];
        swap_ranges(&mut data, 0, 2, 4);
    }
}
