//! Growth and shrink policy constants.
//!
//! The numbers here are compatibility constants: they reproduce the
//! capacities callers have come to expect, not tuned optima.

/// Smallest buffer ever allocated, in elements.
pub const MIN_CAPACITY: usize = 32;

/// Size of the stack scratch buffer used to swap elements, in bytes.
pub const SWAP_CHUNK: usize = 512;

/// Capacity to grow to when `additional` more slots are needed on top of
/// `capacity`.
///
/// Grows to 1.5x the just-satisfied requirement, floored at
/// [`MIN_CAPACITY`]. Returns `None` on arithmetic overflow.
pub fn amortized_capacity(capacity: usize, additional: usize) -> Option<usize> {
    let required = capacity.checked_add(additional)?;
    let grown = required.checked_add(required >> 1)?;
    Some(grown.max(MIN_CAPACITY))
}

/// Whether a bulk replace of `len` elements should shrink a buffer of
/// `capacity` slots.
///
/// Only shrinks below half the capacity, so alternating writes around
/// the midpoint do not reallocate every time.
pub fn should_shrink(len: usize, capacity: usize) -> bool {
    len < (capacity >> 1)
}

/// Apply the [`MIN_CAPACITY`] floor to a requested capacity.
pub fn floored(capacity: usize) -> usize {
    capacity.max(MIN_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_growth_hits_floor() {
        assert_eq!(amortized_capacity(0, 5), Some(32));
        assert_eq!(amortized_capacity(0, 21), Some(32));
        assert_eq!(amortized_capacity(0, 22), Some(33));
    }

    #[test]
    fn growth_is_one_and_a_half_of_requirement() {
        // 32 + 40 = 72, 72 + 36 = 108.
        assert_eq!(amortized_capacity(32, 40), Some(108));
    }

    #[test]
    fn growth_overflow_is_reported() {
        assert_eq!(amortized_capacity(usize::MAX, 1), None);
        // The requirement fits, but adding half of it again does not.
        assert_eq!(amortized_capacity(usize::MAX / 3 * 2 + 2, 0), None);
        assert_eq!(amortized_capacity(usize::MAX - 1, 0), None);
        // Just below two thirds of the address space still grows.
        assert!(amortized_capacity(usize::MAX / 2 + 1, 0).is_some());
    }

    #[test]
    fn shrink_hysteresis_is_half_capacity() {
        assert!(should_shrink(3, 100));
        assert!(should_shrink(49, 100));
        assert!(!should_shrink(50, 100));
        assert!(!should_shrink(0, 1));
    }

    #[test]
    fn floor_only_raises() {
        assert_eq!(floored(0), 32);
        assert_eq!(floored(31), 32);
        assert_eq!(floored(100), 100);
    }
}
