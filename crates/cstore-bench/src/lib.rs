//! Benchmark profiles for the cstore storage engine.
//!
//! - [`SMALL_STRIDE`] / [`LARGE_STRIDE`]: element sizes below and above
//!   the swap scratch size.
//! - [`filled_storage`]: a storage pre-populated with tagged elements.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cstore_storage::RawStorage;
use cstore_test_utils::pattern;

/// Stride of a pointer-sized element.
pub const SMALL_STRIDE: usize = 8;

/// Stride large enough that swaps go through several scratch chunks.
pub const LARGE_STRIDE: usize = 1536;

/// Build a storage of `count` tagged elements of `stride` bytes.
pub fn filled_storage(stride: usize, count: usize) -> RawStorage {
    let mut storage = RawStorage::new(stride);
    storage
        .append_from(&pattern(stride, count, 0))
        .expect("benchmark storage fits in memory");
    storage
}
