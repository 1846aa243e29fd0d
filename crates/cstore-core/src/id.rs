//! Buffer epoch identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`Epoch`] allocation.
///
/// Starts at 1 so that [`Epoch::UNALLOCATED`] never collides with a
/// real allocation.
static EPOCH_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one physical allocation of a storage buffer.
///
/// A fresh epoch is drawn every time a storage allocates a buffer, and a
/// released storage goes back to [`Epoch::UNALLOCATED`]. Element handles
/// are only issued for live elements and record the epoch they were taken
/// in, so a handle into a buffer that has since moved is detected in O(1)
/// instead of silently addressing reallocated memory.
///
/// Epochs are process-unique: two different buffers never share one,
/// even across storage instances. This is what lets an epoch travel with
/// its buffer when two storages exchange ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(u64);

impl Epoch {
    /// Epoch of a storage that holds no buffer.
    pub const UNALLOCATED: Epoch = Epoch(0);

    /// Allocate a fresh, unique epoch.
    ///
    /// Each call returns a value that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(EPOCH_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the [`Epoch::UNALLOCATED`] sentinel.
    pub fn is_unallocated(self) -> bool {
        self.0 == 0
    }
}

impl Default for Epoch {
    fn default() -> Self {
        Self::UNALLOCATED
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
