//! Storage configuration parameters.

use crate::error::StorageError;

/// Configuration for a [`RawStorage`](crate::RawStorage).
///
/// Fixes the element stride and an optional allocation budget.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Size of one element in bytes.
    ///
    /// Must be non-zero. All offset arithmetic is `index * element_size`.
    pub element_size: usize,

    /// Upper bound on the buffer size in bytes, or `None` for no bound.
    ///
    /// Any reallocation above this budget fails with
    /// [`StorageError::CapacityExceeded`] and leaves the storage untouched.
    /// Must be able to hold at least [`MIN_CAPACITY`](crate::policy::MIN_CAPACITY)
    /// elements, since that is the smallest buffer ever allocated.
    pub max_bytes: Option<usize>,
}

impl StorageConfig {
    /// Create a config for the given stride with no allocation budget.
    pub fn new(element_size: usize) -> Self {
        Self {
            element_size,
            max_bytes: None,
        }
    }

    /// Set the allocation budget in bytes.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Maximum number of element slots the budget allows, if bounded.
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_bytes
            .map(|bytes| bytes / self.element_size.max(1))
    }

    /// Check that the config describes a usable storage.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.element_size == 0 {
            return Err(StorageError::InvalidConfig {
                reason: "element_size must be non-zero".into(),
            });
        }
        if let Some(max) = self.max_capacity() {
            if max < crate::policy::MIN_CAPACITY {
                return Err(StorageError::InvalidConfig {
                    reason: format!(
                        "max_bytes allows {max} elements, fewer than the minimum capacity {}",
                        crate::policy::MIN_CAPACITY
                    ),
                });
            }
        }
        Ok(())
    }
}
