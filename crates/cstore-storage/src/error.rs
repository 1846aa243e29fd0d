//! Storage-specific error types.

use std::error::Error;
use std::fmt;

use cstore_core::Epoch;

/// Why an element address or handle offset was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFault {
    /// The storage holds no buffer, so no address can be inside it.
    Unallocated,
    /// The address precedes the start of the buffer.
    BeforeBuffer,
    /// The address is at or past the end of the live elements.
    BeyondLive,
    /// The address points into the middle of an element.
    Misaligned,
}

impl fmt::Display for AddressFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unallocated => "storage holds no buffer",
            Self::BeforeBuffer => "address precedes the buffer",
            Self::BeyondLive => "address lies beyond the live elements",
            Self::Misaligned => "address is not on an element boundary",
        };
        f.write_str(text)
    }
}

/// Errors that can occur during storage operations.
///
/// Every fallible operation detects its error before mutating anything,
/// so a returned error always means the storage is exactly as it was
/// before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The underlying reallocation did not succeed.
    AllocationFailed {
        /// Size of the requested buffer in bytes.
        requested: usize,
    },
    /// The reallocation would exceed the configured byte budget.
    CapacityExceeded {
        /// Size of the requested buffer in bytes.
        requested: usize,
        /// Configured `max_bytes` budget.
        limit: usize,
    },
    /// The requested element count, or its size in bytes, does not fit in
    /// `usize`.
    CapacityOverflow {
        /// Number of element slots the storage held or needed to build on.
        current: usize,
        /// Number of element slots requested on top of `current`.
        additional: usize,
        /// Stride of the storage.
        element_size: usize,
    },
    /// An index/count pair falls outside the live elements.
    OutOfRange {
        /// First index of the requested range.
        index: usize,
        /// Number of elements in the requested range.
        count: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// An element address or handle offset failed validation.
    InvalidAddress {
        /// What was wrong with it.
        fault: AddressFault,
        /// Byte offset from the buffer start, when it could be computed.
        offset: Option<usize>,
    },
    /// A handle taken from a buffer that has since been reallocated or
    /// released.
    StaleHandle {
        /// The epoch recorded in the handle.
        handle_epoch: Epoch,
        /// The storage's current epoch.
        current_epoch: Epoch,
    },
    /// A source or destination slice whose length is not a whole number
    /// of elements.
    UnalignedLength {
        /// Length of the slice in bytes.
        len: usize,
        /// Stride of the storage.
        element_size: usize,
    },
    /// A transfer between two storages with different strides.
    StrideMismatch {
        /// Stride of the source storage.
        expected: usize,
        /// Stride of the destination storage.
        actual: usize,
    },
    /// A [`StorageConfig`](crate::StorageConfig) failed validation.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "allocation of {requested} bytes failed")
            }
            Self::CapacityExceeded { requested, limit } => {
                write!(
                    f,
                    "storage budget exceeded: requested {requested} bytes, limit {limit} bytes"
                )
            }
            Self::CapacityOverflow {
                current,
                additional,
                element_size,
            } => {
                write!(
                    f,
                    "capacity overflow: {current} + {additional} elements of {element_size} bytes"
                )
            }
            Self::OutOfRange { index, count, len } => {
                write!(
                    f,
                    "range {index}..{} out of bounds for length {len}",
                    index.saturating_add(*count)
                )
            }
            Self::InvalidAddress { fault, offset } => match offset {
                Some(offset) => write!(f, "invalid element address at offset {offset}: {fault}"),
                None => write!(f, "invalid element address: {fault}"),
            },
            Self::StaleHandle {
                handle_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale handle: epoch {handle_epoch}, current epoch {current_epoch}"
                )
            }
            Self::UnalignedLength { len, element_size } => {
                write!(
                    f,
                    "slice of {len} bytes is not a multiple of the {element_size}-byte stride"
                )
            }
            Self::StrideMismatch { expected, actual } => {
                write!(
                    f,
                    "stride mismatch: source stride {expected}, destination stride {actual}"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid storage config: {reason}")
            }
        }
    }
}

impl Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_overflow_names_both_operands() {
        let err = StorageError::CapacityOverflow {
            current: 10,
            additional: usize::MAX,
            element_size: 8,
        };
        assert_eq!(
            err.to_string(),
            format!("capacity overflow: 10 + {} elements of 8 bytes", usize::MAX)
        );
    }

    #[test]
    fn out_of_range_reports_half_open_range() {
        let err = StorageError::OutOfRange {
            index: 2,
            count: 3,
            len: 4,
        };
        assert_eq!(err.to_string(), "range 2..5 out of bounds for length 4");
    }

    #[test]
    fn invalid_address_without_offset() {
        let err = StorageError::InvalidAddress {
            fault: AddressFault::Unallocated,
            offset: None,
        };
        assert_eq!(
            err.to_string(),
            "invalid element address: storage holds no buffer"
        );
    }
}
