//! Element handles.
//!
//! An [`ElementHandle`] names one element slot of a specific buffer
//! allocation. It is epoch-scoped: the `epoch` field allows O(1)
//! staleness checks after the buffer has been reallocated or released.

use std::fmt;

use cstore_core::Epoch;

/// Location of an element within a storage buffer.
///
/// Handles are obtained from [`RawStorage::handle`](crate::RawStorage::handle)
/// or [`RawStorage::locate`](crate::RawStorage::locate) and consumed by the
/// `premove` family. They stay valid until the storage reallocates or
/// releases its buffer; removals that shift elements without reallocating
/// keep the handle valid but it then names whatever element moved into the
/// slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ElementHandle {
    /// Buffer epoch when this handle was taken.
    pub(crate) epoch: Epoch,
    /// Byte offset of the element from the buffer start.
    pub(crate) offset: usize,
}

impl ElementHandle {
    /// Create a new handle.
    pub(crate) fn new(epoch: Epoch, offset: usize) -> Self {
        Self { epoch, offset }
    }

    /// The buffer epoch this handle belongs to.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Byte offset of the element from the buffer start.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementHandle(epoch={}, off={})", self.epoch, self.offset)
    }
}
