//! The type-erased growable element buffer.
//!
//! A [`RawStorage`] owns one contiguous byte buffer holding a variable
//! number of fixed-size elements. Every operation is offset arithmetic
//! over that buffer (`offset = index * element_size`); typed containers
//! compose these primitives instead of re-implementing them per type.
//!
//! # Buffer layout
//!
//! ```text
//! data: [ live elements ........ | spare slots ........ ]
//!        0                  len * stride         capacity * stride
//! ```
//!
//! Bytes in the spare region are allocated but carry no meaning. Regions
//! handed out by `append`/`insert` are zeroed before they are returned.
//!
//! # Failure
//!
//! Every fallible operation validates its arguments and secures any
//! memory it needs before touching the buffer. An `Err` therefore always
//! leaves the storage exactly as it was. The one deliberate side effect
//! is [`RawStorage::truncate`] clamping `len` when the capacity drops
//! below it.
//!
//! # Borrowed regions
//!
//! Slices returned by mutating calls borrow the storage, so they cannot
//! outlive the next call that might reallocate. Use [`ElementHandle`] to
//! remember a position across calls.

use std::fmt;
use std::slice::ChunksExact;

use cstore_core::Epoch;

use crate::config::StorageConfig;
use crate::error::{AddressFault, StorageError};
use crate::handle::ElementHandle;
use crate::policy;
use crate::scratch;

/// A growable buffer of fixed-size, type-erased elements.
///
/// `RawStorage` is move-only: it has no `Clone` impl, so its buffer is
/// never aliased. Duplicate it explicitly with [`RawStorage::try_clone`],
/// or hand its buffer to another instance with [`RawStorage::swap`].
///
/// Not thread-safe by itself. `&mut self` on every mutator is what
/// serialises access.
pub struct RawStorage {
    /// Backing buffer; always exactly `capacity * element_size` bytes.
    data: Vec<u8>,
    /// Number of live elements.
    len: usize,
    /// Stride and allocation budget, fixed at construction.
    config: StorageConfig,
    /// Identity of the current allocation, `UNALLOCATED` when `data` is empty.
    epoch: Epoch,
}

impl RawStorage {
    /// Create an empty storage for elements of `element_size` bytes.
    ///
    /// No memory is allocated until the first growing call.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is zero. Use [`RawStorage::with_config`]
    /// for a non-panicking constructor.
    pub fn new(element_size: usize) -> Self {
        assert!(element_size > 0, "element_size must be non-zero");
        Self::from_config(StorageConfig::new(element_size))
    }

    /// Create an empty storage from a validated config.
    pub fn with_config(config: StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: StorageConfig) -> Self {
        Self {
            data: Vec::new(),
            len: 0,
            config,
            epoch: Epoch::UNALLOCATED,
        }
    }

    // ── Size and capacity ───────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.data.len() / self.config.element_size
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.config.element_size
    }

    /// The config this storage was built from.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Epoch of the current allocation.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Memory held by the buffer in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len()
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Make room for at least `capacity` elements.
    ///
    /// The request is floored at [`MIN_CAPACITY`](policy::MIN_CAPACITY).
    /// Never shrinks: if the storage already holds that many slots this
    /// is a no-op.
    pub fn grow(&mut self, capacity: usize) -> Result<(), StorageError> {
        let target = policy::floored(capacity);
        if target <= self.capacity() {
            return Ok(());
        }
        self.reallocate(target)
    }

    /// Make room for `additional` more elements beyond the live ones.
    pub fn reserve(&mut self, additional: usize) -> Result<(), StorageError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| self.overflow(self.len, additional))?;
        self.grow(required)
    }

    /// Shrink the buffer to `capacity` slots.
    ///
    /// `truncate(0)` releases the buffer entirely, like [`flush`](Self::flush).
    /// Otherwise the request is floored at
    /// [`MIN_CAPACITY`](policy::MIN_CAPACITY) and the buffer is only
    /// reallocated if that is strictly smaller than the current capacity.
    /// Elements beyond the new capacity are dropped and `len` is clamped.
    pub fn truncate(&mut self, capacity: usize) -> Result<(), StorageError> {
        if capacity == 0 {
            self.flush();
            return Ok(());
        }
        let target = policy::floored(capacity);
        if self.capacity() <= target {
            return Ok(());
        }
        self.reallocate(target)
    }

    /// Release the buffer and return to the empty state. Idempotent.
    pub fn flush(&mut self) {
        self.data = Vec::new();
        self.len = 0;
        self.epoch = Epoch::UNALLOCATED;
    }

    /// Forget all live elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replace the whole contents with the elements in `src`.
    ///
    /// Grows if `src` holds more elements than the capacity, and shrinks
    /// when it holds fewer than half of it. Returns the live region.
    pub fn set(&mut self, src: &[u8]) -> Result<&mut [u8], StorageError> {
        let n = self.count_of(src.len())?;
        let capacity = self.capacity();
        if n > capacity {
            self.grow(n)?;
        } else if policy::should_shrink(n, capacity) {
            self.truncate(n)?;
        }

        let bytes = src.len();
        self.data[..bytes].copy_from_slice(src);
        self.len = n;
        Ok(&mut self.data[..bytes])
    }

    /// Duplicate this storage into a freshly allocated buffer.
    ///
    /// The copy has the same config, capacity and live elements, and a
    /// new epoch.
    pub fn try_clone(&self) -> Result<Self, StorageError> {
        let mut copy = Self::from_config(self.config.clone());
        if self.data.is_empty() {
            return Ok(copy);
        }
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| StorageError::AllocationFailed {
                requested: self.data.len(),
            })?;
        data.extend_from_slice(self.as_bytes());
        data.resize(self.data.len(), 0);
        copy.data = data;
        copy.len = self.len;
        copy.epoch = Epoch::next();
        Ok(copy)
    }

    /// Exchange buffers, lengths and configs with `other`.
    ///
    /// No element is copied. Epochs travel with their buffers, so handles
    /// taken from `other` are now valid against `self` and vice versa.
    pub fn swap(&mut self, other: &mut RawStorage) {
        std::mem::swap(self, other);
    }

    // ── Access ──────────────────────────────────────────────────

    /// The live elements as one byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len * self.config.element_size]
    }

    /// The live elements as one mutable byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len * self.config.element_size;
        &mut self.data[..end]
    }

    /// `count` contiguous elements starting at `index`.
    ///
    /// Returns `None` if `count` is zero or the range reaches past the
    /// live elements.
    pub fn slice(&self, index: usize, count: usize) -> Option<&[u8]> {
        let (start, end) = self.live_span(index, count)?;
        Some(&self.data[start..end])
    }

    /// Mutable variant of [`slice`](Self::slice).
    pub fn slice_mut(&mut self, index: usize, count: usize) -> Option<&mut [u8]> {
        let (start, end) = self.live_span(index, count)?;
        Some(&mut self.data[start..end])
    }

    /// The element at `index`, if live.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.slice(index, 1)
    }

    /// The element at `index`, if live.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.slice_mut(index, 1)
    }

    /// The first live element.
    pub fn first(&self) -> Option<&[u8]> {
        self.get(0)
    }

    /// The last live element.
    pub fn last(&self) -> Option<&[u8]> {
        self.get(self.len.checked_sub(1)?)
    }

    /// Iterate over the live elements, one stride-sized slice each.
    pub fn iter(&self) -> ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.config.element_size)
    }

    /// Handle naming the live element at `index`.
    pub fn handle(&self, index: usize) -> Option<ElementHandle> {
        if index >= self.len {
            return None;
        }
        Some(ElementHandle::new(
            self.epoch,
            index * self.config.element_size,
        ))
    }

    /// Resolve a raw element address into a handle.
    ///
    /// The address must point at the first byte of a live element of the
    /// current buffer. Only address arithmetic is performed; `ptr` is
    /// never dereferenced.
    pub fn locate(&self, ptr: *const u8) -> Result<ElementHandle, StorageError> {
        if self.data.is_empty() {
            return Err(StorageError::InvalidAddress {
                fault: AddressFault::Unallocated,
                offset: None,
            });
        }
        let base = self.data.as_ptr() as usize;
        let addr = ptr as usize;
        if addr < base {
            return Err(StorageError::InvalidAddress {
                fault: AddressFault::BeforeBuffer,
                offset: None,
            });
        }
        let offset = addr - base;
        self.check_offset(offset)?;
        Ok(ElementHandle::new(self.epoch, offset))
    }

    // ── Append and insert ───────────────────────────────────────

    /// Reserve `n` new trailing elements and return them, zeroed.
    pub fn append(&mut self, n: usize) -> Result<&mut [u8], StorageError> {
        self.reserve_additional(n)?;
        self.len += n;
        let region = self.tail_mut(n);
        region.fill(0);
        Ok(region)
    }

    /// Append copies of the elements in `src` and return the new region.
    pub fn append_from(&mut self, src: &[u8]) -> Result<&mut [u8], StorageError> {
        let n = self.count_of(src.len())?;
        self.reserve_additional(n)?;
        self.len += n;
        let region = self.tail_mut(n);
        region.copy_from_slice(src);
        Ok(region)
    }

    /// Open a gap of `n` zeroed elements at `index` and return it.
    ///
    /// `index` may equal `len`, which appends.
    pub fn insert(&mut self, index: usize, n: usize) -> Result<&mut [u8], StorageError> {
        let (start, end) = self.open_gap(index, n)?;
        let region = &mut self.data[start..end];
        region.fill(0);
        Ok(region)
    }

    /// Insert copies of the elements in `src` at `index` and return them.
    pub fn insert_from(&mut self, index: usize, src: &[u8]) -> Result<&mut [u8], StorageError> {
        let n = self.count_of(src.len())?;
        let (start, end) = self.open_gap(index, n)?;
        let region = &mut self.data[start..end];
        region.copy_from_slice(src);
        Ok(region)
    }

    // ── Removal by index ────────────────────────────────────────

    /// Remove `n` elements starting at `index`, shifting the tail down.
    pub fn iremove(&mut self, index: usize, n: usize) -> Result<(), StorageError> {
        self.check_range(index, n)?;
        self.close_gap(index, n);
        Ok(())
    }

    /// Remove elements starting at `index`, copying them into `dst`.
    ///
    /// The number of elements removed is `dst.len() / element_size`.
    pub fn iremove_into(&mut self, index: usize, dst: &mut [u8]) -> Result<(), StorageError> {
        let n = self.count_of(dst.len())?;
        let (start, end) = self.checked_span(index, n)?;
        dst.copy_from_slice(&self.data[start..end]);
        self.close_gap(index, n);
        Ok(())
    }

    /// Remove `n` elements starting at `index` and append them to `target`.
    ///
    /// Returns the region they now occupy in `target`. If `target` cannot
    /// grow, neither storage changes.
    pub fn iremove_to<'t>(
        &mut self,
        index: usize,
        n: usize,
        target: &'t mut RawStorage,
    ) -> Result<&'t mut [u8], StorageError> {
        self.check_stride(target)?;
        let (start, end) = self.checked_span(index, n)?;
        target.append_from(&self.data[start..end])?;
        self.close_gap(index, n);
        Ok(target.tail_mut(n))
    }

    // ── Removal by handle ───────────────────────────────────────

    /// Remove `n` elements starting at the one `handle` names.
    pub fn premove(&mut self, handle: ElementHandle, n: usize) -> Result<(), StorageError> {
        let index = self.resolve(handle)?;
        self.iremove(index, n)
    }

    /// Remove elements starting at `handle`, copying them into `dst`.
    pub fn premove_into(
        &mut self,
        handle: ElementHandle,
        dst: &mut [u8],
    ) -> Result<(), StorageError> {
        let index = self.resolve(handle)?;
        self.iremove_into(index, dst)
    }

    /// Remove `n` elements starting at `handle` and append them to `target`.
    pub fn premove_to<'t>(
        &mut self,
        handle: ElementHandle,
        n: usize,
        target: &'t mut RawStorage,
    ) -> Result<&'t mut [u8], StorageError> {
        let index = self.resolve(handle)?;
        self.iremove_to(index, n, target)
    }

    // ── Pop ─────────────────────────────────────────────────────

    /// Pop the trailing `n` elements and return the freed region.
    ///
    /// The bytes stay readable through the returned slice until the next
    /// mutating call.
    pub fn pop(&mut self, n: usize) -> Result<&[u8], StorageError> {
        self.check_pop(n)?;
        self.len -= n;
        let start = self.len * self.config.element_size;
        let end = start + n * self.config.element_size;
        Ok(&self.data[start..end])
    }

    /// Pop trailing elements into `dst`, preserving their order.
    ///
    /// The number of elements popped is `dst.len() / element_size`.
    pub fn pop_into(&mut self, dst: &mut [u8]) -> Result<(), StorageError> {
        let n = self.count_of(dst.len())?;
        self.check_pop(n)?;
        dst.copy_from_slice(self.tail(n));
        self.len -= n;
        Ok(())
    }

    /// Pop the trailing `n` elements and append them to `target`.
    pub fn pop_to<'t>(
        &mut self,
        n: usize,
        target: &'t mut RawStorage,
    ) -> Result<&'t mut [u8], StorageError> {
        self.check_stride(target)?;
        self.check_pop(n)?;
        target.append_from(self.tail(n))?;
        self.len -= n;
        Ok(target.tail_mut(n))
    }

    // ── Element swap ────────────────────────────────────────────

    /// Exchange the contents of elements `i1` and `i2` without checking
    /// them against `len`.
    ///
    /// Any slot within the capacity may be named.
    ///
    /// # Panics
    ///
    /// Panics if either index is at or beyond the capacity.
    pub fn uswap(&mut self, i1: usize, i2: usize) {
        let size = self.config.element_size;
        let capacity = self.capacity();
        assert!(
            i1 < capacity && i2 < capacity,
            "swap indices {i1} and {i2} out of bounds for capacity {capacity}"
        );
        scratch::swap_ranges(&mut self.data, i1 * size, i2 * size, size);
    }

    /// Exchange the contents of live elements `i1` and `i2`.
    ///
    /// `xswap(i, i)` succeeds without touching any bytes.
    pub fn xswap(&mut self, i1: usize, i2: usize) -> Result<(), StorageError> {
        for index in [i1, i2] {
            if index >= self.len {
                return Err(StorageError::OutOfRange {
                    index,
                    count: 1,
                    len: self.len,
                });
            }
        }
        if i1 != i2 {
            self.uswap(i1, i2);
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    /// Move the live elements into a new buffer of exactly `capacity`
    /// slots, clamping `len` if it no longer fits.
    fn reallocate(&mut self, capacity: usize) -> Result<(), StorageError> {
        let bytes = capacity
            .checked_mul(self.config.element_size)
            .ok_or_else(|| self.overflow(0, capacity))?;
        if let Some(limit) = self.config.max_bytes {
            if bytes > limit {
                return Err(StorageError::CapacityExceeded {
                    requested: bytes,
                    limit,
                });
            }
        }

        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| StorageError::AllocationFailed { requested: bytes })?;
        let len = self.len.min(capacity);
        data.extend_from_slice(&self.data[..len * self.config.element_size]);
        data.resize(bytes, 0);

        self.data = data;
        self.len = len;
        self.epoch = Epoch::next();
        Ok(())
    }

    /// Ensure room for `n` more elements using the amortised policy.
    fn reserve_additional(&mut self, n: usize) -> Result<(), StorageError> {
        let capacity = self.capacity();
        let required = self
            .len
            .checked_add(n)
            .ok_or_else(|| self.overflow(self.len, n))?;
        if required <= capacity {
            return Ok(());
        }

        let mut target = policy::amortized_capacity(capacity, n)
            .ok_or_else(|| self.overflow(capacity, n))?;
        // Fall back to whatever the budget allows when the full 1.5x step
        // would not fit but the requirement itself does.
        if let Some(max) = self.config.max_capacity() {
            if target > max && required <= max {
                target = max;
            }
        }
        self.reallocate(target)
    }

    /// Shift the tail up by `n` slots and return the byte span of the gap.
    fn open_gap(&mut self, index: usize, n: usize) -> Result<(usize, usize), StorageError> {
        if index > self.len {
            return Err(StorageError::OutOfRange {
                index,
                count: n,
                len: self.len,
            });
        }
        self.reserve_additional(n)?;

        let size = self.config.element_size;
        let start = index * size;
        let gap = n * size;
        self.data.copy_within(start..self.len * size, start + gap);
        self.len += n;
        Ok((start, start + gap))
    }

    /// Shift the tail after `index + n` down over the removed elements.
    fn close_gap(&mut self, index: usize, n: usize) {
        let size = self.config.element_size;
        let tail = (index + n) * size;
        self.data.copy_within(tail..self.len * size, index * size);
        self.len -= n;
    }

    fn tail(&self, n: usize) -> &[u8] {
        let size = self.config.element_size;
        &self.data[(self.len - n) * size..self.len * size]
    }

    fn tail_mut(&mut self, n: usize) -> &mut [u8] {
        let size = self.config.element_size;
        &mut self.data[(self.len - n) * size..self.len * size]
    }

    fn resolve(&self, handle: ElementHandle) -> Result<usize, StorageError> {
        if handle.epoch != self.epoch {
            return Err(StorageError::StaleHandle {
                handle_epoch: handle.epoch,
                current_epoch: self.epoch,
            });
        }
        self.check_offset(handle.offset)?;
        Ok(handle.offset / self.config.element_size)
    }

    fn check_offset(&self, offset: usize) -> Result<(), StorageError> {
        let size = self.config.element_size;
        let fault = if offset >= self.len * size {
            AddressFault::BeyondLive
        } else if offset % size != 0 {
            AddressFault::Misaligned
        } else {
            return Ok(());
        };
        Err(StorageError::InvalidAddress {
            fault,
            offset: Some(offset),
        })
    }

    fn check_range(&self, index: usize, n: usize) -> Result<(), StorageError> {
        match index.checked_add(n) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(StorageError::OutOfRange {
                index,
                count: n,
                len: self.len,
            }),
        }
    }

    /// Byte span of `n` live elements from `index`, validated.
    fn checked_span(&self, index: usize, n: usize) -> Result<(usize, usize), StorageError> {
        self.check_range(index, n)?;
        let size = self.config.element_size;
        Ok((index * size, (index + n) * size))
    }

    fn check_pop(&self, n: usize) -> Result<(), StorageError> {
        if n > self.len {
            return Err(StorageError::OutOfRange {
                index: 0,
                count: n,
                len: self.len,
            });
        }
        Ok(())
    }

    fn check_stride(&self, target: &RawStorage) -> Result<(), StorageError> {
        if self.config.element_size != target.config.element_size {
            return Err(StorageError::StrideMismatch {
                expected: self.config.element_size,
                actual: target.config.element_size,
            });
        }
        Ok(())
    }

    fn live_span(&self, index: usize, count: usize) -> Option<(usize, usize)> {
        if count == 0 {
            return None;
        }
        let end = index.checked_add(count)?;
        if end > self.len {
            return None;
        }
        let size = self.config.element_size;
        Some((index * size, end * size))
    }

    /// Number of whole elements in a slice of `bytes` bytes.
    fn count_of(&self, bytes: usize) -> Result<usize, StorageError> {
        let size = self.config.element_size;
        if bytes % size != 0 {
            return Err(StorageError::UnalignedLength {
                len: bytes,
                element_size: size,
            });
        }
        Ok(bytes / size)
    }

    fn overflow(&self, current: usize, additional: usize) -> StorageError {
        StorageError::CapacityOverflow {
            current,
            additional,
            element_size: self.config.element_size,
        }
    }
}

impl fmt::Debug for RawStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("element_size", &self.config.element_size)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("epoch", &self.epoch)
            .finish()
    }
}
