//! Typed view over [`RawStorage`].
//!
//! [`TypedStorage`] maps element-typed calls 1:1 onto the byte-stride
//! primitives, encoding and decoding values through [`Element`]. It adds
//! no algorithmic behaviour of its own.

use std::fmt;
use std::marker::PhantomData;

use cstore_core::Element;
use smallvec::SmallVec;

use crate::error::StorageError;
use crate::handle::ElementHandle;
use crate::storage::RawStorage;

/// Inline byte budget for encoding small batches without a heap allocation.
type EncodeBuf = SmallVec<[u8; 256]>;

/// A growable array of `T`, stored as `T::SIZE`-byte elements.
pub struct TypedStorage<T: Element> {
    raw: RawStorage,
    _marker: PhantomData<T>,
}

impl<T: Element> TypedStorage<T> {
    /// Stride of the underlying storage. Zero-sized elements fail to compile.
    const STRIDE: usize = {
        assert!(T::SIZE > 0, "zero-sized elements are not supported");
        T::SIZE
    };

    /// Create an empty typed storage.
    pub fn new() -> Self {
        Self {
            raw: RawStorage::new(Self::STRIDE),
            _marker: PhantomData,
        }
    }

    /// Wrap an existing raw storage whose stride is `T::SIZE`.
    pub fn from_raw(raw: RawStorage) -> Result<Self, StorageError> {
        if raw.element_size() != T::SIZE {
            return Err(StorageError::StrideMismatch {
                expected: T::SIZE,
                actual: raw.element_size(),
            });
        }
        Ok(Self {
            raw,
            _marker: PhantomData,
        })
    }

    /// The underlying raw storage.
    pub fn as_raw(&self) -> &RawStorage {
        &self.raw
    }

    /// Unwrap into the underlying raw storage.
    pub fn into_raw(self) -> RawStorage {
        self.raw
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of element slots allocated.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.raw.get(index).map(T::read_from)
    }

    /// The first element.
    pub fn first(&self) -> Option<T> {
        self.raw.first().map(T::read_from)
    }

    /// The last element.
    pub fn last(&self) -> Option<T> {
        self.raw.last().map(T::read_from)
    }

    /// Overwrite the element at `index`, returning the previous value.
    pub fn replace(&mut self, index: usize, value: T) -> Result<T, StorageError> {
        let len = self.raw.len();
        let slot = self.raw.get_mut(index).ok_or(StorageError::OutOfRange {
            index,
            count: 1,
            len,
        })?;
        let old = T::read_from(slot);
        value.write_to(slot);
        Ok(old)
    }

    /// Iterate over the elements by value.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.raw.iter().map(T::read_from)
    }

    /// Append one element.
    pub fn push(&mut self, value: T) -> Result<(), StorageError> {
        let slot = self.raw.append(1)?;
        value.write_to(slot);
        Ok(())
    }

    /// Append all of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), StorageError> {
        self.raw.append_from(&encode(values))?;
        Ok(())
    }

    /// Insert one element at `index`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), StorageError> {
        let slot = self.raw.insert(index, 1)?;
        value.write_to(slot);
        Ok(())
    }

    /// Insert all of `values` at `index`.
    pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<(), StorageError> {
        self.raw.insert_from(index, &encode(values))?;
        Ok(())
    }

    /// Insert one element at the front.
    pub fn prepend(&mut self, value: T) -> Result<(), StorageError> {
        self.insert(0, value)
    }

    /// Replace the whole contents with `values`.
    pub fn set_all(&mut self, values: &[T]) -> Result<(), StorageError> {
        self.raw.set(&encode(values))?;
        Ok(())
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, StorageError> {
        let mut buf: EncodeBuf = SmallVec::from_elem(0, T::SIZE);
        self.raw.iremove_into(index, &mut buf)?;
        Ok(T::read_from(&buf))
    }

    /// Remove `n` elements starting at `index` without reading them.
    pub fn remove_n(&mut self, index: usize, n: usize) -> Result<(), StorageError> {
        self.raw.iremove(index, n)
    }

    /// Move `n` elements starting at `index` onto the end of `target`.
    pub fn remove_to(
        &mut self,
        index: usize,
        n: usize,
        target: &mut TypedStorage<T>,
    ) -> Result<(), StorageError> {
        self.raw.iremove_to(index, n, &mut target.raw)?;
        Ok(())
    }

    /// Handle naming the element at `index`.
    pub fn handle(&self, index: usize) -> Option<ElementHandle> {
        self.raw.handle(index)
    }

    /// Remove and return the element `handle` names.
    pub fn remove_handle(&mut self, handle: ElementHandle) -> Result<T, StorageError> {
        let mut buf: EncodeBuf = SmallVec::from_elem(0, T::SIZE);
        self.raw.premove_into(handle, &mut buf)?;
        Ok(T::read_from(&buf))
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.raw.pop(1).ok().map(T::read_from)
    }

    /// Remove the last `n` elements, returned in storage order.
    pub fn pop_n(&mut self, n: usize) -> Result<SmallVec<[T; 8]>, StorageError> {
        let bytes = self.raw.pop(n)?;
        Ok(bytes.chunks_exact(T::SIZE).map(T::read_from).collect())
    }

    /// Move the last `n` elements onto the end of `target`.
    pub fn pop_to(&mut self, n: usize, target: &mut TypedStorage<T>) -> Result<(), StorageError> {
        self.raw.pop_to(n, &mut target.raw)?;
        Ok(())
    }

    /// Exchange the elements at `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), StorageError> {
        self.raw.xswap(i, j)
    }

    /// Exchange the whole contents with `other` without copying.
    pub fn swap_storage(&mut self, other: &mut TypedStorage<T>) {
        self.raw.swap(&mut other.raw);
    }

    /// Duplicate into a freshly allocated storage.
    pub fn try_clone(&self) -> Result<Self, StorageError> {
        Ok(Self {
            raw: self.raw.try_clone()?,
            _marker: PhantomData,
        })
    }

    /// Make room for `additional` more elements.
    pub fn reserve(&mut self, additional: usize) -> Result<(), StorageError> {
        self.raw.reserve(additional)
    }

    /// Shrink to `capacity` slots. See [`RawStorage::truncate`].
    pub fn truncate(&mut self, capacity: usize) -> Result<(), StorageError> {
        self.raw.truncate(capacity)
    }

    /// Forget all elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Release the buffer.
    pub fn flush(&mut self) {
        self.raw.flush();
    }
}

impl<T: Element> Default for TypedStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for TypedStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

fn encode<T: Element>(values: &[T]) -> EncodeBuf {
    let mut bytes: EncodeBuf = SmallVec::from_elem(0, values.len() * T::SIZE);
    for (chunk, value) in bytes.chunks_exact_mut(T::SIZE).zip(values) {
        value.write_to(chunk);
    }
    bytes
}
