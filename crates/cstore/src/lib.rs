//! cstore: a type-erased growable storage engine for container libraries.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the cstore sub-crates. For most users, adding `cstore` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cstore::prelude::*;
//!
//! // Raw byte-stride storage of 8-byte elements.
//! let mut raw = RawStorage::new(8);
//! raw.append_from(&[1u8; 16]).unwrap();
//! assert_eq!((raw.len(), raw.capacity()), (2, 32));
//!
//! // Typed view with handle-based removal.
//! let mut values = TypedStorage::<u32>::new();
//! values.extend_from_slice(&[10, 20, 30]).unwrap();
//! let h = values.handle(1).unwrap();
//! assert_eq!(values.remove_handle(h).unwrap(), 20);
//! assert_eq!(values.iter().collect::<Vec<_>>(), vec![10, 30]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`storage`] | `cstore-storage` | `RawStorage`, `TypedStorage`, config, errors, handles |
//! | [`types`] | `cstore-core` | `Element` codec and buffer `Epoch` ids |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Storage engine and typed view (`cstore-storage`).
///
/// Most users only need [`storage::RawStorage`] or
/// [`storage::TypedStorage`], both also in the [`prelude`].
pub use cstore_storage as storage;

/// Core types and traits (`cstore-core`).
pub use cstore_core as types;

/// Common imports for typical cstore usage.
///
/// ```rust
/// use cstore::prelude::*;
/// ```
pub mod prelude {
    pub use cstore_core::{Element, Epoch};
    pub use cstore_storage::{
        AddressFault, ElementHandle, RawStorage, StorageConfig, StorageError, TypedStorage,
    };
}
