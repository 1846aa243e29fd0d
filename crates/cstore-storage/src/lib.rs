//! Type-erased growable element storage for cstore containers.
//!
//! A [`RawStorage`] is the single storage engine beneath the typed
//! arrays, sets and maps of the cstore family. It manages one contiguous
//! buffer of fixed-size elements and exposes the primitives every typed
//! container composes: growth, shrinking, insertion, removal, transfer
//! between storages and in-place element swaps.
//!
//! # Architecture
//!
//! ```text
//! TypedStorage<T: Element>   (typed facade, 1:1 forwarding)
//! └── RawStorage             (byte-stride engine)
//!     ├── StorageConfig      (stride + allocation budget)
//!     ├── policy             (1.5x growth, 32-slot floor, shrink hysteresis)
//!     ├── scratch            (bounded-scratch element swap)
//!     └── ElementHandle      (epoch-tagged element position)
//! ```
//!
//! # Failure model
//!
//! Fallible calls return [`StorageError`] and leave the storage exactly
//! as it was. Nothing in this crate logs; errors carry all diagnostics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod policy;
mod scratch;
pub mod storage;
pub mod typed;

// Public re-exports for the primary API surface.
pub use config::StorageConfig;
pub use error::{AddressFault, StorageError};
pub use handle::ElementHandle;
pub use storage::RawStorage;
pub use typed::TypedStorage;
