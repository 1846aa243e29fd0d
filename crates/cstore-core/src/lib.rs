//! Core types and traits for the cstore storage engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the storage crates: buffer epochs and the
//! [`Element`] codec used by typed views.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod id;

pub use element::Element;
pub use id::Epoch;
