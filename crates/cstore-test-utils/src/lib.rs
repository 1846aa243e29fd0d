//! Test fixtures for cstore development.
//!
//! Storage tests need element bytes that are distinguishable after being
//! shifted, swapped and transferred. The helpers here give every element
//! a numeric tag so assertions can compare tag sequences instead of raw
//! byte blobs.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{element, pattern, tag_of, tags, Record};
