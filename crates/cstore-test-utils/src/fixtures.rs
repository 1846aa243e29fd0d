//! Tagged element patterns and a sample record type.
//!
//! - [`element`] builds one element of any stride carrying a tag.
//! - [`pattern`] builds `count` consecutive tagged elements.
//! - [`tags`] reads the tag sequence back out of a byte region.
//! - [`Record`] is a 16-byte [`Element`] for typed-view tests.

use cstore_core::Element;

/// Number of leading bytes that hold the tag (fewer for tiny strides).
fn tag_width(stride: usize) -> usize {
    stride.min(4)
}

/// One element of `stride` bytes carrying `tag`.
///
/// The tag is stored little-endian in the first `min(stride, 4)` bytes;
/// the remaining bytes are filled with a tag-dependent pattern so that
/// corruption anywhere in the element changes the bytes.
pub fn element(stride: usize, tag: u32) -> Vec<u8> {
    let mut out = vec![0u8; stride];
    let width = tag_width(stride);
    out[..width].copy_from_slice(&tag.to_le_bytes()[..width]);
    for (j, byte) in out.iter_mut().enumerate().skip(width) {
        *byte = (tag as u8).wrapping_mul(31).wrapping_add(j as u8);
    }
    out
}

/// `count` elements tagged `seed, seed + 1, ...`, back to back.
pub fn pattern(stride: usize, count: usize, seed: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(stride * count);
    for i in 0..count {
        out.extend_from_slice(&element(stride, seed.wrapping_add(i as u32)));
    }
    out
}

/// The tag of a single element.
///
/// # Panics
///
/// Panics if `bytes` is empty.
pub fn tag_of(bytes: &[u8]) -> u32 {
    assert!(!bytes.is_empty(), "element has no bytes");
    let width = tag_width(bytes.len());
    let mut raw = [0u8; 4];
    raw[..width].copy_from_slice(&bytes[..width]);
    u32::from_le_bytes(raw)
}

/// Tags of every `stride`-byte element in `bytes`.
pub fn tags(bytes: &[u8], stride: usize) -> Vec<u32> {
    bytes.chunks_exact(stride).map(tag_of).collect()
}

/// A small fixed-layout record: 4-byte id, 4-byte weight, 8-byte flags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    pub id: u32,
    pub weight: f32,
    pub flags: u64,
}

impl Record {
    /// Deterministic record derived from `id`.
    pub fn sample(id: u32) -> Self {
        Self {
            id,
            weight: id as f32 * 0.5,
            flags: u64::from(id).rotate_left(17) ^ 0xA5A5,
        }
    }
}

impl Element for Record {
    const SIZE: usize = 16;

    fn write_to(&self, out: &mut [u8]) {
        self.id.write_to(&mut out[0..4]);
        self.weight.write_to(&mut out[4..8]);
        self.flags.write_to(&mut out[8..16]);
    }

    fn read_from(bytes: &[u8]) -> Self {
        Self {
            id: u32::read_from(&bytes[0..4]),
            weight: f32::read_from(&bytes[4..8]),
            flags: u64::read_from(&bytes[8..16]),
        }
    }
}
