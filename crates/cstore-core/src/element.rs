//! Fixed-size byte codec for values stored in type-erased buffers.

/// A value with a fixed byte encoding of [`Element::SIZE`] bytes.
///
/// Typed views over a byte-stride storage use this trait to move values
/// in and out of element slots without reinterpreting memory. Every
/// implementation must write and read exactly `SIZE` bytes, and
/// `read_from` of bytes produced by `write_to` must return an equal value.
///
/// Zero-sized encodings are rejected when the constant is evaluated:
///
/// ```compile_fail
/// use cstore_core::Element;
///
/// let _ = <[u8; 0] as Element>::SIZE;
/// ```
pub trait Element: Copy {
    /// Encoded size in bytes. Must be non-zero.
    const SIZE: usize;

    /// Encode `self` into `out[..Self::SIZE]`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `Self::SIZE`.
    fn write_to(&self, out: &mut [u8]);

    /// Decode a value from `bytes[..Self::SIZE]`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `Self::SIZE`.
    fn read_from(bytes: &[u8]) -> Self;
}

macro_rules! impl_element_for_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn write_to(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                fn read_from(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_element_for_primitive!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl<const N: usize> Element for [u8; N] {
    const SIZE: usize = {
        assert!(N > 0, "zero-sized elements are not supported");
        N
    };

    fn write_to(&self, out: &mut [u8]) {
        out[..N].copy_from_slice(self);
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut raw = [0u8; N];
        raw.copy_from_slice(&bytes[..N]);
        raw
    }
}
