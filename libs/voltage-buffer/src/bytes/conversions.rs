//! Numeric type conversions with byte order support
//!
//! Provides functions for converting between byte slices and:
//! - fixed-width primitives (u8 ... u64, i8 ... i64, f32, f64) through [`Scalar`]
//! - arbitrary-width (1..=8 bytes) unsigned/signed integers
//!
//! All conversions take an explicit `ByteOrder`. Callers validate ranges
//! before converting, so these functions only index within `bytes`.

use super::ByteOrder;

// ============================================================================
// Fixed-width primitives
// ============================================================================

/// Primitive numeric type with a fixed byte width
///
/// Implemented for every integer and float type an element or accessor can
/// produce. `from_bytes` and `to_bytes` expect a slice of at least `WIDTH`
/// bytes and panic otherwise.
pub trait Scalar: Copy + Sized + std::fmt::Debug {
    const WIDTH: usize;

    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self;

    fn to_bytes(self, order: ByteOrder, out: &mut [u8]);
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::WIDTH]);
                    match order {
                        ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                        ByteOrder::LittleEndian => <$ty>::from_le_bytes(raw),
                    }
                }

                #[inline]
                fn to_bytes(self, order: ByteOrder, out: &mut [u8]) {
                    let raw = match order {
                        ByteOrder::BigEndian => self.to_be_bytes(),
                        ByteOrder::LittleEndian => self.to_le_bytes(),
                    };
                    out[..Self::WIDTH].copy_from_slice(&raw);
                }
            }
        )*
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

// ============================================================================
// Arbitrary-width integers
// ============================================================================

/// Combine up to 8 bytes into an unsigned value
///
/// value = Σ `bytes[k(i)] * 256^i` for `i` in `[0, width)`, where
/// `k(i) = width-1-i` for big-endian and `k(i) = i` for little-endian.
pub fn combine_bytes(bytes: &[u8], order: ByteOrder) -> u64 {
    debug_assert!(bytes.len() <= 8, "Width out of range: {}", bytes.len());

    let width = bytes.len();
    (0..width).fold(0u64, |acc, i| {
        let byte = bytes[order.byte_position(i, width)];
        acc | (u64::from(byte) << (8 * i))
    })
}

/// Split the low `out.len()` bytes of `value` into `out`
///
/// Inverse of [`combine_bytes`]; higher bytes of `value` are discarded.
pub fn split_bytes(value: u64, order: ByteOrder, out: &mut [u8]) {
    debug_assert!(out.len() <= 8, "Width out of range: {}", out.len());

    let width = out.len();
    for i in 0..width {
        out[order.byte_position(i, width)] = (value >> (8 * i)) as u8;
    }
}

/// Reinterpret the low `width` bytes of `value` as two's-complement
pub fn sign_extend(value: u64, width: usize) -> i64 {
    debug_assert!((1..=8).contains(&width), "Width out of range: {}", width);

    let shift = 64 - 8 * width as u32;
    ((value << shift) as i64) >> shift
}
