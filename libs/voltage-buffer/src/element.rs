//! Element kinds and their encode/decode routines
//!
//! Every kind a typed view can interpret bytes as is listed in
//! [`ElementKind`]. Reading the same bits under a different kind is an
//! explicit call to another kind's `decode`; there is no implicit coercion.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bytes::{combine_bytes, sign_extend, split_bytes, ByteOrder, Scalar};
use crate::error::{BufferError, Result};
use crate::number::Number;

/// Handling of values outside an element's representable range on write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Saturate to the minimum/maximum; fractions round half to even
    Clamp,
    /// Truncate toward zero, then reduce modulo `2^(8 * width)`
    Wrap,
    /// Nearest representable IEEE 754 value
    Ieee754,
}

/// Closed set of element interpretations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Int8,
        ElementKind::Uint8,
        ElementKind::Uint8Clamped,
        ElementKind::Int16,
        ElementKind::Uint16,
        ElementKind::Int32,
        ElementKind::Uint32,
        ElementKind::Float32,
        ElementKind::Float64,
        ElementKind::BigInt64,
        ElementKind::BigUint64,
    ];

    /// Element width in bytes
    #[inline]
    pub fn width(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Uint8Clamped => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 | Self::BigInt64 | Self::BigUint64 => 8,
        }
    }

    #[inline]
    pub fn policy(self) -> OverflowPolicy {
        match self {
            Self::Uint8Clamped => OverflowPolicy::Clamp,
            Self::Float32 | Self::Float64 => OverflowPolicy::Ieee754,
            _ => OverflowPolicy::Wrap,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::BigInt64 | Self::Float32 | Self::Float64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::Uint8 => "Uint8",
            Self::Uint8Clamped => "Uint8Clamped",
            Self::Int16 => "Int16",
            Self::Uint16 => "Uint16",
            Self::Int32 => "Int32",
            Self::Uint32 => "Uint32",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::BigInt64 => "BigInt64",
            Self::BigUint64 => "BigUint64",
        }
    }

    /// Wrapping unsigned integer kind of the given width
    pub fn unsigned_for_width(width: usize) -> Result<Self> {
        match width {
            1 => Ok(Self::Uint8),
            2 => Ok(Self::Uint16),
            4 => Ok(Self::Uint32),
            8 => Ok(Self::BigUint64),
            _ => Err(BufferError::UnsupportedWidth(width)),
        }
    }

    /// Inclusive integer range of this kind; `None` for float kinds
    pub fn int_range(self) -> Option<(i128, i128)> {
        if self.is_float() {
            return None;
        }
        let bits = 8 * self.width() as u32;
        if self.is_signed() {
            Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1))
        } else {
            Some((0, (1i128 << bits) - 1))
        }
    }

    /// Encode `value` into the first `width()` bytes of `out`
    ///
    /// The kind's overflow policy decides what gets stored for values
    /// outside its range. Panics if `out` is shorter than `width()`.
    pub fn encode(self, value: Number, order: ByteOrder, out: &mut [u8]) {
        let out = &mut out[..self.width()];
        match self.policy() {
            OverflowPolicy::Clamp => {
                let (min, max) = self.int_range().unwrap_or((0, 0));
                split_bytes(saturate(value, min, max) as u64, order, out);
            },
            OverflowPolicy::Wrap => split_bytes(wrap(value), order, out),
            OverflowPolicy::Ieee754 => {
                if self == Self::Float32 {
                    (value.as_f64() as f32).to_bytes(order, out);
                } else {
                    value.as_f64().to_bytes(order, out);
                }
            },
        }
    }

    /// Decode the first `width()` bytes of `bytes`
    ///
    /// Signed kinds read the stored bits as two's-complement. Panics if
    /// `bytes` is shorter than `width()`.
    pub fn decode(self, bytes: &[u8], order: ByteOrder) -> Number {
        let width = self.width();
        match self {
            Self::Float32 => Number::Float(f64::from(f32::from_bytes(bytes, order))),
            Self::Float64 => Number::Float(f64::from_bytes(bytes, order)),
            _ => {
                let raw = combine_bytes(&bytes[..width], order);
                if self.is_signed() {
                    Number::Int(i128::from(sign_extend(raw, width)))
                } else {
                    Number::Int(i128::from(raw))
                }
            },
        }
    }
}

/// Low 64 bits of `value` after truncation toward zero
///
/// NaN and infinities map to 0. Callers keep only the low `width` bytes,
/// which completes the reduction modulo `2^(8 * width)`.
fn wrap(value: Number) -> u64 {
    match value {
        Number::Int(v) => v as u64,
        Number::Float(f) if !f.is_finite() => 0,
        Number::Float(f) => {
            // 2^64; the remainder keeps the sign and fits in i128
            let reduced = f.trunc() % 18_446_744_073_709_551_616.0;
            reduced as i128 as u64
        },
    }
}

fn saturate(value: Number, min: i128, max: i128) -> i128 {
    match value {
        Number::Int(v) => v.clamp(min, max),
        Number::Float(f) if f.is_nan() => 0,
        Number::Float(f) => {
            let rounded = f.round_ties_even();
            if rounded <= min as f64 {
                min
            } else if rounded >= max as f64 {
                max
            } else {
                rounded as i128
            }
        },
    }
}

impl FromStr for ElementKind {
    type Err = BufferError;

    /// Accepts the kind name with or without an `Array` suffix and the
    /// short Rust spellings: "Uint8Array", "uint8", "u8", "uint8-clamped",
    /// "f64", "bigint64", "i64" ...
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        let normalized = normalized.strip_suffix("array").unwrap_or(&normalized);
        match normalized {
            "int8" | "i8" => Ok(Self::Int8),
            "uint8" | "u8" => Ok(Self::Uint8),
            "uint8clamped" | "u8clamped" | "clampedu8" => Ok(Self::Uint8Clamped),
            "int16" | "i16" => Ok(Self::Int16),
            "uint16" | "u16" => Ok(Self::Uint16),
            "int32" | "i32" => Ok(Self::Int32),
            "uint32" | "u32" => Ok(Self::Uint32),
            "float32" | "f32" => Ok(Self::Float32),
            "float64" | "f64" => Ok(Self::Float64),
            "bigint64" | "int64" | "i64" => Ok(Self::BigInt64),
            "biguint64" | "uint64" | "u64" => Ok(Self::BigUint64),
            _ => Err(BufferError::invalid_element_kind(s)),
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
