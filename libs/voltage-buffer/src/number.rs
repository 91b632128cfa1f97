//! Element values read from and written to typed views

use serde::Serialize;

/// A numeric element value
///
/// `Int` is wide enough to hold every integer element kind losslessly,
/// 64-bit unsigned included, and any out-of-range value a caller wants
/// clamped or wrapped on write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Integer value, if this is an `Int` that fits in `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int(v) => i64::try_from(v).ok(),
            Number::Float(_) => None,
        }
    }

    /// Integer value, if this is an `Int` that fits in `u64`
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::Int(v) => u64::try_from(v).ok(),
            Number::Float(_) => None,
        }
    }

    /// Value as `f64` (nearest representable for large integers)
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(0)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

impl std::str::FromStr for Number {
    type Err = std::num::ParseFloatError;

    /// Integers parse exactly, anything else is parsed as a float
    /// ("1e3", "-0.5", "NaN", "inf").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i128>() {
            Ok(v) => Ok(Number::Int(v)),
            Err(_) => s.parse::<f64>().map(Number::Float),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                #[inline]
                fn from(value: $ty) -> Self {
                    Number::Int(value as i128)
                }
            }
        )*
    };
}

impl_from_int!(u8, i8, u16, i16, u32, i32, u64, i64, i128, usize, isize);

impl From<f32> for Number {
    #[inline]
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
