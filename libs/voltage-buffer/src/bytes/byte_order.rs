//! Byte order representation for multi-byte element access
//!
//! The generic accessor selects the order per call, typed views fix it at
//! construction time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BufferError;

/// Byte order used to combine bytes into 16/32/64-bit values
///
/// Uses ABCD notation where A is the most significant byte:
/// for the 32-bit value `0x12345678`
/// - `BigEndian (ABCD)`: [0x12, 0x34, 0x56, 0x78]
/// - `LittleEndian (DCBA)`: [0x78, 0x56, 0x34, 0x12]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Big-endian: most significant byte first
    ///
    /// Network byte order and the default of the generic accessor.
    #[default]
    #[serde(alias = "be", alias = "BE", alias = "ABCD")]
    BigEndian,

    /// Little-endian: least significant byte first
    #[serde(alias = "le", alias = "LE", alias = "DCBA")]
    LittleEndian,
}

impl ByteOrder {
    /// Map the `little_endian` flag of the accessor API to a byte order
    #[inline]
    pub fn from_little_endian(little_endian: bool) -> Self {
        if little_endian {
            Self::LittleEndian
        } else {
            Self::BigEndian
        }
    }

    /// Get descriptive name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigEndian => "ABCD (Big-Endian)",
            Self::LittleEndian => "DCBA (Little-Endian)",
        }
    }

    pub fn is_big_endian(&self) -> bool {
        matches!(self, Self::BigEndian)
    }

    pub fn is_little_endian(&self) -> bool {
        matches!(self, Self::LittleEndian)
    }

    /// Position of the byte with significance `i` (0 = least significant)
    /// inside a value of `width` bytes
    #[inline]
    pub fn byte_position(&self, i: usize, width: usize) -> usize {
        match self {
            Self::BigEndian => width - 1 - i,
            Self::LittleEndian => i,
        }
    }
}

impl FromStr for ByteOrder {
    type Err = BufferError;

    /// Supports the common spellings:
    /// - "ABCD", "BE", "BIG_ENDIAN", "big-endian" → BigEndian
    /// - "DCBA", "LE", "LITTLE_ENDIAN", "little-endian" → LittleEndian
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "ABCD" | "AB" | "BE" | "BIGENDIAN" | "BIG" => Ok(Self::BigEndian),
            "DCBA" | "BA" | "LE" | "LITTLEENDIAN" | "LITTLE" => Ok(Self::LittleEndian),
            _ => Err(BufferError::invalid_byte_order(s)),
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_from_str_valid() {
        assert_eq!("ABCD".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert_eq!("be".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert_eq!(
            "big-endian".parse::<ByteOrder>().unwrap(),
            ByteOrder::BigEndian
        );

        assert_eq!("DCBA".parse::<ByteOrder>().unwrap(), ByteOrder::LittleEndian);
        assert_eq!("LE".parse::<ByteOrder>().unwrap(), ByteOrder::LittleEndian);
        assert_eq!(
            "LITTLE_ENDIAN".parse::<ByteOrder>().unwrap(),
            ByteOrder::LittleEndian
        );
    }

    #[test]
    fn test_from_str_invalid() {
        assert_eq!(
            "CDAB".parse::<ByteOrder>(),
            Err(BufferError::InvalidByteOrder("CDAB".to_string()))
        );
        assert!("".parse::<ByteOrder>().is_err());
    }

    #[test]
    fn test_from_little_endian_flag() {
        assert_eq!(ByteOrder::from_little_endian(false), ByteOrder::BigEndian);
        assert_eq!(ByteOrder::from_little_endian(true), ByteOrder::LittleEndian);
    }

    #[test]
    fn test_byte_position() {
        assert_eq!(ByteOrder::BigEndian.byte_position(0, 4), 3);
        assert_eq!(ByteOrder::BigEndian.byte_position(3, 4), 0);
        assert_eq!(ByteOrder::LittleEndian.byte_position(0, 4), 0);
        assert_eq!(ByteOrder::LittleEndian.byte_position(3, 4), 3);
    }

    #[test]
    fn test_default() {
        assert_eq!(ByteOrder::default(), ByteOrder::BigEndian);
    }

    #[test]
    fn test_serde_aliases() {
        let order: ByteOrder = serde_json::from_str("\"le\"").unwrap();
        assert_eq!(order, ByteOrder::LittleEndian);
        let order: ByteOrder = serde_json::from_str("\"big_endian\"").unwrap();
        assert_eq!(order, ByteOrder::BigEndian);
        assert_eq!(
            serde_json::to_string(&ByteOrder::LittleEndian).unwrap(),
            "\"little_endian\""
        );
    }
}
