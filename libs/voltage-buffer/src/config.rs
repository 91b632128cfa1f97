//! Buffer configuration
//!
//! Deserialized by the configuration loader in `common`; every field has a
//! default so an empty source yields a usable config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bytes::ByteOrder;

/// Default upper bound for a single allocation (1 GiB)
pub const DEFAULT_MAX_BYTE_LENGTH: usize = 1 << 30;

/// Default byte order of multi-byte elements in typed views
pub const DEFAULT_ELEMENT_ORDER: ByteOrder = ByteOrder::LittleEndian;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Largest store `allocate` accepts
    pub max_byte_length: usize,

    /// Byte order typed views use for 16/32/64-bit elements
    pub element_order: ByteOrder,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// Directory for daily log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_byte_length: DEFAULT_MAX_BYTE_LENGTH,
            element_order: DEFAULT_ELEMENT_ORDER,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BufferConfig::default();
        assert_eq!(config.max_byte_length, 1 << 30);
        assert_eq!(config.element_order, ByteOrder::LittleEndian);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: BufferConfig =
            serde_json::from_str(r#"{"element_order": "be"}"#).unwrap();
        assert_eq!(config.element_order, ByteOrder::BigEndian);
        assert_eq!(config.max_byte_length, DEFAULT_MAX_BYTE_LENGTH);

        let config: BufferConfig =
            serde_json::from_str(r#"{"log_dir": "/var/log/bufscope"}"#).unwrap();
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/bufscope")));
    }
}
