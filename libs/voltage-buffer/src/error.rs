//! Buffer Error Types
//!
//! Contract violations reported by stores and views.

use thiserror::Error;

/// Result type for voltage-buffer operations
pub type Result<T> = std::result::Result<T, BufferError>;

/// Buffer errors
///
/// Every variant is raised synchronously at the offending call and no bytes are
/// modified when one is returned. Overflow on element writes is not an error:
/// it is resolved by the view's write policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Allocation size rejected (above the limit or not computable)
    #[error("Invalid length: {requested} bytes (limit {limit})")]
    InvalidLength { requested: usize, limit: usize },

    /// Byte range falls outside the store or view window
    #[error("Out of bounds: offset {offset} + width {width} exceeds length {length}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        length: usize,
    },

    /// Element index beyond the view's element count
    #[error("Index out of range: {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// View offset not a multiple of the element width
    #[error("Unaligned offset: {offset} is not a multiple of {width}")]
    UnalignedOffset { offset: usize, width: usize },

    /// Element width other than 1, 2, 4 or 8 bytes
    #[error("Unsupported element width: {0}")]
    UnsupportedWidth(usize),

    /// Unknown byte order name
    #[error("Invalid byte order: {0}")]
    InvalidByteOrder(String),

    /// Unknown element kind name
    #[error("Invalid element kind: {0}")]
    InvalidElementKind(String),
}

// Helper methods for creating errors
impl BufferError {
    pub fn out_of_bounds(offset: usize, width: usize, length: usize) -> Self {
        BufferError::OutOfBounds {
            offset,
            width,
            length,
        }
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        BufferError::IndexOutOfRange { index, len }
    }

    pub fn invalid_length(requested: usize, limit: usize) -> Self {
        BufferError::InvalidLength { requested, limit }
    }

    pub fn invalid_byte_order(name: impl Into<String>) -> Self {
        BufferError::InvalidByteOrder(name.into())
    }

    pub fn invalid_element_kind(name: impl Into<String>) -> Self {
        BufferError::InvalidElementKind(name.into())
    }

    /// Check if this error is a byte- or element-level bounds violation
    pub fn is_bounds_violation(&self) -> bool {
        matches!(
            self,
            BufferError::OutOfBounds { .. } | BufferError::IndexOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            BufferError::out_of_bounds(3, 2, 4).to_string(),
            "Out of bounds: offset 3 + width 2 exceeds length 4"
        );
        assert_eq!(
            BufferError::index_out_of_range(4, 4).to_string(),
            "Index out of range: 4 >= 4"
        );
    }

    #[test]
    fn test_is_bounds_violation() {
        assert!(BufferError::out_of_bounds(0, 1, 0).is_bounds_violation());
        assert!(BufferError::index_out_of_range(1, 0).is_bounds_violation());
        assert!(!BufferError::UnsupportedWidth(3).is_bounds_violation());
        assert!(!BufferError::invalid_length(10, 4).is_bounds_violation());
    }
}
