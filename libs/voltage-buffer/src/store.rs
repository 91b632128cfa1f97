//! Backing store: one fixed-length byte allocation shared by all views
//!
//! Cloning a `BackingStore` clones the handle, not the bytes. Every view
//! derived from a store holds such a handle, so a write through one view is
//! visible through all others. Each operation takes the store's lock for its
//! own duration only, which keeps multi-byte writes untorn when views are
//! shared across threads.

use std::ops::Range;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::bytes::{ByteOrder, Scalar};
use crate::config::{BufferConfig, DEFAULT_MAX_BYTE_LENGTH};
use crate::element::ElementKind;
use crate::error::{BufferError, Result};
use crate::number::Number;
use crate::view::TypedView;

#[derive(Clone)]
pub struct BackingStore {
    bytes: Arc<RwLock<Box<[u8]>>>,
    /// Fixed at allocation, readable without the lock
    len: usize,
}

impl BackingStore {
    /// Allocate a zero-initialized store of `length` bytes
    pub fn allocate(length: usize) -> Result<Self> {
        Self::allocate_with_limit(length, DEFAULT_MAX_BYTE_LENGTH)
    }

    /// Allocate using the limit from `config`
    pub fn allocate_with_config(length: usize, config: &BufferConfig) -> Result<Self> {
        Self::allocate_with_limit(length, config.max_byte_length)
    }

    pub fn allocate_with_limit(length: usize, limit: usize) -> Result<Self> {
        if length > limit {
            debug!(length, limit, "Rejected allocation above limit");
            return Err(BufferError::invalid_length(length, limit));
        }
        debug!(length, "Allocated backing store");
        Ok(Self::from_vec(vec![0u8; length]))
    }

    /// Wrap existing bytes without copying
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self {
            bytes: Arc::new(RwLock::new(bytes.into_boxed_slice())),
            len,
        }
    }

    /// Allocate a store holding `values` laid out contiguously
    ///
    /// Each value is wrapped to `element_width` bytes and stored
    /// little-endian. Widths other than 1, 2, 4 and 8 are rejected.
    pub fn allocate_from<I, V>(values: I, element_width: usize) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        Self::allocate_from_with_limit(values, element_width, DEFAULT_MAX_BYTE_LENGTH)
    }

    /// Like [`BackingStore::allocate_from`], rejecting stores above
    /// `config.max_byte_length`
    pub fn allocate_from_with_config<I, V>(
        values: I,
        element_width: usize,
        config: &BufferConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        Self::allocate_from_with_limit(values, element_width, config.max_byte_length)
    }

    fn allocate_from_with_limit<I, V>(values: I, element_width: usize, limit: usize) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        let kind = ElementKind::unsigned_for_width(element_width)?;
        Self::encode_values(values, kind, ByteOrder::LittleEndian, limit)
    }

    /// Allocate a store sized for `values` encoded as `kind`
    ///
    /// Shares the write path of single element writes, so the kind's
    /// overflow policy applies to every initializer.
    pub(crate) fn encode_values<I, V>(
        values: I,
        kind: ElementKind,
        order: ByteOrder,
        limit: usize,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        let values: Vec<Number> = values.into_iter().map(Into::into).collect();
        let width = kind.width();
        let length = values
            .len()
            .checked_mul(width)
            .ok_or_else(|| BufferError::invalid_length(usize::MAX, limit))?;
        if length > limit {
            return Err(BufferError::invalid_length(length, limit));
        }

        let mut bytes = vec![0u8; length];
        for (chunk, value) in bytes.chunks_exact_mut(width).zip(values) {
            kind.encode(value, order, chunk);
        }
        debug!(length, kind = %kind, "Allocated backing store from values");
        Ok(Self::from_vec(bytes))
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Typed view over the whole store
    pub fn view(&self, kind: ElementKind) -> TypedView {
        TypedView::new(self.clone(), kind)
    }

    /// Check if both handles refer to the same allocation
    pub fn ptr_eq(&self, other: &BackingStore) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Validate `[offset, offset + width)` against the store length
    pub fn check_range(&self, offset: usize, width: usize) -> Result<Range<usize>> {
        match offset.checked_add(width) {
            Some(end) if end <= self.len => Ok(offset..end),
            _ => Err(BufferError::out_of_bounds(offset, width, self.len)),
        }
    }

    pub fn read_byte(&self, offset: usize) -> Result<u8> {
        let range = self.check_range(offset, 1)?;
        Ok(self.bytes.read()[range.start])
    }

    pub fn write_byte(&self, offset: usize, value: u8) -> Result<()> {
        let range = self.check_range(offset, 1)?;
        trace!(offset, value, "write_byte");
        self.bytes.write()[range.start] = value;
        Ok(())
    }

    /// Copy `buf.len()` bytes starting at `offset` into `buf`
    pub fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        let range = self.check_range(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes.read()[range]);
        Ok(())
    }

    /// Store `data` starting at `offset`; nothing is written if the range
    /// does not fit
    pub fn write_bytes(&self, offset: usize, data: &[u8]) -> Result<()> {
        let range = self.check_range(offset, data.len())?;
        trace!(offset, len = data.len(), "write_bytes");
        self.bytes.write()[range].copy_from_slice(data);
        Ok(())
    }

    pub fn read_scalar<T: Scalar>(&self, offset: usize, order: ByteOrder) -> Result<T> {
        let range = self.check_range(offset, T::WIDTH)?;
        Ok(T::from_bytes(&self.bytes.read()[range], order))
    }

    pub fn write_scalar<T: Scalar>(&self, offset: usize, value: T, order: ByteOrder) -> Result<()> {
        let range = self.check_range(offset, T::WIDTH)?;
        trace!(offset, ?value, "write_scalar");
        value.to_bytes(order, &mut self.bytes.write()[range]);
        Ok(())
    }

    pub fn read_element(
        &self,
        offset: usize,
        kind: ElementKind,
        order: ByteOrder,
    ) -> Result<Number> {
        let range = self.check_range(offset, kind.width())?;
        Ok(kind.decode(&self.bytes.read()[range], order))
    }

    /// Encode `value` as `kind` at `offset`, applying the kind's overflow policy
    pub fn write_element(
        &self,
        offset: usize,
        kind: ElementKind,
        value: Number,
        order: ByteOrder,
    ) -> Result<()> {
        let range = self.check_range(offset, kind.width())?;
        let mut encoded = [0u8; 8];
        kind.encode(value, order, &mut encoded);
        trace!(offset, kind = %kind, %value, "write_element");
        self.bytes.write()[range].copy_from_slice(&encoded[..kind.width()]);
        Ok(())
    }

    /// Copy `[begin, end)` into a new, independent store
    pub fn slice(&self, begin: usize, end: usize) -> Result<Self> {
        if begin > end {
            return Err(BufferError::out_of_bounds(begin, 0, end));
        }
        let range = self.check_range(begin, end - begin)?;
        Ok(Self::from_vec(self.bytes.read()[range].to_vec()))
    }

    /// Snapshot of the current contents
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.read().to_vec()
    }

    /// Run `f` over the bytes while holding the read lock
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.bytes.read())
    }

    /// Run `f` over the bytes while holding the write lock
    ///
    /// Used for bulk writes that must be validated up front and then applied
    /// without interleaving with other writers.
    pub fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        f(&mut self.bytes.write())
    }
}

impl std::fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingStore")
            .field("byte_length", &self.len)
            .field("handles", &Arc::strong_count(&self.bytes))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_allocate_zeroed() {
        let store = BackingStore::allocate(16).unwrap();
        assert_eq!(store.byte_length(), 16);
        assert_eq!(store.to_vec(), vec![0u8; 16]);

        let empty = BackingStore::allocate(0).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_allocate_limit() {
        assert_eq!(
            BackingStore::allocate_with_limit(9, 8).unwrap_err(),
            BufferError::invalid_length(9, 8)
        );
        assert!(BackingStore::allocate_with_limit(8, 8).is_ok());

        let config = BufferConfig {
            max_byte_length: 4,
            ..BufferConfig::default()
        };
        assert!(BackingStore::allocate_with_config(5, &config).is_err());
    }

    #[test]
    fn test_allocate_from_honors_config_limit() {
        let config = BufferConfig {
            max_byte_length: 4,
            ..BufferConfig::default()
        };
        assert_eq!(
            BackingStore::allocate_from_with_config([1, 2, 3], 2, &config).unwrap_err(),
            BufferError::invalid_length(6, 4)
        );
        assert!(BackingStore::allocate_from([1, 2, 3], 2).is_ok());

        let store =
            BackingStore::allocate_from_with_config([0x0102u16, 0x0304], 2, &config).unwrap();
        assert_eq!(store.to_vec(), vec![0x02, 0x01, 0x04, 0x03]);
        assert_eq!(
            BackingStore::allocate_from_with_config([1], 3, &config).unwrap_err(),
            BufferError::UnsupportedWidth(3)
        );
    }

    #[test]
    #[traced_test]
    fn test_allocation_logging() {
        BackingStore::allocate(4).unwrap();
        assert!(logs_contain("Allocated backing store"));

        let _ = BackingStore::allocate_with_limit(9, 8);
        assert!(logs_contain("Rejected allocation above limit"));
    }

    #[test]
    fn test_allocate_from_widths() {
        let store = BackingStore::allocate_from([65, 128, 16, 32], 1).unwrap();
        assert_eq!(store.to_vec(), vec![65, 128, 16, 32]);

        let store = BackingStore::allocate_from([0x1234u16, 0x5678], 2).unwrap();
        assert_eq!(store.to_vec(), vec![0x34, 0x12, 0x78, 0x56]);

        let store = BackingStore::allocate_from([300, -1], 1).unwrap();
        assert_eq!(store.to_vec(), vec![44, 255]);

        let store = BackingStore::allocate_from([1u32], 8).unwrap();
        assert_eq!(store.byte_length(), 8);

        assert_eq!(
            BackingStore::allocate_from([1, 2], 3).unwrap_err(),
            BufferError::UnsupportedWidth(3)
        );
    }

    #[test]
    fn test_byte_access_bounds() {
        let store = BackingStore::allocate(4).unwrap();
        store.write_byte(3, 0xAB).unwrap();
        assert_eq!(store.read_byte(3).unwrap(), 0xAB);

        assert_eq!(
            store.read_byte(4).unwrap_err(),
            BufferError::out_of_bounds(4, 1, 4)
        );
        assert!(store.write_byte(usize::MAX, 1).is_err());
    }

    #[test]
    fn test_write_bytes_is_all_or_nothing() {
        let store = BackingStore::from_vec(vec![1, 2, 3, 4]);
        assert!(store.write_bytes(2, &[9, 9, 9]).is_err());
        assert_eq!(store.to_vec(), vec![1, 2, 3, 4]);

        store.write_bytes(2, &[9, 9]).unwrap();
        assert_eq!(store.to_vec(), vec![1, 2, 9, 9]);

        let mut buf = [0u8; 3];
        store.read_bytes(1, &mut buf).unwrap();
        assert_eq!(buf, [2, 9, 9]);
    }

    #[test]
    fn test_scalar_access() {
        let store = BackingStore::allocate(8).unwrap();
        store
            .write_scalar(0, 0x0102u16, ByteOrder::BigEndian)
            .unwrap();
        assert_eq!(store.to_vec()[..2], [0x01, 0x02]);
        assert_eq!(
            store.read_scalar::<u16>(0, ByteOrder::LittleEndian).unwrap(),
            0x0201
        );
        assert!(store.read_scalar::<u64>(1, ByteOrder::BigEndian).is_err());
    }

    #[test]
    fn test_clone_shares_bytes() {
        let store = BackingStore::allocate(2).unwrap();
        let alias = store.clone();
        alias.write_byte(0, 7).unwrap();
        assert_eq!(store.read_byte(0).unwrap(), 7);
        assert!(store.ptr_eq(&alias));
    }

    #[test]
    fn test_slice_copies() {
        let store = BackingStore::from_vec(vec![1, 2, 3, 4, 5]);
        let part = store.slice(1, 4).unwrap();
        assert_eq!(part.to_vec(), vec![2, 3, 4]);
        assert!(!part.ptr_eq(&store));

        part.write_byte(0, 99).unwrap();
        assert_eq!(store.read_byte(1).unwrap(), 2);

        assert!(store.slice(3, 2).is_err());
        assert!(store.slice(2, 6).is_err());
        assert_eq!(store.slice(5, 5).unwrap().byte_length(), 0);
    }
}
