//! Fixed-width typed views
//!
//! A [`TypedView`] presents a window of a [`BackingStore`] as a sequence of
//! same-width elements of one [`ElementKind`]. It holds only the store handle
//! and its interpretation; element reads and writes go straight to the shared
//! bytes.

use tracing::debug;

use crate::bytes::ByteOrder;
use crate::config::{BufferConfig, DEFAULT_ELEMENT_ORDER, DEFAULT_MAX_BYTE_LENGTH};
use crate::element::ElementKind;
use crate::error::{BufferError, Result};
use crate::number::Number;
use crate::store::BackingStore;

#[derive(Debug, Clone)]
pub struct TypedView {
    store: BackingStore,
    kind: ElementKind,
    order: ByteOrder,
    byte_offset: usize,
    len: usize,
}

impl TypedView {
    /// View the whole store
    ///
    /// The element count is `byte_length / width`; trailing bytes that do not
    /// fill a whole element are not covered.
    pub fn new(store: BackingStore, kind: ElementKind) -> Self {
        let len = store.byte_length() / kind.width();
        debug!(kind = %kind, len, "Created typed view");
        Self {
            store,
            kind,
            order: DEFAULT_ELEMENT_ORDER,
            byte_offset: 0,
            len,
        }
    }

    /// View `length` elements starting at `byte_offset`
    ///
    /// With `length` of `None` the view extends to the last whole element of
    /// the store. The offset must be a multiple of the element width.
    pub fn with_range(
        store: BackingStore,
        kind: ElementKind,
        byte_offset: usize,
        length: Option<usize>,
    ) -> Result<Self> {
        let width = kind.width();
        if byte_offset % width != 0 {
            return Err(BufferError::UnalignedOffset {
                offset: byte_offset,
                width,
            });
        }
        if byte_offset > store.byte_length() {
            return Err(BufferError::out_of_bounds(
                byte_offset,
                0,
                store.byte_length(),
            ));
        }
        let len = match length {
            Some(len) => {
                let byte_len = len.checked_mul(width).ok_or_else(|| {
                    BufferError::out_of_bounds(byte_offset, usize::MAX, store.byte_length())
                })?;
                store.check_range(byte_offset, byte_len)?;
                len
            },
            None => (store.byte_length() - byte_offset) / width,
        };
        debug!(kind = %kind, byte_offset, len, "Created typed view over range");
        Ok(Self {
            store,
            kind,
            order: DEFAULT_ELEMENT_ORDER,
            byte_offset,
            len,
        })
    }

    /// Allocate a fresh store holding `values`
    ///
    /// Initializers go through the same write path as [`TypedView::set`], so
    /// out-of-range values are clamped or wrapped by the kind's policy.
    pub fn of<I, V>(kind: ElementKind, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        let store = BackingStore::encode_values(
            values,
            kind,
            DEFAULT_ELEMENT_ORDER,
            DEFAULT_MAX_BYTE_LENGTH,
        )?;
        Ok(Self::new(store, kind))
    }

    /// Like [`TypedView::of`], honoring the limit and element order of `config`
    pub fn of_with_config<I, V>(kind: ElementKind, values: I, config: &BufferConfig) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        let store = BackingStore::encode_values(
            values,
            kind,
            config.element_order,
            config.max_byte_length,
        )?;
        Ok(Self::new(store, kind).with_byte_order(config.element_order))
    }

    /// Allocate a fresh zero-filled store for `len` elements
    pub fn zeroed(kind: ElementKind, len: usize) -> Result<Self> {
        let byte_len = len
            .checked_mul(kind.width())
            .ok_or_else(|| BufferError::invalid_length(usize::MAX, DEFAULT_MAX_BYTE_LENGTH))?;
        Ok(Self::new(BackingStore::allocate(byte_len)?, kind))
    }

    /// Use `order` for multi-byte elements
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    #[inline]
    pub fn store(&self) -> &BackingStore {
        &self.store
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.len * self.kind.width()
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn element_offset(&self, index: usize) -> Result<usize> {
        if index >= self.len {
            return Err(BufferError::index_out_of_range(index, self.len));
        }
        Ok(self.byte_offset + index * self.kind.width())
    }

    pub fn get(&self, index: usize) -> Result<Number> {
        let offset = self.element_offset(index)?;
        self.store.read_element(offset, self.kind, self.order)
    }

    /// Store `value` at `index` after applying the kind's overflow policy
    pub fn set(&self, index: usize, value: impl Into<Number>) -> Result<()> {
        let offset = self.element_offset(index)?;
        self.store
            .write_element(offset, self.kind, value.into(), self.order)
    }

    /// Write `values` starting at element `offset`
    ///
    /// The whole destination range is checked first; on error no element is
    /// written.
    pub fn set_from<I, V>(&self, offset: usize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Number>,
    {
        let values: Vec<Number> = values.into_iter().map(Into::into).collect();
        match offset.checked_add(values.len()) {
            Some(end) if end <= self.len => {},
            _ => {
                return Err(BufferError::index_out_of_range(
                    offset.saturating_add(values.len()).saturating_sub(1),
                    self.len,
                ))
            },
        }

        let width = self.kind.width();
        let start = self.byte_offset + offset * width;
        let end = start + values.len() * width;
        self.store.with_bytes_mut(|bytes| {
            for (chunk, value) in bytes[start..end].chunks_exact_mut(width).zip(values) {
                self.kind.encode(value, self.order, chunk);
            }
        });
        Ok(())
    }

    /// Set every element to `value`
    pub fn fill(&self, value: impl Into<Number>) {
        let mut encoded = [0u8; 8];
        let width = self.kind.width();
        self.kind.encode(value.into(), self.order, &mut encoded);

        let range = self.byte_offset..self.byte_offset + self.byte_length();
        self.store.with_bytes_mut(|bytes| {
            for chunk in bytes[range].chunks_exact_mut(width) {
                chunk.copy_from_slice(&encoded[..width]);
            }
        });
    }

    /// Snapshot of all elements
    pub fn to_vec(&self) -> Vec<Number> {
        let width = self.kind.width();
        let range = self.byte_offset..self.byte_offset + self.byte_length();
        self.store.with_bytes(|bytes| {
            bytes[range]
                .chunks_exact(width)
                .map(|chunk| self.kind.decode(chunk, self.order))
                .collect()
        })
    }

    /// Iterate over a snapshot of the elements taken under one read lock
    pub fn iter(&self) -> impl Iterator<Item = Number> {
        self.to_vec().into_iter()
    }

    /// View of elements `[begin, end)` over the same store
    pub fn subarray(&self, begin: usize, end: usize) -> Result<Self> {
        if begin > end {
            return Err(BufferError::index_out_of_range(begin, end));
        }
        if end > self.len {
            return Err(BufferError::index_out_of_range(end, self.len));
        }
        Ok(Self {
            store: self.store.clone(),
            kind: self.kind,
            order: self.order,
            byte_offset: self.byte_offset + begin * self.kind.width(),
            len: end - begin,
        })
    }

    /// View the same bytes as another kind
    ///
    /// Fails if the window's offset is not aligned for `kind`.
    pub fn reinterpret(&self, kind: ElementKind) -> Result<Self> {
        let view = Self::with_range(
            self.store.clone(),
            kind,
            self.byte_offset,
            Some(self.byte_length() / kind.width()),
        )?;
        Ok(view.with_byte_order(self.order))
    }
}
