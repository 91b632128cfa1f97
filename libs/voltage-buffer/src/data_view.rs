//! Generic endianness-aware accessor
//!
//! [`DataView`] reads and writes integers and floats at arbitrary byte
//! offsets of a store window. Multi-byte accessors take the byte order per
//! call: big-endian by default, little-endian when `little_endian` is set.
//! The free functions at the bottom of this module do the same directly on a
//! [`BackingStore`].

use tracing::debug;

use crate::bytes::{combine_bytes, sign_extend, split_bytes, ByteOrder, Scalar};
use crate::error::{BufferError, Result};
use crate::store::BackingStore;

#[derive(Debug, Clone)]
pub struct DataView {
    store: BackingStore,
    byte_offset: usize,
    byte_length: usize,
}

macro_rules! multi_byte_accessors {
    ($($ty:ty => $get:ident, $set:ident);* $(;)?) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "` at `offset`; big-endian unless `little_endian`")]
            #[inline]
            pub fn $get(&self, offset: usize, little_endian: bool) -> Result<$ty> {
                self.get::<$ty>(offset, ByteOrder::from_little_endian(little_endian))
            }

            #[doc = concat!("Write a `", stringify!($ty), "` at `offset`; big-endian unless `little_endian`")]
            #[inline]
            pub fn $set(&self, offset: usize, value: $ty, little_endian: bool) -> Result<()> {
                self.set::<$ty>(offset, value, ByteOrder::from_little_endian(little_endian))
            }
        )*
    };
}

impl DataView {
    /// Accessor over the whole store
    pub fn new(store: BackingStore) -> Self {
        let byte_length = store.byte_length();
        Self {
            store,
            byte_offset: 0,
            byte_length,
        }
    }

    /// Accessor over `[byte_offset, byte_offset + byte_length)`
    ///
    /// With `byte_length` of `None` the window extends to the end of the store.
    pub fn with_range(
        store: BackingStore,
        byte_offset: usize,
        byte_length: Option<usize>,
    ) -> Result<Self> {
        let byte_length = match byte_length {
            Some(len) => {
                store.check_range(byte_offset, len)?;
                len
            },
            None => {
                store.check_range(byte_offset, 0)?;
                store.byte_length() - byte_offset
            },
        };
        debug!(byte_offset, byte_length, "Created data view over range");
        Ok(Self {
            store,
            byte_offset,
            byte_length,
        })
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
        self.byte_length
    }

    /// Translate a window-relative range into a store offset
    ///
    /// Valid offsets are `[0, byte_length - width]`.
    fn absolute(&self, offset: usize, width: usize) -> Result<usize> {
        match offset.checked_add(width) {
            Some(end) if end <= self.byte_length => Ok(self.byte_offset + offset),
            _ => Err(BufferError::out_of_bounds(offset, width, self.byte_length)),
        }
    }

    pub fn get<T: Scalar>(&self, offset: usize, order: ByteOrder) -> Result<T> {
        let at = self.absolute(offset, T::WIDTH)?;
        self.store.read_scalar(at, order)
    }

    pub fn set<T: Scalar>(&self, offset: usize, value: T, order: ByteOrder) -> Result<()> {
        let at = self.absolute(offset, T::WIDTH)?;
        self.store.write_scalar(at, value, order)
    }

    /// Read a `width`-byte unsigned integer (1..=8 bytes)
    pub fn get_uint(&self, offset: usize, width: usize, order: ByteOrder) -> Result<u64> {
        check_width(width)?;
        let at = self.absolute(offset, width)?;
        let mut raw = [0u8; 8];
        self.store.read_bytes(at, &mut raw[..width])?;
        Ok(combine_bytes(&raw[..width], order))
    }

    /// Read a `width`-byte two's-complement integer (1..=8 bytes)
    pub fn get_int(&self, offset: usize, width: usize, order: ByteOrder) -> Result<i64> {
        let raw = self.get_uint(offset, width, order)?;
        Ok(sign_extend(raw, width))
    }

    /// Write the low `width` bytes of `value` (1..=8 bytes)
    pub fn set_uint(
        &self,
        offset: usize,
        width: usize,
        value: u64,
        order: ByteOrder,
    ) -> Result<()> {
        check_width(width)?;
        let at = self.absolute(offset, width)?;
        let mut raw = [0u8; 8];
        split_bytes(value, order, &mut raw[..width]);
        self.store.write_bytes(at, &raw[..width])
    }

    /// Write the low `width` bytes of `value`'s two's-complement form
    pub fn set_int(&self, offset: usize, width: usize, value: i64, order: ByteOrder) -> Result<()> {
        self.set_uint(offset, width, value as u64, order)
    }

    pub fn get_uint8(&self, offset: usize) -> Result<u8> {
        self.get::<u8>(offset, ByteOrder::BigEndian)
    }

    /// Same stored byte as `get_uint8`, decoded as two's-complement
    pub fn get_int8(&self, offset: usize) -> Result<i8> {
        self.get::<i8>(offset, ByteOrder::BigEndian)
    }

    pub fn set_uint8(&self, offset: usize, value: u8) -> Result<()> {
        self.set(offset, value, ByteOrder::BigEndian)
    }

    pub fn set_int8(&self, offset: usize, value: i8) -> Result<()> {
        self.set(offset, value, ByteOrder::BigEndian)
    }

    multi_byte_accessors! {
        u16 => get_uint16, set_uint16;
        i16 => get_int16, set_int16;
        u32 => get_uint32, set_uint32;
        i32 => get_int32, set_int32;
        u64 => get_big_uint64, set_big_uint64;
        i64 => get_big_int64, set_big_int64;
        f32 => get_float32, set_float32;
        f64 => get_float64, set_float64;
    }
}

fn check_width(width: usize) -> Result<()> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(BufferError::UnsupportedWidth(width))
    }
}

// ============================================================================
// Store-level accessors
// ============================================================================

pub fn get_u8(store: &BackingStore, offset: usize) -> Result<u8> {
    store.read_scalar(offset, ByteOrder::BigEndian)
}

pub fn get_i8(store: &BackingStore, offset: usize) -> Result<i8> {
    store.read_scalar(offset, ByteOrder::BigEndian)
}

pub fn set_u8(store: &BackingStore, offset: usize, value: u8) -> Result<()> {
    store.write_scalar(offset, value, ByteOrder::BigEndian)
}

pub fn set_i8(store: &BackingStore, offset: usize, value: i8) -> Result<()> {
    store.write_scalar(offset, value, ByteOrder::BigEndian)
}

macro_rules! store_accessors {
    ($($ty:ty => $get:ident, $set:ident);* $(;)?) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "` at `offset`; big-endian unless `little_endian`")]
            pub fn $get(store: &BackingStore, offset: usize, little_endian: bool) -> Result<$ty> {
                store.read_scalar(offset, ByteOrder::from_little_endian(little_endian))
            }

            #[doc = concat!("Write a `", stringify!($ty), "` at `offset`; big-endian unless `little_endian`")]
            pub fn $set(
                store: &BackingStore,
                offset: usize,
                value: $ty,
                little_endian: bool,
            ) -> Result<()> {
                store.write_scalar(offset, value, ByteOrder::from_little_endian(little_endian))
            }
        )*
    };
}

store_accessors! {
    u16 => get_u16, set_u16;
    i16 => get_i16, set_i16;
    u32 => get_u32, set_u32;
    i32 => get_i32, set_i32;
    u64 => get_u64, set_u64;
    i64 => get_i64, set_i64;
    f32 => get_f32, set_f32;
    f64 => get_f64, set_f64;
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn sample() -> DataView {
        DataView::new(BackingStore::allocate_from([65, 128, 16, 32], 1).unwrap())
    }

    #[test]
    fn test_single_byte_reinterpret() {
        let view = sample();
        assert_eq!(view.get_uint8(1).unwrap(), 128);
        assert_eq!(view.get_int8(1).unwrap(), -128);
        assert_eq!(view.get_int8(0).unwrap(), 65);
    }

    #[test]
    fn test_uint16_both_orders() {
        let view = sample();
        assert_eq!(view.get_uint16(2, false).unwrap(), 16 * 256 + 32);
        assert_eq!(view.get_uint16(2, true).unwrap(), 16 + 32 * 256);
    }

    #[test]
    fn test_wider_accessors() {
        let view = DataView::new(BackingStore::allocate(8).unwrap());
        view.set_uint32(0, 0x12345678, false).unwrap();
        assert_eq!(view.store().to_vec()[..4], [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(view.get_uint32(0, true).unwrap(), 0x78563412);

        view.set_int16(4, -2, true).unwrap();
        assert_eq!(view.get_int16(4, true).unwrap(), -2);
        assert_eq!(view.get_uint16(4, true).unwrap(), 0xFFFE);

        view.set_float64(0, 1.5, false).unwrap();
        assert_eq!(view.get_float64(0, false).unwrap(), 1.5);

        view.set_big_int64(0, -1, true).unwrap();
        assert_eq!(view.get_big_uint64(0, false).unwrap(), u64::MAX);
    }

    #[test]
    fn test_generic_width() {
        let view = DataView::new(BackingStore::from_vec(vec![0x12, 0x34, 0x56, 0xFF]));
        assert_eq!(view.get_uint(0, 3, ByteOrder::BigEndian).unwrap(), 0x123456);
        assert_eq!(view.get_uint(0, 3, ByteOrder::LittleEndian).unwrap(), 0x563412);
        assert_eq!(view.get_int(3, 1, ByteOrder::BigEndian).unwrap(), -1);

        view.set_uint(1, 3, 0xAABBCC, ByteOrder::LittleEndian).unwrap();
        assert_eq!(view.store().to_vec(), vec![0x12, 0xCC, 0xBB, 0xAA]);

        view.set_int(0, 2, -2, ByteOrder::BigEndian).unwrap();
        assert_eq!(view.get_uint(0, 2, ByteOrder::BigEndian).unwrap(), 0xFFFE);

        assert_eq!(
            view.get_uint(0, 9, ByteOrder::BigEndian).unwrap_err(),
            BufferError::UnsupportedWidth(9)
        );
        assert_eq!(
            view.get_uint(0, 0, ByteOrder::BigEndian).unwrap_err(),
            BufferError::UnsupportedWidth(0)
        );
    }

    #[test]
    fn test_offset_bounds() {
        let view = sample();
        assert_eq!(
            view.get_uint16(3, false).unwrap_err(),
            BufferError::out_of_bounds(3, 2, 4)
        );
        assert!(view.get_uint32(1, false).is_err());
        assert!(view.get_uint8(4).is_err());
        assert!(view.set_uint16(3, 1, true).is_err());
        assert_eq!(view.store().to_vec(), vec![65, 128, 16, 32]);
    }

    #[test]
    fn test_window() {
        let store = BackingStore::from_vec(vec![1, 2, 3, 4, 5, 6]);
        let view = DataView::with_range(store.clone(), 2, Some(3)).unwrap();
        assert_eq!(view.byte_length(), 3);
        assert_eq!(view.get_uint8(0).unwrap(), 3);
        assert_eq!(view.get_uint16(1, false).unwrap(), 0x0405);
        assert!(view.get_uint16(2, false).is_err());

        view.set_uint8(2, 50).unwrap();
        assert_eq!(store.read_byte(4).unwrap(), 50);

        let tail = DataView::with_range(store.clone(), 4, None).unwrap();
        assert_eq!(tail.byte_length(), 2);
        assert!(DataView::with_range(store.clone(), 7, None).is_err());
        assert!(DataView::with_range(store, 4, Some(3)).is_err());
    }

    #[test]
    fn test_store_functions() {
        let store = BackingStore::allocate_from([65, 128, 16, 32], 1).unwrap();
        assert_eq!(get_u8(&store, 1).unwrap(), 128);
        assert_eq!(get_i8(&store, 1).unwrap(), -128);
        assert_eq!(get_u16(&store, 2, false).unwrap(), 4128);
        assert_eq!(get_u16(&store, 2, true).unwrap(), 8208);

        set_i16(&store, 0, -1, false).unwrap();
        assert_eq!(get_u16(&store, 0, true).unwrap(), 0xFFFF);
        set_u8(&store, 0, 0x80).unwrap();
        assert_eq!(get_i8(&store, 0).unwrap(), -128);
        assert!(get_u32(&store, 1, false).is_err());
    }
}
