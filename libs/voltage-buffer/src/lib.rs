//! Voltage Buffer Library
//!
//! Typed, endianness-aware views over shared byte buffers.
//!
//! # Architecture
//!
//! - **BackingStore**: one fixed-length byte allocation, shared by handle
//! - **TypedView**: the store as a sequence of fixed-width elements of one
//!   [`ElementKind`], with that kind's overflow policy applied on write
//! - **DataView**: integers and floats at arbitrary byte offsets, byte order
//!   chosen per call
//!
//! Views never copy the bytes. A write through any view is visible through
//! every other view over the same store:
//!
//! ```
//! use voltage_buffer::{BackingStore, DataView, ElementKind, Number, TypedView};
//!
//! let store = BackingStore::allocate_from([65, 128, 16, 32], 1).unwrap();
//! let signed = TypedView::new(store.clone(), ElementKind::Int8);
//! assert_eq!(signed.get(1).unwrap(), Number::Int(-128));
//!
//! let view = DataView::new(store);
//! assert_eq!(view.get_uint16(2, false).unwrap(), 4128);
//! assert_eq!(view.get_uint16(2, true).unwrap(), 8208);
//! ```

pub mod bytes;
pub mod config;
pub mod data_view;
pub mod element;
pub mod error;
pub mod number;
pub mod store;
pub mod view;

// Re-export core types
pub use bytes::{ByteOrder, Scalar};
pub use config::BufferConfig;
pub use data_view::DataView;
pub use element::{ElementKind, OverflowPolicy};
pub use error::{BufferError, Result};
pub use number::Number;
pub use store::BackingStore;
pub use view::TypedView;
