//! Binary data processing utilities
//!
//! Provides byte order handling and numeric conversions shared by the
//! backing store, typed views and the generic accessor.
//!
//! # Design Principles
//!
//! - **Type-safe**: `ByteOrder` enum instead of boolean flags in the core
//! - **Platform independent**: every multi-byte value is encoded in an
//!   explicit order, never the host's native one
//! - **Zero-copy**: conversions operate directly on byte slices

pub mod byte_order;
pub mod conversions;

pub use byte_order::ByteOrder;
pub use conversions::*;
