//! `VoltageEMS` basic library for command line tools
//!
//! Provides functions shared by the tools, including:
//! - logging bootstrap
//! - layered configuration loading
//! - hex helpers for byte input and output

pub mod config_loader;
pub mod error;
pub mod hex;
pub mod logging;

pub use error::{Error, Result};
