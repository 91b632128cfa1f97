//! Hex encoding utility
//! Uppercase encoding for display, lenient decoding for command line input

use std::fmt::Write;

use crate::error::{Error, Result};

/// Encode bytes to uppercase hex string
/// Example: [0x12, 0x34, 0xAB] -> "1234AB"
pub fn encode_upper(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len() * 2);
    for byte in data {
        // Writing to String buffer is infallible - no need for expect
        let _ = write!(&mut result, "{:02X}", byte);
    }
    result
}

/// Decode a hex string into bytes
///
/// Accepts an optional `0x` prefix and ignores whitespace, `:` and `-`
/// separators: "0x41 80 10 20", "41:80:10:20" and "41801020" are equal.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();

    ::hex::decode(&digits)
        .map_err(|e| Error::Parse(format!("Invalid hex input '{}': {}", input, e)))
}
