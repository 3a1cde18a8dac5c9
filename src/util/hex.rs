//! # Hex Encoding/Decoding Utilities
//!
//! Enhanced hex helpers used throughout the decoder for annotation labels,
//! trace parsing, and debug output.
//!
//! ## Usage
//!
//! ```rust
//! use smbus_rs::util::hex::{encode_hex, decode_hex, format_byte};
//!
//! let data = [0x40, 0x00];
//! assert_eq!(encode_hex(&data), "4000");
//! assert_eq!(decode_hex("4000").unwrap(), data);
//! assert_eq!(format_byte(0x17), "17");
//! ```

use crate::error::SmBusError;

/// Encode bytes to lowercase hex string.
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Encode bytes to uppercase hex string.
pub fn encode_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode a hex string into bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, SmBusError> {
    hex::decode(s).map_err(|_| SmBusError::InvalidHexString)
}

/// Render a single byte as the two-digit uppercase hex used in labels.
pub fn format_byte(byte: u8) -> String {
    format!("{byte:02X}")
}

/// Render a 16-bit word as the four-digit uppercase hex used in labels.
pub fn format_word(word: u16) -> String {
    format!("{word:04X}")
}
