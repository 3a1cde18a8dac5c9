//! # Utility Modules
//!
//! This module provides common utility functions used throughout the
//! smbus-rs crate, mainly hex encoding/decoding for labels, trace files,
//! and debug output.

pub mod hex;

pub use hex::{decode_hex, encode_hex, encode_hex_upper, format_byte, format_word};
