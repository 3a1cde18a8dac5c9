//! # SMBus/PMBus Error Handling
//!
//! This module defines the SmBusError enum, which represents the different error
//! types that can occur in the smbus-rs crate.
//!
//! Protocol violations inside the decoders are not errors: the state machines
//! recover by resynchronizing (see the framer and decoder modules). SmBusError
//! covers the trace-parsing boundary and reportable decode conditions.

use thiserror::Error;

/// Represents the different error types that can occur in the SMBus crate.
#[derive(Debug, Error)]
pub enum SmBusError {
    /// Indicates an error when parsing a bus-symbol trace.
    #[error("Error parsing symbol trace: {0}")]
    TraceParseError(String),

    /// Indicates an unknown command opcode was encountered.
    #[error("Unknown command opcode: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Indicates a protocol type this layer does not assemble values for.
    #[error("Unsupported protocol {protocol:?} for command 0x{opcode:02X}")]
    UnsupportedProtocol {
        opcode: u8,
        protocol: crate::pmbus::command::Protocol,
    },

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string")]
    InvalidHexString,

    /// A catch‑all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}
