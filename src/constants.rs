//! SMBus Protocol Constants
//!
//! This module defines constants used in the SMBus/PMBus decoder
//! implementation, based on the SMBus 2.0 and PMBus 1.3 specifications.

/// Number of distinct transaction symbol kinds in the SMBus grammar.
pub const SMBUS_SYMBOL_KIND_COUNT: usize = 21;

/// Number of bit spans carried by a physical address byte record.
pub const SMBUS_ADDRESS_BIT_COUNT: usize = 8;

/// Index of the direction bit within an LSB-first bit record.
pub const SMBUS_DIRECTION_BIT_INDEX: usize = 0;

/// Direction bit value for a read access (bit 0 of the address byte).
pub const SMBUS_DIRECTION_READ: u8 = 0x01;

/// Number of payload bytes in a Byte-protocol data phase.
pub const SMBUS_PROTO_BYTE_LEN: usize = 1;

/// Number of payload bytes in a Word-protocol data phase.
pub const SMBUS_PROTO_WORD_LEN: usize = 2;

/// Short annotation label for a start condition.
pub const SMBUS_SHORT_START: &str = "S";

/// Short annotation label for a stop condition.
pub const SMBUS_SHORT_STOP: &str = "P";

/// Short annotation label suffix for acknowledge symbols.
pub const SMBUS_SHORT_ACK: &str = "A";

/// Short annotation label suffix for not-acknowledge symbols.
pub const SMBUS_SHORT_NACK: &str = "N";

/// Short annotation label suffix appended to repeated-phase symbols.
pub const SMBUS_SHORT_REPEAT_SUFFIX: char = 'r';
