//! # PMBus Command Registry
//!
//! Immutable mapping from one-byte command opcodes to their canonical name
//! and SMBus protocol type. Built once at first use and read-only for the
//! lifetime of the process, so concurrent decoder instances can share it
//! without synchronization.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Shape of a command's data phase: how many data/response bytes are
/// consumed and how they combine into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Protocol {
    Quick,
    Command,
    Byte,
    Word,
    ProcessCall,
    Block,
    BlockProcessCall,
    HostNotify,
    Bits32,
    Bits64,
    MfrDefined,
}

impl Protocol {
    /// Fixed payload byte count for value assembly, where one exists.
    /// `Block` is length-prefixed and handled separately.
    pub fn value_len(&self) -> Option<usize> {
        match self {
            Protocol::Quick | Protocol::Command => Some(0),
            Protocol::Byte => Some(crate::constants::SMBUS_PROTO_BYTE_LEN),
            Protocol::Word => Some(crate::constants::SMBUS_PROTO_WORD_LEN),
            _ => None,
        }
    }
}

/// Immutable descriptor for a single PMBus command opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub opcode: u8,
    pub name: &'static str,
    pub protocol: Protocol,
}

const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { opcode: 0x00, name: "PAGE", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x03, name: "CLEAR_FAULTS", protocol: Protocol::Command },
    CommandDescriptor { opcode: 0x10, name: "WRITE_PROTECT", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x19, name: "CAPABILITY", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x20, name: "VOUT_MODE", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x3A, name: "FAN_CONFIG_1_2", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x3B, name: "FAN_COMMAND_1", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x40, name: "VOUT_OV_FAULT_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x42, name: "VOUT_OV_WARN_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x43, name: "VOUT_UV_WARN_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x44, name: "VOUT_UV_FAULT_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x4F, name: "OT_FAULT_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x51, name: "OT_WARN_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x52, name: "UT_WARN_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x53, name: "UT_FAULT_LIMIT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x79, name: "STATUS_WORD", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x7A, name: "STATUS_VOUT", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x7B, name: "STATUS_IOUT", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x7D, name: "STATUS_TEMPERATURE", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x7E, name: "STATUS_CML", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x7F, name: "STATUS_OTHER", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x80, name: "STATUS_MFR_SPECIFIC", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x81, name: "STATUS_FANS_1_2", protocol: Protocol::Byte },
    CommandDescriptor { opcode: 0x8B, name: "READ_VOUT", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x8D, name: "READ_TEMPERATURE_1", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x90, name: "READ_FAN_SPEED_1", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x91, name: "READ_FAN_SPEED_2", protocol: Protocol::Word },
    CommandDescriptor { opcode: 0x9B, name: "MFR_REVISION", protocol: Protocol::Block },
    CommandDescriptor { opcode: 0xD9, name: "MFR_SPECIFIC_09", protocol: Protocol::MfrDefined },
    CommandDescriptor { opcode: 0xF1, name: "MFR_SPECIFIC_33", protocol: Protocol::MfrDefined },
    CommandDescriptor { opcode: 0xFF, name: "PMBUS_COMMAND_EXT", protocol: Protocol::MfrDefined },
];

static COMMAND_TABLE: Lazy<HashMap<u8, &'static CommandDescriptor>> =
    Lazy::new(|| COMMANDS.iter().map(|desc| (desc.opcode, desc)).collect());

/// Resolve a command opcode against the registry.
///
/// Unknown opcodes return `None`; callers report them as an unrecognized
/// command condition rather than failing.
pub fn lookup_command(opcode: u8) -> Option<&'static CommandDescriptor> {
    COMMAND_TABLE.get(&opcode).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_commands() {
        let vout_mode = lookup_command(0x20).unwrap();
        assert_eq!(vout_mode.name, "VOUT_MODE");
        assert_eq!(vout_mode.protocol, Protocol::Byte);

        let status_word = lookup_command(0x79).unwrap();
        assert_eq!(status_word.name, "STATUS_WORD");
        assert_eq!(status_word.protocol, Protocol::Word);

        let mfr_revision = lookup_command(0x9B).unwrap();
        assert_eq!(mfr_revision.name, "MFR_REVISION");
        assert_eq!(mfr_revision.protocol, Protocol::Block);
    }

    #[test]
    fn test_lookup_unknown_opcode() {
        assert!(lookup_command(0x21).is_none());
    }

    #[test]
    fn test_value_lengths() {
        assert_eq!(Protocol::Byte.value_len(), Some(1));
        assert_eq!(Protocol::Word.value_len(), Some(2));
        assert_eq!(Protocol::Command.value_len(), Some(0));
        assert_eq!(Protocol::Block.value_len(), None);
        assert_eq!(Protocol::ProcessCall.value_len(), None);
    }
}
