//! The pmbus module contains the components responsible for Layer-2
//! decoding: the command registry and the command semantics state machine
//! that assembles typed values from the data and response phases.

pub mod command;
pub mod decoder;

pub use command::*;
pub use decoder::*;

/// Immutable descriptor for a single PMBus command opcode.
pub use command::CommandDescriptor;

/// The Layer-2 command semantics state machine.
pub use decoder::PmBusDecoder;
