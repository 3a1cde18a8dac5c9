//! The smbus module contains the components responsible for Layer-1
//! decoding: the shared symbol definitions and the transaction framing
//! state machine.

pub mod framer;
pub mod symbol;

pub use framer::*;
pub use symbol::*;

/// The Layer-1 transaction framing state machine.
pub use framer::SmBusFramer;

/// The 21 transaction symbol kinds of the SMBus grammar.
pub use symbol::SmBusSymbol;
