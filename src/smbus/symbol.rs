//! # SMBus Symbol Definitions
//!
//! This module defines the data model shared by both decoder layers: the
//! elementary bus symbols produced by the upstream bit/byte framing decoder,
//! the 21 transaction symbol kinds of the SMBus grammar, and the structured
//! event / display annotation records both layers emit.
//!
//! Symbol ordinals and label conventions follow the SMBus annotation table:
//! 'S' for start, 'P' for stop, 'A'/'N' for ack/nack symbols, a trailing
//! 'r' for repeated-phase symbols, otherwise the first letter of the kind.

use serde::Serialize;

/// A half-open sample span `(start, end)` in capture sample numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleRange {
    pub start: u64,
    pub end: u64,
}

impl SampleRange {
    pub fn new(start: u64, end: u64) -> Self {
        SampleRange { start, end }
    }
}

/// Per-bit timing record: bit value plus the samples it occupied on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitSpan {
    pub value: u8,
    pub range: SampleRange,
}

/// Elementary bus symbol delivered by the upstream framing decoder.
///
/// Address and data symbols carry the payload byte; a `Bits` record carries
/// the per-bit timing of the byte that follows it, ordered LSB first
/// (index 0 is the direction bit of an address byte).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BusSymbol {
    Start { range: SampleRange },
    StartRepeat { range: SampleRange },
    Stop { range: SampleRange },
    Ack { range: SampleRange },
    Nack { range: SampleRange },
    Bits { range: SampleRange, bits: Vec<BitSpan> },
    AddressRead { range: SampleRange, byte: u8 },
    AddressWrite { range: SampleRange, byte: u8 },
    DataRead { range: SampleRange, byte: u8 },
    DataWrite { range: SampleRange, byte: u8 },
}

impl BusSymbol {
    /// The sample span covered by this symbol.
    pub fn range(&self) -> SampleRange {
        match self {
            BusSymbol::Start { range }
            | BusSymbol::StartRepeat { range }
            | BusSymbol::Stop { range }
            | BusSymbol::Ack { range }
            | BusSymbol::Nack { range }
            | BusSymbol::Bits { range, .. }
            | BusSymbol::AddressRead { range, .. }
            | BusSymbol::AddressWrite { range, .. }
            | BusSymbol::DataRead { range, .. }
            | BusSymbol::DataWrite { range, .. } => *range,
        }
    }
}

/// Access direction of a transaction, taken from the low bit of the
/// physical address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Access {
    Write = 0,
    Read = 1,
}

impl Access {
    /// Derive the direction from the address byte's direction bit.
    pub fn from_bit(bit: u8) -> Self {
        if bit & crate::constants::SMBUS_DIRECTION_READ != 0 {
            Access::Read
        } else {
            Access::Write
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Access::Write => "Write",
            Access::Read => "Read",
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            Access::Write => "W",
            Access::Read => "R",
        }
    }
}

/// The 21 transaction symbol kinds of the SMBus grammar, in ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SmBusSymbol {
    Start = 0,
    Address = 1,
    Direction = 2,
    AddressAck = 3,
    AddressNack = 4,
    Command = 5,
    CommandAck = 6,
    CommandNack = 7,
    Data = 8,
    DataAck = 9,
    DataNack = 10,
    StartRepeat = 11,
    AddressRepeat = 12,
    DirectionRepeat = 13,
    Response = 14,
    ResponseAck = 15,
    ResponseNack = 16,
    Stop = 17,
    Pec = 18,
    PecAck = 19,
    PecNack = 20,
}

impl SmBusSymbol {
    /// Stable ordinal used on the structured event stream.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Human-readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            SmBusSymbol::Start => "Start",
            SmBusSymbol::Address => "Address",
            SmBusSymbol::Direction => "Direction",
            SmBusSymbol::AddressAck => "Address ack",
            SmBusSymbol::AddressNack => "Address nack",
            SmBusSymbol::Command => "Command",
            SmBusSymbol::CommandAck => "Command ack",
            SmBusSymbol::CommandNack => "Command nack",
            SmBusSymbol::Data => "Data",
            SmBusSymbol::DataAck => "Data ack",
            SmBusSymbol::DataNack => "Data nack",
            SmBusSymbol::StartRepeat => "Start repeat",
            SmBusSymbol::AddressRepeat => "Address repeat",
            SmBusSymbol::DirectionRepeat => "Direction repeat",
            SmBusSymbol::Response => "Response",
            SmBusSymbol::ResponseAck => "Response ack",
            SmBusSymbol::ResponseNack => "Response nack",
            SmBusSymbol::Stop => "Stop",
            SmBusSymbol::Pec => "Pec",
            SmBusSymbol::PecAck => "Pec ack",
            SmBusSymbol::PecNack => "Pec nack",
        }
    }

    /// Long annotation label: the kind name, with the payload byte appended
    /// in two-digit hex when present.
    pub fn label(&self, data: Option<u8>) -> String {
        match data {
            Some(byte) => format!("{}: {byte:02X}", self.name()),
            None => self.name().to_string(),
        }
    }

    /// Short annotation label following the fixed convention.
    pub fn short(&self) -> String {
        use SmBusSymbol::*;
        match self {
            Stop => crate::constants::SMBUS_SHORT_STOP.to_string(),
            Start => crate::constants::SMBUS_SHORT_START.to_string(),
            AddressAck | CommandAck | DataAck | ResponseAck | PecAck => {
                crate::constants::SMBUS_SHORT_ACK.to_string()
            }
            AddressNack | CommandNack | DataNack | ResponseNack | PecNack => {
                crate::constants::SMBUS_SHORT_NACK.to_string()
            }
            StartRepeat | AddressRepeat | DirectionRepeat => {
                let first = self.name().chars().next().unwrap_or('?');
                format!("{first}{}", crate::constants::SMBUS_SHORT_REPEAT_SUFFIX)
            }
            _ => self.name().chars().next().unwrap_or('?').to_string(),
        }
    }
}

/// Structured event record: one per accepted transition, suitable for
/// machine consumption by further layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SmBusEvent {
    pub symbol: SmBusSymbol,
    pub range: SampleRange,
    pub data: Option<u8>,
}

/// Display annotation record: long label plus short abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub symbol: SmBusSymbol,
    pub range: SampleRange,
    pub long: String,
    pub short: String,
}

impl Annotation {
    pub fn new(symbol: SmBusSymbol, range: SampleRange, long: String, short: String) -> Self {
        Annotation {
            symbol,
            range,
            long,
            short,
        }
    }

    /// Default label pair for a symbol kind, before direction or command
    /// name substitution.
    pub fn generic(symbol: SmBusSymbol, range: SampleRange, data: Option<u8>) -> Self {
        Annotation::new(symbol, range, symbol.label(data), symbol.short())
    }
}

/// Paired output of the framer: one structured event and one annotation
/// per accepted transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FramedSymbol {
    pub event: SmBusEvent,
    pub annotation: Annotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_labels() {
        assert_eq!(SmBusSymbol::Start.short(), "S");
        assert_eq!(SmBusSymbol::Stop.short(), "P");
        assert_eq!(SmBusSymbol::AddressAck.short(), "A");
        assert_eq!(SmBusSymbol::DataNack.short(), "N");
        assert_eq!(SmBusSymbol::StartRepeat.short(), "Sr");
        assert_eq!(SmBusSymbol::AddressRepeat.short(), "Ar");
        assert_eq!(SmBusSymbol::DirectionRepeat.short(), "Dr");
        assert_eq!(SmBusSymbol::Command.short(), "C");
        assert_eq!(SmBusSymbol::Response.short(), "R");
        assert_eq!(SmBusSymbol::Pec.short(), "P");
    }

    #[test]
    fn test_long_labels() {
        assert_eq!(SmBusSymbol::Start.label(None), "Start");
        assert_eq!(SmBusSymbol::Data.label(Some(0x17)), "Data: 17");
        assert_eq!(SmBusSymbol::AddressAck.label(None), "Address ack");
    }

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(SmBusSymbol::Start.ordinal(), 0);
        assert_eq!(SmBusSymbol::Data.ordinal(), 8);
        assert_eq!(SmBusSymbol::Stop.ordinal(), 17);
        assert_eq!(SmBusSymbol::PecNack.ordinal(), 20);
        assert_eq!(
            SmBusSymbol::PecNack.ordinal() as usize + 1,
            crate::constants::SMBUS_SYMBOL_KIND_COUNT
        );
    }

    #[test]
    fn test_access_from_bit() {
        assert_eq!(Access::from_bit(0), Access::Write);
        assert_eq!(Access::from_bit(1), Access::Read);
    }
}
