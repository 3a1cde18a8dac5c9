//! # SMBus Transaction Framer
//!
//! Layer-1 decoder: converts the elementary bus symbol stream into the
//! SMBus transaction grammar, with sample-accurate boundaries. The machine
//! is push-based and synchronous: each input symbol is fully processed
//! before the next one is accepted, and every accepted transition emits
//! exactly one structured event paired with one display annotation.
//!
//! Malformed streams never fail the decoder. Any symbol that is not valid
//! for the current phase clears the transaction context and the machine
//! silently waits for the next start condition. Real captures contain
//! glitches, foreign devices, and truncation; halting on the first anomaly
//! would make the decoder useless on them.

use crate::constants::{SMBUS_ADDRESS_BIT_COUNT, SMBUS_DIRECTION_BIT_INDEX};
use crate::instrumentation::DecodeStats;
use crate::logging::{log_debug, log_warn};
use crate::pmbus::command::lookup_command;
use crate::smbus::symbol::{
    Access, Annotation, BitSpan, BusSymbol, FramedSymbol, SampleRange, SmBusEvent, SmBusSymbol,
};

/// The Layer-1 transaction framing state machine.
///
/// The current phase is the last accepted transaction symbol kind; `None`
/// is the idle state with the context cleared.
pub struct SmBusFramer {
    pec: bool,
    phase: Option<SmBusSymbol>,
    address: Option<u8>,
    access: Option<Access>,
    bits: Option<Vec<BitSpan>>,
    stats: DecodeStats,
}

impl SmBusFramer {
    /// Creates a new framer. `pec` declares whether transfers are expected
    /// to carry a trailing packet-error-check byte; the framing grammar is
    /// unchanged by it (a PEC byte frames exactly like a data byte) and the
    /// flag is honored by the command semantics layer.
    pub fn new(pec: bool) -> Self {
        SmBusFramer {
            pec,
            phase: None,
            address: None,
            access: None,
            bits: None,
            stats: DecodeStats::new(),
        }
    }

    /// Whether transfers are expected to include a trailing PEC byte.
    pub fn pec(&self) -> bool {
        self.pec
    }

    /// Counters collected by this instance.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Processes one bus symbol and returns the framed output records for
    /// every transition it triggered, oldest first.
    pub fn process(&mut self, symbol: &BusSymbol) -> Vec<FramedSymbol> {
        self.stats.symbols_consumed += 1;

        if let BusSymbol::Bits { bits, .. } = symbol {
            self.record_bits(bits);
            return Vec::new();
        }

        use SmBusSymbol::*;
        let mut out = Vec::new();
        match (self.phase, symbol) {
            (None | Some(Stop), BusSymbol::Start { range }) => {
                self.clear();
                self.emit(Start, *range, None, &mut out);
            }
            (None | Some(Stop), _) => self.clear(),

            (Some(Start), BusSymbol::AddressRead { range, byte }) => {
                self.emit_address(*range, *byte, Access::Read, false, &mut out);
            }
            (Some(Start), BusSymbol::AddressWrite { range, byte }) => {
                self.emit_address(*range, *byte, Access::Write, false, &mut out);
            }

            (Some(Direction), BusSymbol::Ack { range }) => {
                self.emit(AddressAck, *range, None, &mut out);
            }
            (Some(Direction), BusSymbol::Nack { range }) => {
                self.emit(AddressNack, *range, None, &mut out);
            }

            // Quick command: address and direction only, no data phase.
            (Some(AddressAck), BusSymbol::Stop { range }) => self.emit_stop(*range, &mut out),
            (Some(AddressAck), BusSymbol::DataWrite { range, byte })
            | (Some(AddressAck), BusSymbol::DataRead { range, byte }) => {
                self.emit(Command, *range, Some(*byte), &mut out);
            }
            (Some(AddressNack), BusSymbol::Stop { range }) => self.emit_stop(*range, &mut out),

            (Some(Command), BusSymbol::Ack { range }) => {
                self.emit(CommandAck, *range, None, &mut out);
            }
            (Some(Command), BusSymbol::Nack { range }) => {
                self.emit(CommandNack, *range, None, &mut out);
            }

            // Send byte: a lone command byte in the write direction.
            (Some(CommandAck), BusSymbol::Stop { range })
                if self.access == Some(Access::Write) =>
            {
                self.emit_stop(*range, &mut out);
            }
            (Some(CommandAck), BusSymbol::DataWrite { range, byte })
            | (Some(CommandAck), BusSymbol::DataRead { range, byte }) => {
                self.emit(Data, *range, Some(*byte), &mut out);
            }
            (Some(CommandAck), BusSymbol::StartRepeat { range }) => {
                self.emit(StartRepeat, *range, None, &mut out);
            }
            // Receive byte: terminal only in the read direction.
            (Some(CommandNack), BusSymbol::Stop { range })
                if self.access == Some(Access::Read) =>
            {
                self.emit_stop(*range, &mut out);
            }

            (Some(Data), BusSymbol::Ack { range }) => self.emit(DataAck, *range, None, &mut out),
            (Some(Data), BusSymbol::Nack { range }) => self.emit(DataNack, *range, None, &mut out),

            (Some(DataAck), BusSymbol::Stop { range }) if self.access == Some(Access::Write) => {
                self.emit_stop(*range, &mut out);
            }
            (Some(DataAck), BusSymbol::DataWrite { range, byte })
            | (Some(DataAck), BusSymbol::DataRead { range, byte }) => {
                self.emit(Data, *range, Some(*byte), &mut out);
            }
            (Some(DataAck), BusSymbol::StartRepeat { range }) => {
                self.emit(StartRepeat, *range, None, &mut out);
            }
            (Some(DataNack), BusSymbol::Stop { range }) => self.emit_stop(*range, &mut out),

            // The repeated address must match the latched one; a mismatch
            // falls through to the resynchronizing default arm.
            (Some(StartRepeat), BusSymbol::AddressRead { range, byte })
                if self.address == Some(*byte) =>
            {
                self.emit_address(*range, *byte, Access::Read, true, &mut out);
            }
            (Some(StartRepeat), BusSymbol::AddressWrite { range, byte })
                if self.address == Some(*byte) =>
            {
                self.emit_address(*range, *byte, Access::Write, true, &mut out);
            }

            (Some(DirectionRepeat), BusSymbol::Ack { range }) => {
                self.emit(ResponseAck, *range, None, &mut out);
            }

            (Some(ResponseAck), BusSymbol::DataRead { range, byte })
            | (Some(ResponseAck), BusSymbol::DataWrite { range, byte }) => {
                self.emit(Response, *range, Some(*byte), &mut out);
            }
            (Some(ResponseAck), BusSymbol::Stop { range }) => self.emit_stop(*range, &mut out),

            (Some(Response), BusSymbol::Ack { range }) => {
                self.emit(ResponseAck, *range, None, &mut out);
            }
            (Some(Response), BusSymbol::Nack { range }) => {
                self.emit(ResponseNack, *range, None, &mut out);
            }

            (Some(ResponseNack), BusSymbol::Stop { range }) => self.emit_stop(*range, &mut out),

            _ => self.resync(symbol),
        }
        out
    }

    /// Latches the per-bit timing of the byte that follows. Bit records
    /// only matter directly after a (repeated) start condition, where they
    /// provide the spans of the address and direction bits.
    fn record_bits(&mut self, bits: &[BitSpan]) {
        if matches!(self.phase, Some(SmBusSymbol::Start | SmBusSymbol::StartRepeat)) {
            self.bits = Some(bits.to_vec());
        } else {
            self.bits = None;
        }
    }

    /// Reports the address byte and its trailing direction bit as two
    /// back-to-back symbols derived from one physical byte.
    fn emit_address(
        &mut self,
        range: SampleRange,
        byte: u8,
        kind_access: Access,
        repeated: bool,
        out: &mut Vec<FramedSymbol>,
    ) {
        let bits = self.bits.take();
        let (addr_range, dir_range, dir_bit) = match bits.as_deref() {
            Some(b) if b.len() == SMBUS_ADDRESS_BIT_COUNT => (
                SampleRange::new(b[7].range.start, b[1].range.end),
                b[SMBUS_DIRECTION_BIT_INDEX].range,
                b[SMBUS_DIRECTION_BIT_INDEX].value,
            ),
            // No usable bit record: fall back to the byte's own span and
            // take the direction from the symbol kind.
            _ => (range, range, kind_access as u8),
        };

        self.address = Some(byte);
        self.access = Some(Access::from_bit(dir_bit));

        let (addr_kind, dir_kind) = if repeated {
            (SmBusSymbol::AddressRepeat, SmBusSymbol::DirectionRepeat)
        } else {
            (SmBusSymbol::Address, SmBusSymbol::Direction)
        };
        self.emit(addr_kind, addr_range, Some(byte), out);
        self.emit(dir_kind, dir_range, Some(dir_bit), out);
    }

    fn emit(
        &mut self,
        kind: SmBusSymbol,
        range: SampleRange,
        data: Option<u8>,
        out: &mut Vec<FramedSymbol>,
    ) {
        self.phase = Some(kind);
        let annotation = self.annotate(kind, range, data);
        out.push(FramedSymbol {
            event: SmBusEvent {
                symbol: kind,
                range,
                data,
            },
            annotation,
        });
    }

    fn emit_stop(&mut self, range: SampleRange, out: &mut Vec<FramedSymbol>) {
        self.emit(SmBusSymbol::Stop, range, None, out);
        self.stats.transactions_completed += 1;
    }

    /// Builds the annotation for a transition, applying the direction and
    /// command-name substitutions.
    fn annotate(&mut self, kind: SmBusSymbol, range: SampleRange, data: Option<u8>) -> Annotation {
        match kind {
            SmBusSymbol::Direction | SmBusSymbol::DirectionRepeat => {
                let access = Access::from_bit(data.unwrap_or(0));
                Annotation::new(
                    kind,
                    range,
                    access.label().to_string(),
                    access.short().to_string(),
                )
            }
            SmBusSymbol::Command => {
                let opcode = data.unwrap_or(0);
                match lookup_command(opcode) {
                    Some(desc) => Annotation::new(
                        kind,
                        range,
                        desc.name.to_string(),
                        desc.name[..1].to_string(),
                    ),
                    None => {
                        self.stats.unknown_commands += 1;
                        log_warn(&format!("Unrecognized command opcode: 0x{opcode:02X}"));
                        Annotation::generic(kind, range, data)
                    }
                }
            }
            _ => Annotation::generic(kind, range, data),
        }
    }

    /// Protocol violation: discard the offending symbol, clear the context,
    /// and wait for the next start condition.
    fn resync(&mut self, symbol: &BusSymbol) {
        log_debug(&format!(
            "Protocol violation in phase {:?} at samples {:?}; resynchronizing",
            self.phase,
            symbol.range()
        ));
        self.stats.resyncs += 1;
        self.clear();
    }

    fn clear(&mut self) {
        self.phase = None;
        self.address = None;
        self.access = None;
        self.bits = None;
    }
}
