//! # PMBus Command Semantics Decoder
//!
//! Layer-2 decoder: consumes the framer's transaction symbol stream,
//! resolves the command byte against the registry, and assembles the data
//! and response phases into typed values according to the command's
//! protocol type.
//!
//! Value assembly rules:
//! - Byte: one payload byte, closed by the data ack (write) or the
//!   response nack (read).
//! - Word: two payload bytes, little endian — `(second << 8) | first`.
//! - Block (read): the first response byte is a length field, excluded
//!   from the payload; following bytes are rendered one at a time, and the
//!   terminal annotation on the response nack covers the most recent byte.
//! - Quick/Command: no data phase, completion is the stop condition.
//! - Every other protocol type is reported as unsupported and the context
//!   is dropped; the framer stream above is unaffected.
//!
//! With the PEC option enabled, payload bytes in excess of the protocol's
//! expected count are relabeled as the packet-error-check byte; the
//! checksum itself is not verified.

use crate::error::SmBusError;
use crate::instrumentation::DecodeStats;
use crate::logging::{log_debug, log_warn};
use crate::pmbus::command::{lookup_command, CommandDescriptor, Protocol};
use crate::smbus::symbol::{Access, Annotation, SampleRange, SmBusEvent, SmBusSymbol};
use crate::util::hex::{format_byte, format_word};
use serde::Serialize;

/// A value assembled from one or more payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Value {
    /// Single-byte value.
    Byte(u8),
    /// Little-endian 16-bit value.
    Word(u16),
    /// Block read length prefix (not payload).
    BlockLength(u8),
    /// One block payload byte.
    BlockByte(u8),
}

/// A resolved, typed value with its command context and sample anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssembledValue {
    pub opcode: u8,
    pub command: Option<&'static CommandDescriptor>,
    pub access: Access,
    pub range: SampleRange,
    pub value: Value,
}

/// Output records of the semantics layer, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PmBusOutput {
    /// A framing-level symbol passed through with this layer's labeling.
    Symbol {
        event: SmBusEvent,
        annotation: Annotation,
    },
    /// An assembled value anchored to the payload bytes that produced it.
    Value {
        value: AssembledValue,
        annotation: Annotation,
    },
}

/// Mutable per-transaction state, owned exclusively by one decoder
/// instance and cleared atomically at every reset point.
#[derive(Debug, Default)]
struct TransactionContext {
    phase: Option<SmBusSymbol>,
    address: Option<u8>,
    access: Option<Access>,
    opcode: Option<u8>,
    command: Option<&'static CommandDescriptor>,
    data: Vec<(SampleRange, u8)>,
    response: Vec<(SampleRange, u8)>,
}

impl TransactionContext {
    fn clear(&mut self) {
        *self = TransactionContext::default();
    }

    fn protocol(&self) -> Option<Protocol> {
        self.command.map(|desc| desc.protocol)
    }
}

/// The Layer-2 command semantics state machine.
pub struct PmBusDecoder {
    pec: bool,
    ctx: TransactionContext,
    stats: DecodeStats,
}

impl PmBusDecoder {
    pub fn new(pec: bool) -> Self {
        PmBusDecoder {
            pec,
            ctx: TransactionContext::default(),
            stats: DecodeStats::new(),
        }
    }

    /// Counters collected by this instance.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Processes one framed transaction symbol and returns the output
    /// records it triggered, oldest first.
    pub fn process(&mut self, event: &SmBusEvent) -> Vec<PmBusOutput> {
        self.stats.symbols_consumed += 1;

        use SmBusSymbol::*;
        let mut out = Vec::new();
        let range = event.range;
        let data = event.data;
        match (self.ctx.phase, event.symbol) {
            (None | Some(Stop), Start) => {
                self.ctx.clear();
                self.pass(Start, range, None, &mut out);
            }
            (None | Some(Stop), _) => self.ctx.clear(),

            (Some(Start), Address) => {
                self.ctx.address = data;
                self.pass(Address, range, data, &mut out);
            }
            (Some(Address), Direction) => {
                self.ctx.access = Some(Access::from_bit(data.unwrap_or(0)));
                self.pass(Direction, range, data, &mut out);
            }
            (Some(Direction), AddressAck) => self.pass(AddressAck, range, None, &mut out),
            (Some(Direction), AddressNack) => self.pass(AddressNack, range, None, &mut out),

            (Some(AddressAck), Stop) => self.pass_stop(range, &mut out),
            (Some(AddressAck), Command) => {
                let opcode = data.unwrap_or(0);
                self.ctx.opcode = Some(opcode);
                self.ctx.command = lookup_command(opcode);
                self.pass(Command, range, data, &mut out);
            }
            (Some(AddressNack), Stop) => self.pass_stop(range, &mut out),

            (Some(Command), CommandAck) => self.pass(CommandAck, range, None, &mut out),
            (Some(Command), CommandNack) => self.pass(CommandNack, range, None, &mut out),

            (Some(CommandAck), Stop) if self.ctx.access == Some(Access::Write) => {
                self.pass_stop(range, &mut out);
            }
            (Some(CommandAck), Data) | (Some(DataAck), Data) => {
                self.buffer_data(range, data.unwrap_or(0), &mut out);
            }
            (Some(CommandAck), StartRepeat) | (Some(DataAck), StartRepeat) => {
                self.pass(StartRepeat, range, data, &mut out);
            }
            (Some(CommandNack), Stop) if self.ctx.access == Some(Access::Read) => {
                self.pass_stop(range, &mut out);
            }

            (Some(Data), DataAck) => self.close_data_ack(range, &mut out),
            (Some(Data), DataNack) => self.pass(DataNack, range, None, &mut out),
            (Some(DataAck), Stop) => self.pass_stop(range, &mut out),
            (Some(DataNack), Stop) => self.pass_stop(range, &mut out),

            (Some(StartRepeat), AddressRepeat) if self.ctx.address == data => {
                self.pass(AddressRepeat, range, data, &mut out);
            }
            (Some(AddressRepeat), DirectionRepeat) => {
                self.ctx.access = Some(Access::from_bit(data.unwrap_or(0)));
                self.pass(DirectionRepeat, range, data, &mut out);
            }
            (Some(DirectionRepeat), ResponseAck) => self.pass(ResponseAck, range, None, &mut out),

            (Some(ResponseAck), Response) => {
                self.buffer_response(range, data.unwrap_or(0), &mut out);
            }
            (Some(ResponseAck), Stop) => self.pass_stop(range, &mut out),

            (Some(Response), ResponseAck) => self.close_response_ack(range, &mut out),
            (Some(Response), ResponseNack) => self.close_response_nack(range, &mut out),
            (Some(ResponseNack), Stop) => self.pass_stop(range, &mut out),

            (Some(Pec), DataAck) | (Some(Pec), ResponseAck) => {
                self.pass(PecAck, range, None, &mut out);
            }
            (Some(Pec), DataNack) | (Some(Pec), ResponseNack) => {
                self.pass(PecNack, range, None, &mut out);
            }
            (Some(PecAck), Stop) | (Some(PecNack), Stop) => self.pass_stop(range, &mut out),

            _ => self.resync(event),
        }
        out
    }

    /// Buffers a write-phase payload byte, or relabels it as the PEC byte
    /// once the protocol's expected count is already satisfied.
    fn buffer_data(&mut self, range: SampleRange, byte: u8, out: &mut Vec<PmBusOutput>) {
        let expected = self.ctx.protocol().and_then(|proto| proto.value_len());
        if self.pec && expected.map_or(false, |n| self.ctx.data.len() >= n) {
            self.pass(SmBusSymbol::Pec, range, Some(byte), out);
        } else {
            self.ctx.data.push((range, byte));
            self.ctx.phase = Some(SmBusSymbol::Data);
        }
    }

    /// Buffers a read-phase payload byte, or relabels it as the PEC byte.
    /// For block reads the expected count is the length prefix plus the
    /// payload bytes it announces.
    fn buffer_response(&mut self, range: SampleRange, byte: u8, out: &mut Vec<PmBusOutput>) {
        let expected = match self.ctx.protocol() {
            Some(Protocol::Block) => self
                .ctx
                .response
                .first()
                .map(|&(_, len)| 1 + len as usize),
            Some(proto) => proto.value_len(),
            None => None,
        };
        if self.pec && expected.map_or(false, |n| self.ctx.response.len() >= n) {
            self.pass(SmBusSymbol::Pec, range, Some(byte), out);
        } else {
            self.ctx.response.push((range, byte));
            self.ctx.phase = Some(SmBusSymbol::Response);
        }
    }

    /// Handles the ack that closes a write-phase byte: emits the assembled
    /// value once the full byte count is buffered, keeps buffering before
    /// that, and reports unsupported protocol types.
    fn close_data_ack(&mut self, range: SampleRange, out: &mut Vec<PmBusOutput>) {
        if self.ctx.access != Some(Access::Write) {
            self.resync_phase("data ack outside a write transfer");
            return;
        }
        match self.ctx.protocol() {
            Some(Protocol::Byte) => {
                if self.ctx.data.len() == 1 {
                    let (vrange, byte) = self.ctx.data[0];
                    self.emit_value(Value::Byte(byte), vrange, out);
                }
            }
            Some(Protocol::Word) => {
                if self.ctx.data.len() == 2 {
                    let (lo_range, lo) = self.ctx.data[0];
                    let (hi_range, hi) = self.ctx.data[1];
                    let word = (u16::from(hi) << 8) | u16::from(lo);
                    let vrange = SampleRange::new(lo_range.start, hi_range.end);
                    self.emit_value(Value::Word(word), vrange, out);
                }
            }
            _ => {
                self.report_unsupported();
                return;
            }
        }
        self.pass(SmBusSymbol::DataAck, range, None, out);
    }

    /// Handles the ack that closes a read-phase byte. Block reads render
    /// the length prefix and each payload byte as they arrive; fixed-size
    /// protocols finalize here only when a PEC byte will absorb the
    /// closing nack.
    fn close_response_ack(&mut self, range: SampleRange, out: &mut Vec<PmBusOutput>) {
        if self.ctx.access == Some(Access::Read) {
            match self.ctx.protocol() {
                Some(Protocol::Block) => {
                    if self.ctx.response.len() == 1 {
                        let (lrange, len) = self.ctx.response[0];
                        self.emit_value(Value::BlockLength(len), lrange, out);
                    } else if let Some(&(brange, byte)) = self.ctx.response.last() {
                        self.emit_value(Value::BlockByte(byte), brange, out);
                    }
                }
                Some(Protocol::Byte) if self.pec && self.ctx.response.len() == 1 => {
                    let (vrange, byte) = self.ctx.response[0];
                    self.emit_value(Value::Byte(byte), vrange, out);
                }
                Some(Protocol::Word) if self.pec && self.ctx.response.len() == 2 => {
                    let (lo_range, lo) = self.ctx.response[0];
                    let (hi_range, hi) = self.ctx.response[1];
                    let word = (u16::from(hi) << 8) | u16::from(lo);
                    let vrange = SampleRange::new(lo_range.start, hi_range.end);
                    self.emit_value(Value::Word(word), vrange, out);
                }
                _ => {}
            }
        }
        self.pass(SmBusSymbol::ResponseAck, range, None, out);
    }

    /// Handles the nack that terminates the read phase: finalizes the
    /// assembled value for fixed-size protocols, labels the most recent
    /// byte for block reads, and reports unsupported protocol types.
    fn close_response_nack(&mut self, range: SampleRange, out: &mut Vec<PmBusOutput>) {
        if self.ctx.access != Some(Access::Read) {
            self.resync_phase("response nack outside a read transfer");
            return;
        }
        match self.ctx.protocol() {
            Some(Protocol::Byte) => {
                if self.ctx.response.len() == 1 {
                    let (vrange, byte) = self.ctx.response[0];
                    self.emit_value(Value::Byte(byte), vrange, out);
                }
            }
            Some(Protocol::Word) => {
                if self.ctx.response.len() == 2 {
                    let (lo_range, lo) = self.ctx.response[0];
                    let (hi_range, hi) = self.ctx.response[1];
                    let word = (u16::from(hi) << 8) | u16::from(lo);
                    let vrange = SampleRange::new(lo_range.start, hi_range.end);
                    self.emit_value(Value::Word(word), vrange, out);
                }
            }
            Some(Protocol::Block) => {
                if let Some(&(brange, byte)) = self.ctx.response.last() {
                    self.emit_value(Value::BlockByte(byte), brange, out);
                }
            }
            _ => {
                self.report_unsupported();
                return;
            }
        }
        self.pass(SmBusSymbol::ResponseNack, range, None, out);
    }

    fn emit_value(&mut self, value: Value, range: SampleRange, out: &mut Vec<PmBusOutput>) {
        let access = self.ctx.access.unwrap_or(Access::Write);
        let command = self.ctx.command;
        let opcode = self.ctx.opcode.unwrap_or(0);
        let name = command.map_or("UNKNOWN", |desc| desc.name);
        let (symbol, long, short) = match (access, value) {
            (_, Value::BlockLength(len)) => (
                SmBusSymbol::Response,
                format!("Block read length: {}", format_byte(len)),
                "L",
            ),
            (_, Value::BlockByte(byte)) => (SmBusSymbol::Response, format_byte(byte), "R"),
            (Access::Write, Value::Byte(byte)) => (
                SmBusSymbol::Data,
                format!("{name} Write: {}", format_byte(byte)),
                "B",
            ),
            (Access::Read, Value::Byte(byte)) => (
                SmBusSymbol::Response,
                format!("{name} Read: {}", format_byte(byte)),
                "B",
            ),
            (Access::Write, Value::Word(word)) => (
                SmBusSymbol::Data,
                format!("{name} Write: {}", format_word(word)),
                "W",
            ),
            (Access::Read, Value::Word(word)) => (
                SmBusSymbol::Response,
                format!("{name} Read: {}", format_word(word)),
                "W",
            ),
        };
        out.push(PmBusOutput::Value {
            value: AssembledValue {
                opcode,
                command,
                access,
                range,
                value,
            },
            annotation: Annotation::new(symbol, range, long, short.to_string()),
        });
    }

    fn pass(
        &mut self,
        kind: SmBusSymbol,
        range: SampleRange,
        data: Option<u8>,
        out: &mut Vec<PmBusOutput>,
    ) {
        self.ctx.phase = Some(kind);
        let annotation = self.annotate(kind, range, data);
        out.push(PmBusOutput::Symbol {
            event: SmBusEvent {
                symbol: kind,
                range,
                data,
            },
            annotation,
        });
    }

    fn pass_stop(&mut self, range: SampleRange, out: &mut Vec<PmBusOutput>) {
        self.pass(SmBusSymbol::Stop, range, None, out);
        self.stats.transactions_completed += 1;
    }

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
            SmBusSymbol::Command => match self.ctx.command {
                Some(desc) => {
                    Annotation::new(kind, range, format!("{} Command", desc.name), "C".to_string())
                }
                None => {
                    self.stats.unknown_commands += 1;
                    log_warn(&format!(
                        "{}",
                        SmBusError::UnknownCommand(data.unwrap_or(0))
                    ));
                    Annotation::generic(kind, range, data)
                }
            },
            _ => Annotation::generic(kind, range, data),
        }
    }

    /// Unsupported protocol type for value assembly: reported and dropped.
    /// Only this layer's context is reset; the framer keeps emitting
    /// well-formed transaction symbols.
    fn report_unsupported(&mut self) {
        let opcode = self.ctx.opcode.unwrap_or(0);
        let err = match self.ctx.command {
            Some(desc) => SmBusError::UnsupportedProtocol {
                opcode,
                protocol: desc.protocol,
            },
            None => SmBusError::UnknownCommand(opcode),
        };
        log_warn(&format!("{err}; dropping transaction context"));
        self.stats.unsupported_protocols += 1;
        self.ctx.clear();
    }

    fn resync(&mut self, event: &SmBusEvent) {
        log_debug(&format!(
            "Symbol {:?} not valid in phase {:?}; resynchronizing",
            event.symbol, self.ctx.phase
        ));
        self.stats.resyncs += 1;
        self.ctx.clear();
    }

    fn resync_phase(&mut self, reason: &str) {
        log_debug(&format!("{reason}; resynchronizing"));
        self.stats.resyncs += 1;
        self.ctx.clear();
    }
}
