//! # smbus-rs - A Rust Crate for SMBus/PMBus Protocol Decoding
//!
//! The smbus-rs crate decodes byte-level serial bus traffic into a layered
//! sequence of protocol events. Two cascaded streaming state machines turn
//! an elementary bus symbol stream (bit/byte framing already resolved) into
//! SMBus transaction framing and, on top of that, PMBus command semantics.
//!
//! ## Features
//!
//! - Frame elementary bus symbols into the SMBus transaction grammar with
//!   sample-accurate boundaries
//! - Recover deterministically from protocol violations without failing the
//!   pipeline
//! - Resolve command opcodes against an immutable PMBus registry
//! - Assemble multi-byte values per protocol type: single byte,
//!   little-endian word, and length-prefixed block payloads
//! - Parse line-oriented bus symbol traces for offline decoding
//! - Support for logging, statistics, and error handling
//!
//! ## Usage
//!
//! ```rust
//! use smbus_rs::{decode_trace, PmBusOutput};
//!
//! let trace = "S 0 9\nAW 10 89 40\nA 90 99\nP 100 109\n";
//! let outputs = decode_trace(trace, false).unwrap();
//! assert!(matches!(outputs.last(), Some(PmBusOutput::Symbol { .. })));
//! ```

pub mod constants;
pub mod error;
pub mod instrumentation;
pub mod logging;
pub mod pmbus;
pub mod smbus;
pub mod trace;
pub mod util;

pub use crate::error::SmBusError;
pub use crate::logging::{init_logger, log_info};

// Core symbol and event types
pub use smbus::symbol::{
    Access, Annotation, BitSpan, BusSymbol, FramedSymbol, SampleRange, SmBusEvent, SmBusSymbol,
};

// Layer-1 transaction framing
pub use smbus::framer::SmBusFramer;

// Layer-2 command semantics
pub use pmbus::command::{lookup_command, CommandDescriptor, Protocol};
pub use pmbus::decoder::{AssembledValue, PmBusDecoder, PmBusOutput, Value};

// Trace input and instrumentation
pub use instrumentation::DecodeStats;
pub use trace::parse_trace;

/// Frame a textual bus symbol trace through Layer 1 only.
///
/// # Arguments
/// * `text` - Trace in the format described by the [`trace`] module
/// * `pec` - Whether transfers are expected to carry a trailing PEC byte
///
/// # Returns
/// * `Ok(Vec<FramedSymbol>)` - Framed transaction symbols, oldest first
/// * `Err(SmBusError)` - Trace parsing failed
pub fn frame_trace(text: &str, pec: bool) -> Result<Vec<FramedSymbol>, SmBusError> {
    let symbols = parse_trace(text)?;
    let mut framer = SmBusFramer::new(pec);
    let mut framed = Vec::new();
    for symbol in &symbols {
        framed.extend(framer.process(symbol));
    }
    Ok(framed)
}

/// Decode a textual bus symbol trace through both layers.
///
/// # Arguments
/// * `text` - Trace in the format described by the [`trace`] module
/// * `pec` - Whether transfers are expected to carry a trailing PEC byte
///
/// # Returns
/// * `Ok(Vec<PmBusOutput>)` - Command-level output records, oldest first
/// * `Err(SmBusError)` - Trace parsing failed
pub fn decode_trace(text: &str, pec: bool) -> Result<Vec<PmBusOutput>, SmBusError> {
    let symbols = parse_trace(text)?;
    let mut framer = SmBusFramer::new(pec);
    let mut decoder = PmBusDecoder::new(pec);
    let mut outputs = Vec::new();
    for symbol in &symbols {
        for framed in framer.process(symbol) {
            outputs.extend(decoder.process(&framed.event));
        }
    }
    Ok(outputs)
}
