//! # Bus Symbol Trace Parsing
//!
//! This module parses the line-oriented textual trace format used to feed
//! captured bus traffic into the decoders, leveraging the `nom` crate for
//! reliable parsing.
//!
//! One bus symbol per line, `#` starts a comment:
//!
//! ```text
//! # start, sample span 0..9
//! S  0 9
//! B  10 89 1@10..19,0@20..29,0@30..39,0@40..49,0@50..59,0@60..69,0@70..79,0@80..89
//! AW 10 89 40
//! A  90 99
//! DW 100 179 20
//! A  180 189
//! P  200 209
//! ```
//!
//! Mnemonics: `S` start, `Sr` repeated start, `P` stop, `A` ack, `N` nack,
//! `B` per-bit timing (wire order, MSB first), `AW`/`AR` address byte with
//! write/read direction, `DW`/`DR` data byte. Payload bytes are hex; sample
//! numbers are decimal.

use crate::error::SmBusError;
use crate::smbus::symbol::{BitSpan, BusSymbol, SampleRange};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map, map_res},
    multi::separated_list1,
    sequence::{preceded, separated_pair, tuple},
    IResult,
};

fn decimal(input: &str) -> IResult<&str, u64> {
    map_res(digit1, str::parse::<u64>)(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while1(|c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16),
    )(input)
}

fn sample_range(input: &str) -> IResult<&str, SampleRange> {
    map(separated_pair(decimal, space1, decimal), |(start, end)| {
        SampleRange::new(start, end)
    })(input)
}

/// One per-bit record: `value@start..end`.
fn bit_span(input: &str) -> IResult<&str, BitSpan> {
    map(
        tuple((decimal, char('@'), decimal, tag(".."), decimal)),
        |(value, _, start, _, end)| BitSpan {
            value: value as u8,
            range: SampleRange::new(start, end),
        },
    )(input)
}

fn bit_list(input: &str) -> IResult<&str, Vec<BitSpan>> {
    separated_list1(char(','), bit_span)(input)
}

/// Bit records are written in wire order (MSB first); the decoders index
/// them LSB first, with index 0 holding the direction bit.
fn into_lsb_first(mut bits: Vec<BitSpan>) -> Vec<BitSpan> {
    bits.reverse();
    bits
}

fn bus_symbol(input: &str) -> IResult<&str, BusSymbol> {
    alt((
        map(
            preceded(tuple((tag("Sr"), space1)), sample_range),
            |range| BusSymbol::StartRepeat { range },
        ),
        map(
            preceded(
                tuple((tag("AW"), space1)),
                tuple((sample_range, space1, hex_byte)),
            ),
            |(range, _, byte)| BusSymbol::AddressWrite { range, byte },
        ),
        map(
            preceded(
                tuple((tag("AR"), space1)),
                tuple((sample_range, space1, hex_byte)),
            ),
            |(range, _, byte)| BusSymbol::AddressRead { range, byte },
        ),
        map(
            preceded(
                tuple((tag("DW"), space1)),
                tuple((sample_range, space1, hex_byte)),
            ),
            |(range, _, byte)| BusSymbol::DataWrite { range, byte },
        ),
        map(
            preceded(
                tuple((tag("DR"), space1)),
                tuple((sample_range, space1, hex_byte)),
            ),
            |(range, _, byte)| BusSymbol::DataRead { range, byte },
        ),
        map(
            preceded(
                tuple((tag("B"), space1)),
                tuple((sample_range, space1, bit_list)),
            ),
            |(range, _, bits)| BusSymbol::Bits {
                range,
                bits: into_lsb_first(bits),
            },
        ),
        map(preceded(tuple((tag("S"), space1)), sample_range), |range| {
            BusSymbol::Start { range }
        }),
        map(preceded(tuple((tag("P"), space1)), sample_range), |range| {
            BusSymbol::Stop { range }
        }),
        map(preceded(tuple((tag("A"), space1)), sample_range), |range| {
            BusSymbol::Ack { range }
        }),
        map(preceded(tuple((tag("N"), space1)), sample_range), |range| {
            BusSymbol::Nack { range }
        }),
    ))(input)
}

/// Parses a complete trace into an ordered sequence of bus symbols.
pub fn parse_trace(text: &str) -> Result<Vec<BusSymbol>, SmBusError> {
    let mut symbols = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        match all_consuming(bus_symbol)(line) {
            Ok((_, symbol)) => symbols.push(symbol),
            Err(err) => {
                return Err(SmBusError::TraceParseError(format!(
                    "line {}: {err}",
                    lineno + 1
                )))
            }
        }
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_symbols() {
        let symbols = parse_trace("S 0 9\nA 10 19\nP 20 29\n").unwrap();
        assert_eq!(
            symbols,
            vec![
                BusSymbol::Start {
                    range: SampleRange::new(0, 9)
                },
                BusSymbol::Ack {
                    range: SampleRange::new(10, 19)
                },
                BusSymbol::Stop {
                    range: SampleRange::new(20, 29)
                },
            ]
        );
    }

    #[test]
    fn test_parse_address_and_data() {
        let symbols = parse_trace("AW 10 89 40\nDR 100 179 ab\n").unwrap();
        assert_eq!(
            symbols[0],
            BusSymbol::AddressWrite {
                range: SampleRange::new(10, 89),
                byte: 0x40
            }
        );
        assert_eq!(
            symbols[1],
            BusSymbol::DataRead {
                range: SampleRange::new(100, 179),
                byte: 0xAB
            }
        );
    }

    #[test]
    fn test_parse_bits_reverses_to_lsb_first() {
        let symbols =
            parse_trace("B 0 79 1@0..9,0@10..19,0@20..29,0@30..39,0@40..49,0@50..59,0@60..69,1@70..79\n")
                .unwrap();
        match &symbols[0] {
            BusSymbol::Bits { bits, .. } => {
                assert_eq!(bits.len(), 8);
                // index 0 is the last bit on the wire (the direction bit)
                assert_eq!(bits[0].value, 1);
                assert_eq!(bits[0].range, SampleRange::new(70, 79));
                assert_eq!(bits[7].value, 1);
                assert_eq!(bits[7].range, SampleRange::new(0, 9));
            }
            other => panic!("expected bits record, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let symbols = parse_trace("# header\n\nS 0 9 # trailing comment\n").unwrap();
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse_trace("S 0 9\nXX 1 2\n").unwrap_err();
        match err {
            SmBusError::TraceParseError(msg) => assert!(msg.starts_with("line 2")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
