//! End-to-end scenarios: textual traces through trace parsing, transaction
//! framing, and command semantics, checking the rendered annotations.

use smbus_rs::{decode_trace, frame_trace, PmBusOutput, SampleRange, SmBusError, Value};

fn annotations(outputs: &[PmBusOutput]) -> Vec<(String, String)> {
    outputs
        .iter()
        .map(|o| match o {
            PmBusOutput::Symbol { annotation, .. } | PmBusOutput::Value { annotation, .. } => {
                (annotation.long.clone(), annotation.short.clone())
            }
        })
        .collect()
}

/// Write byte to VOUT_MODE: the assembled value is anchored to the data
/// symbol that carried it.
#[test]
fn test_vout_mode_write_scenario() {
    let trace = "\
S  0 9
AW 10 89 40
A  90 99
DW 100 179 20
A  180 189
DW 190 269 17
A  270 279
P  280 289
";
    let outputs = decode_trace(trace, false).unwrap();
    let value = outputs
        .iter()
        .find_map(|o| match o {
            PmBusOutput::Value { value, annotation } => Some((value, annotation)),
            _ => None,
        })
        .unwrap();
    assert_eq!(value.0.value, Value::Byte(0x17));
    assert_eq!(value.0.range, SampleRange::new(190, 269));
    assert_eq!(value.1.long, "VOUT_MODE Write: 17");

    assert_eq!(
        annotations(&outputs),
        vec![
            ("Start".to_string(), "S".to_string()),
            ("Address: 40".to_string(), "A".to_string()),
            ("Write".to_string(), "W".to_string()),
            ("Address ack".to_string(), "A".to_string()),
            ("VOUT_MODE Command".to_string(), "C".to_string()),
            ("Command ack".to_string(), "A".to_string()),
            ("VOUT_MODE Write: 17".to_string(), "B".to_string()),
            ("Data ack".to_string(), "A".to_string()),
            ("Stop".to_string(), "P".to_string()),
        ]
    );
}

/// Read word from STATUS_WORD through a repeated start.
#[test]
fn test_status_word_read_scenario() {
    let trace = "\
S  0 9
AW 10 89 40
A  90 99
DW 100 179 79
A  180 189
Sr 190 199
AR 200 279 40
A  280 289
DR 290 369 40
A  370 379
DR 380 459 00
N  460 469
P  470 479
";
    let outputs = decode_trace(trace, false).unwrap();
    let value = outputs
        .iter()
        .find_map(|o| match o {
            PmBusOutput::Value { value, annotation } => Some((value, annotation)),
            _ => None,
        })
        .unwrap();
    assert_eq!(value.0.value, Value::Word(0x0040));
    assert_eq!(value.0.range, SampleRange::new(290, 459));
    assert_eq!(value.1.long, "STATUS_WORD Read: 0040");
}

/// Block read of MFR_REVISION: length prefix excluded from the payload.
#[test]
fn test_mfr_revision_block_read_scenario() {
    let trace = "\
S  0 9
AW 10 89 40
A  90 99
DW 100 179 9B
A  180 189
Sr 190 199
AR 200 279 40
A  280 289
DR 290 369 02
A  370 379
DR 380 459 AA
A  460 469
DR 470 549 BB
N  550 559
P  560 569
";
    let outputs = decode_trace(trace, false).unwrap();
    let values: Vec<_> = outputs
        .iter()
        .filter_map(|o| match o {
            PmBusOutput::Value { value, annotation } => Some((value.value, annotation.long.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        values,
        vec![
            (Value::BlockLength(2), "Block read length: 02".to_string()),
            (Value::BlockByte(0xAA), "AA".to_string()),
            (Value::BlockByte(0xBB), "BB".to_string()),
        ]
    );
}

/// A glitched fragment before a valid transaction does not prevent the
/// valid one from decoding.
#[test]
fn test_decoding_recovers_after_glitch() {
    let trace = "\
S  0 9
P  10 19
DW 20 99 55
S  100 109
AW 110 189 40
A  190 199
P  200 209
";
    let outputs = decode_trace(trace, false).unwrap();
    let longs: Vec<_> = annotations(&outputs).into_iter().map(|(l, _)| l).collect();
    assert!(longs.ends_with(&[
        "Start".to_string(),
        "Address: 40".to_string(),
        "Write".to_string(),
        "Address ack".to_string(),
        "Stop".to_string(),
    ]));
}

/// Bit records flow through the whole pipeline and give the address and
/// direction their bit-accurate spans.
#[test]
fn test_bit_record_spans_through_framing() {
    let trace = "\
S  0 9
B  10 89 0@10..19,1@20..29,0@30..39,0@40..49,0@50..59,0@60..69,0@70..79,0@80..89
AW 10 89 40
A  90 99
P  100 109
";
    let framed = frame_trace(trace, false).unwrap();
    let address = &framed[1];
    let direction = &framed[2];
    // bits 7..1 for the address, bit 0 for the direction
    assert_eq!(address.event.range, SampleRange::new(10, 79));
    assert_eq!(direction.event.range, SampleRange::new(80, 89));
    assert_eq!(direction.annotation.long, "Write");
}

/// Malformed trace text is a parse error, not a decode-level condition.
#[test]
fn test_malformed_trace_is_a_parse_error() {
    let err = decode_trace("S 0 9\nbogus\n", false).unwrap_err();
    assert!(matches!(err, SmBusError::TraceParseError(_)));
}

/// Output records serialize to JSON for machine consumption.
#[test]
fn test_outputs_serialize_to_json() {
    let trace = "S 0 9\nAW 10 89 40\nA 90 99\nP 100 109\n";
    let outputs = decode_trace(trace, false).unwrap();
    let json = serde_json::to_string(&outputs).unwrap();
    assert!(json.contains("\"Stop\""));
}
