#![no_main]

use libfuzzer_sys::fuzz_target;
use smbus_rs::{decode_trace, parse_trace};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Parsing must never panic, whatever the line content
        let _ = parse_trace(text);

        // A parseable trace must decode through both layers without panicking
        let _ = decode_trace(text, false);
        let _ = decode_trace(text, true);
    }
});
