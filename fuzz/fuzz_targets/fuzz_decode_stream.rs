#![no_main]

use libfuzzer_sys::fuzz_target;
use smbus_rs::{BitSpan, BusSymbol, PmBusDecoder, SampleRange, SmBusFramer};

fn symbol_from(selector: u8, byte: u8, index: u64) -> BusSymbol {
    let range = SampleRange::new(index * 100, index * 100 + 99);
    match selector % 10 {
        0 => BusSymbol::Start { range },
        1 => BusSymbol::StartRepeat { range },
        2 => BusSymbol::Stop { range },
        3 => BusSymbol::Ack { range },
        4 => BusSymbol::Nack { range },
        5 => BusSymbol::AddressRead { range, byte },
        6 => BusSymbol::AddressWrite { range, byte },
        7 => BusSymbol::DataRead { range, byte },
        8 => BusSymbol::DataWrite { range, byte },
        _ => {
            // bit count deliberately varies so the missing/short record
            // fallback path gets exercised too
            let bits = (0..(byte % 12))
                .map(|i| BitSpan {
                    value: (byte >> (i % 8)) & 1,
                    range: SampleRange::new(range.start + u64::from(i) * 8, range.start + u64::from(i) * 8 + 7),
                })
                .collect();
            BusSymbol::Bits { range, bits }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut framer = SmBusFramer::new(data.len() % 2 == 0);
    let mut decoder = PmBusDecoder::new(data.len() % 2 == 0);
    for (index, pair) in data.chunks(2).enumerate() {
        let selector = pair[0];
        let byte = pair.get(1).copied().unwrap_or(0);
        let symbol = symbol_from(selector, byte, index as u64);
        for framed in framer.process(&symbol) {
            let _ = decoder.process(&framed.event);
        }
    }
});
