#![no_main]
use libfuzzer_sys::fuzz_target;
use lzss_trace::lzss::trace_hex;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = trace_hex(text);
    }
});
