#![no_main]
use libfuzzer_sys::fuzz_target;
use lzss_trace::bits::Bits;
use lzss_trace::lzss::decode;

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic or read past the end.
    let bits = Bits::from_bytes(data);
    let decoded = decode(&bits);
    assert!(decoded.summary.bits_consumed <= bits.len());
    assert!(decoded.tokens.iter().filter(|t| t.is_terminal()).count() <= 1);
});
