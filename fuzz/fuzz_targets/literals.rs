#![no_main]

use konst::constants::evaluator::literals;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Literal parsers must reject malformed text without panicking
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = literals::parse_long(s);
        let _ = literals::parse_floating(s);
        let _ = literals::parse_boolean(s);
        let _ = literals::parse_char(s);
    }
});
