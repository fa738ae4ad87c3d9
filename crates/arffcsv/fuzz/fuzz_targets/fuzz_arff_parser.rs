//! Fuzz target for the ARFF parser.
//!
//! The parser must never panic, and anything it accepts must write back
//! to text that parses to the same document.

#![no_main]

use arffcsv::{ArffParser, ArffWriter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parser = ArffParser::new();
    if let Ok(doc) = parser.parse_str(text) {
        if let Ok(written) = ArffWriter::new().write_string(&doc) {
            let reparsed = parser.parse_str(&written);
            assert!(reparsed.is_ok(), "written ARFF failed to parse:\n{}", written);
        }
    }
});
