//! Fuzz target for column specs and rendered conversion commands.
//!
//! A spec that parses must render to text that parses back to itself.

#![no_main]

use arffcsv::{ColumnSpec, ConversionDirective};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(spec) = ColumnSpec::parse(data) {
        let rendered = spec.to_string();
        let reparsed = ColumnSpec::parse(&rendered);
        assert_eq!(reparsed.ok(), Some(spec), "spec did not survive: {}", rendered);
    }

    let _ = ConversionDirective::parse(data);
});
