//! Fuzz target for delimited table reading and type analysis.

#![no_main]

use arffcsv::{TableReader, TypeAnalyzer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(table) = TableReader::new().read_bytes(data) {
        let _ = TypeAnalyzer::new().analyze(&table);
    }
});
