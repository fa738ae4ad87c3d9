//! Command implementations.

pub mod arff2csv;
pub mod csv2arff;
pub mod info;

use arffcsv::analysis::parse_delimiter;

/// Parse a `--delimiter` argument into the byte the csv crate expects.
fn delimiter_byte(text: &str) -> Result<u8, Box<dyn std::error::Error>> {
    let c = parse_delimiter(text).map_err(|e| format!("Invalid delimiter '{}': {}", text, e))?;
    Ok(c as u8)
}

/// Truncate a value for table display.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
