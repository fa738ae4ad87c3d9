//! Value coercion between ARFF text and typed cells.

mod codec;
mod date;
mod quoting;

pub use codec::{format_cell, parse_cell, CellCodec, CodecConfig, DEFAULT_DATE_FORMAT, DEFAULT_MISSING};
pub use date::to_chrono_pattern;
pub use quoting::{quote_if_needed, unquote};
