//! Delimited table input and output.

mod reader;
mod source;
mod writer;

pub use reader::{TableConfig, TableReader};
pub use source::DataTable;
pub use writer::TableWriter;
