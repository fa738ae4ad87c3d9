//! arffcsv: convert between delimited tables and ARFF.
//!
//! ARFF is the attribute-relation file format used by machine-learning
//! toolkits: a relation name, a typed attribute list and a data section,
//! dense or sparse. This crate parses and writes ARFF, and infers ARFF
//! attribute types for untyped CSV/TSV tables.
//!
//! # Core Principles
//!
//! - **Lossless**: a parsed document writes back to text that parses to the same document
//! - **Strict**: malformed input fails with the line, attribute and offending text
//! - **Advisory inference**: analysis proposes types and a re-runnable command, it never converts silently
//!
//! # Example
//!
//! ```no_run
//! use arffcsv::{Converter, CsvToArffOptions};
//!
//! let converter = Converter::new();
//! let report = converter.analyze_csv("weather.csv").unwrap();
//! println!("{}", report.suggested_command);
//!
//! let options = CsvToArffOptions {
//!     analyze: true,
//!     ..Default::default()
//! };
//! let doc = converter.csv_to_arff("weather.csv", "weather.arff", &options).unwrap();
//! println!("Rows: {}", doc.row_count());
//! ```

pub mod analysis;
pub mod arff;
pub mod coercion;
pub mod error;
pub mod model;
pub mod table;

mod converter;

pub use crate::converter::{ArffToCsvOptions, Converter, ConverterConfig, CsvToArffOptions};
pub use analysis::{
    AnalysisReport, AnalyzerConfig, ColumnAnalysis, ColumnSpec, ConversionDirective,
    DirectiveOptions, InferenceRule, TypeAnalyzer,
};
pub use arff::{ArffParser, ArffWriter, ParserConfig, WriterConfig};
pub use coercion::{format_cell, parse_cell, CellCodec, CodecConfig};
pub use error::{ErrorKind, FormatError, Result};
pub use model::{Attribute, AttributeKind, Cell, DateValue, RelationDocument, Row, Value};
pub use table::{DataTable, TableConfig, TableReader, TableWriter};
