//! ARFF reading and writing.

mod lexer;
mod parser;
mod writer;

pub use parser::{ArffParser, ParserConfig};
pub use writer::{ArffWriter, WriterConfig};
