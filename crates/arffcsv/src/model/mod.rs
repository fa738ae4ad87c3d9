//! Typed model of an ARFF relation: attributes, cells and rows.

mod attribute;
mod relation;
mod types;

pub use attribute::Attribute;
pub use relation::{RelationDocument, Row};
pub use types::{AttributeKind, Cell, DateValue, Value};

pub(crate) use types::format_number;
