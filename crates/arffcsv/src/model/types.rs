//! Core type definitions for attribute kinds and cell values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Declared kind of an attribute, with kind-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Floating-point numbers.
    Numeric,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers declared as `REAL`.
    Real,
    /// Free text.
    String,
    /// One label out of a fixed, ordered set.
    Nominal { values: Vec<String> },
    /// Date/time values, with an optional pattern.
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
}

impl AttributeKind {
    /// Returns true if this kind holds numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AttributeKind::Numeric | AttributeKind::Integer | AttributeKind::Real
        )
    }

    /// Lowercase kind keyword, as used in column specs.
    pub fn keyword(&self) -> &'static str {
        match self {
            AttributeKind::Numeric => "numeric",
            AttributeKind::Integer => "integer",
            AttributeKind::Real => "real",
            AttributeKind::String => "string",
            AttributeKind::Nominal { .. } => "nominal",
            AttributeKind::Date { .. } => "date",
        }
    }

    /// Nominal value set, if any.
    pub fn nominal_values(&self) -> Option<&[String]> {
        match self {
            AttributeKind::Nominal { values } => Some(values),
            _ => None,
        }
    }

    /// Date pattern, if any.
    pub fn date_format(&self) -> Option<&str> {
        match self {
            AttributeKind::Date { format } => format.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword().to_uppercase())
    }
}

/// A date cell: the text as written plus its decomposed value when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<NaiveDateTime>,
}

impl DateValue {
    pub fn new(text: impl Into<String>, parsed: Option<NaiveDateTime>) -> Self {
        Self {
            text: text.into(),
            parsed,
        }
    }
}

/// A typed, present value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Numeric or real.
    Number(f64),
    Integer(i64),
    Text(String),
    /// A label that belongs to its attribute's nominal set.
    Nominal(String),
    Date(DateValue),
}

/// A single cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Missing,
    Typed(Value),
}

impl Cell {
    pub fn number(value: f64) -> Self {
        Cell::Typed(Value::Number(value))
    }

    pub fn integer(value: i64) -> Self {
        Cell::Typed(Value::Integer(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Typed(Value::Text(value.into()))
    }

    pub fn nominal(value: impl Into<String>) -> Self {
        Cell::Typed(Value::Nominal(value.into()))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Get the value, or None if missing.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Missing => None,
            Cell::Typed(v) => Some(v),
        }
    }

    /// Render the cell as plain text, without ARFF quoting.
    ///
    /// Used when emitting table output, where the table writer owns quoting.
    pub fn to_plain_string(&self, missing: &str) -> String {
        match self {
            Cell::Missing => missing.to_string(),
            Cell::Typed(Value::Number(n)) => format_number(*n),
            Cell::Typed(Value::Integer(i)) => i.to_string(),
            Cell::Typed(Value::Text(s)) | Cell::Typed(Value::Nominal(s)) => s.clone(),
            Cell::Typed(Value::Date(d)) => d.text.clone(),
        }
    }
}

/// Format a float with the shortest text that reads back to the same value.
///
/// Whole numbers keep a trailing `.0` so they stay distinguishable from integers.
pub(crate) fn format_number(value: f64) -> String {
    format!("{:?}", value)
}
