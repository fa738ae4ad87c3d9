//! Per-kind parse and format of cell values.

use serde::{Deserialize, Serialize};

use super::date::{format_date, parse_date, to_chrono_pattern};
use super::quoting::{quote_if_needed, unquote};
use crate::error::{FormatError, Result};
use crate::model::{Attribute, AttributeKind, Cell, DateValue, Value};

/// Default missing-value token.
pub const DEFAULT_MISSING: &str = "?";

/// Default date pattern, used when a DATE attribute declares none.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd'T'HH:mm:ss";

/// Coercion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Token that stands for a missing value.
    pub missing_value: String,
    /// Pattern used for DATE attributes without their own.
    pub default_date_format: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            missing_value: DEFAULT_MISSING.to_string(),
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Converts between raw ARFF field text and typed cells.
#[derive(Debug, Clone, Default)]
pub struct CellCodec {
    config: CodecConfig,
}

impl CellCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with custom configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn missing_value(&self) -> &str {
        &self.config.missing_value
    }

    /// Parse a raw field, as it appears in ARFF text, against an attribute.
    ///
    /// The unquoted missing token and an unquoted empty field decode to
    /// `Missing`. Quoted text is unquoted first and is never missing.
    pub fn parse_cell(&self, raw: &str, attribute: &Attribute) -> Result<Cell> {
        let trimmed = raw.trim();
        match unquote(trimmed) {
            Some(text) => self.coerce_text(&text, attribute),
            None if trimmed.is_empty() || trimmed == self.config.missing_value => {
                Ok(Cell::Missing)
            }
            None => self.coerce_text(trimmed, attribute),
        }
    }

    /// Coerce already-unquoted text to a typed cell.
    ///
    /// No missing-value detection happens here.
    pub fn coerce_text(&self, text: &str, attribute: &Attribute) -> Result<Cell> {
        let value = match &attribute.kind {
            AttributeKind::Numeric | AttributeKind::Real => {
                let number = text.trim().parse::<f64>().map_err(|_| {
                    FormatError::invalid(&attribute.name, text, "not a valid floating-point number")
                })?;
                Value::Number(number)
            }
            AttributeKind::Integer => {
                let number = text.trim().parse::<i64>().map_err(|_| {
                    FormatError::invalid(&attribute.name, text, "not a valid base-10 integer")
                })?;
                Value::Integer(number)
            }
            AttributeKind::String => Value::Text(text.to_string()),
            AttributeKind::Nominal { values } => {
                if !values.iter().any(|v| v == text) {
                    return Err(FormatError::invalid(
                        &attribute.name,
                        text,
                        format!("not one of the allowed values {{{}}}", values.join(",")),
                    ));
                }
                Value::Nominal(text.to_string())
            }
            AttributeKind::Date { format } => {
                let pattern = format
                    .as_deref()
                    .unwrap_or(&self.config.default_date_format);
                let chrono_pattern = to_chrono_pattern(pattern);
                let parsed = parse_date(text.trim(), &chrono_pattern).ok_or_else(|| {
                    FormatError::parse_found(
                        None,
                        format!(
                            "Date value for attribute '{}' does not match pattern '{}'",
                            attribute.name, pattern
                        ),
                        text,
                    )
                })?;
                Value::Date(DateValue::new(format_date(&parsed, &chrono_pattern)?, Some(parsed)))
            }
        };

        Ok(Cell::Typed(value))
    }

    /// Format a cell as ARFF field text, quoting where needed.
    pub fn format_cell(&self, cell: &Cell, attribute: &Attribute) -> Result<String> {
        let missing = &self.config.missing_value;
        let value = match cell {
            Cell::Missing => return Ok(missing.clone()),
            Cell::Typed(value) => value,
        };

        let text = match (&attribute.kind, value) {
            (AttributeKind::Numeric | AttributeKind::Real, Value::Number(n)) => {
                crate::model::format_number(*n)
            }
            (AttributeKind::Integer, Value::Integer(i)) => i.to_string(),
            (AttributeKind::String, Value::Text(s)) => quote_if_needed(s, missing).into_owned(),
            (AttributeKind::Nominal { values }, Value::Nominal(label)) => {
                if !values.contains(label) {
                    return Err(FormatError::invalid(
                        &attribute.name,
                        label,
                        format!("not one of the allowed values {{{}}}", values.join(",")),
                    ));
                }
                quote_if_needed(label, missing).into_owned()
            }
            (AttributeKind::Date { .. }, Value::Date(date)) => {
                quote_if_needed(&date.text, missing).into_owned()
            }
            (kind, value) => {
                return Err(FormatError::invalid(
                    &attribute.name,
                    format!("{:?}", value),
                    format!("value does not match attribute kind {}", kind),
                ));
            }
        };

        Ok(text)
    }
}

/// Parse a raw ARFF field with the default configuration.
pub fn parse_cell(raw: &str, attribute: &Attribute) -> Result<Cell> {
    CellCodec::new().parse_cell(raw, attribute)
}

/// Format a cell as ARFF field text with the default configuration.
pub fn format_cell(cell: &Cell, attribute: &Attribute) -> Result<String> {
    CellCodec::new().format_cell(cell, attribute)
}
