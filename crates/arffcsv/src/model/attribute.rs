//! Attribute definition.

use serde::{Deserialize, Serialize};

use super::types::AttributeKind;
use crate::error::{FormatError, Result};

/// Typed description of one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within a relation.
    pub name: String,
    /// Declared kind and its metadata.
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Numeric)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Integer)
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Real)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::String)
    }

    pub fn nominal<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            AttributeKind::Nominal {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn date(name: impl Into<String>, format: Option<&str>) -> Self {
        Self::new(
            name,
            AttributeKind::Date {
                format: format.map(str::to_string),
            },
        )
    }

    /// Check the attribute's own invariants.
    ///
    /// The name must be non-empty; a nominal set must be non-empty with
    /// unique values.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(FormatError::parse(None, "Attribute name is empty"));
        }

        if let AttributeKind::Nominal { values } = &self.kind {
            if values.is_empty() {
                return Err(FormatError::parse_found(
                    None,
                    format!("Nominal attribute '{}' has no values", self.name),
                    "{}",
                ));
            }
            for (i, value) in values.iter().enumerate() {
                if values[..i].contains(value) {
                    return Err(FormatError::parse_found(
                        None,
                        format!("Duplicate nominal value in attribute '{}'", self.name),
                        value.clone(),
                    ));
                }
            }
        }

        Ok(())
    }
}
