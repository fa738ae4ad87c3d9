//! Relation document: the named, typed table described by an ARFF file.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::types::Cell;
use crate::error::{FormatError, Result};

static MISSING: Cell = Cell::Missing;

/// One row of data, positionally aligned with the attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Row {
    /// One cell per attribute.
    Dense(Vec<Cell>),
    /// Present cells by zero-based attribute index; absent indices are missing.
    Sparse(BTreeMap<usize, Cell>),
}

impl Row {
    /// Build a sparse row, dropping missing cells.
    pub fn sparse(cells: impl IntoIterator<Item = (usize, Cell)>) -> Self {
        Row::Sparse(
            cells
                .into_iter()
                .filter(|(_, cell)| !cell.is_missing())
                .collect(),
        )
    }

    /// Get the cell at an attribute index.
    ///
    /// Indices absent from a sparse row, or past the end of a dense one,
    /// read as missing.
    pub fn cell(&self, index: usize) -> &Cell {
        match self {
            Row::Dense(cells) => cells.get(index).unwrap_or(&MISSING),
            Row::Sparse(cells) => cells.get(&index).unwrap_or(&MISSING),
        }
    }

    /// Number of attributes this row claims to cover.
    ///
    /// Dense rows report their length, sparse rows their highest index + 1.
    pub fn width(&self) -> usize {
        match self {
            Row::Dense(cells) => cells.len(),
            Row::Sparse(cells) => cells.keys().next_back().map(|i| i + 1).unwrap_or(0),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Row::Sparse(_))
    }

    /// Convert to a dense row over `width` attributes.
    pub fn into_dense(self, width: usize) -> Vec<Cell> {
        match self {
            Row::Dense(cells) => cells,
            Row::Sparse(mut cells) => (0..width)
                .map(|i| cells.remove(&i).unwrap_or(Cell::Missing))
                .collect(),
        }
    }

    /// Convert to a sparse map, dropping missing cells.
    pub fn into_sparse(self) -> BTreeMap<usize, Cell> {
        match self {
            Row::Sparse(cells) => cells
                .into_iter()
                .filter(|(_, cell)| !cell.is_missing())
                .collect(),
            Row::Dense(cells) => cells
                .into_iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_missing())
                .collect(),
        }
    }
}

/// An ARFF relation: header metadata, attributes and rows.
///
/// Writing a document and parsing the text back yields an equal document,
/// with one exception: a sparse document with no rows reads back with
/// `is_sparse == false`, since the layout is only visible in data lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDocument {
    /// Name of the relation.
    pub relation_name: String,
    /// Attribute definitions, in column order.
    pub attributes: Vec<Attribute>,
    /// Data rows, aligned with `attributes`.
    pub rows: Vec<Row>,
    /// Whether the data section uses the sparse layout.
    pub is_sparse: bool,
    /// Header comments, without the leading `%`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl RelationDocument {
    /// Create an empty dense document.
    pub fn new(relation_name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation_name: relation_name.into(),
            attributes,
            rows: Vec::new(),
            is_sparse: false,
            comments: Vec::new(),
        }
    }

    /// Switch the data layout.
    pub fn with_sparse(mut self, is_sparse: bool) -> Self {
        self.is_sparse = is_sparse;
        self
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Append a row after checking it against the attribute count.
    ///
    /// The row is stored in the document's layout.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        let expected = self.attributes.len();
        match &row {
            Row::Dense(cells) if cells.len() != expected => {
                return Err(FormatError::FieldCount {
                    expected,
                    found: cells.len(),
                    data_line: self.rows.len() + 1,
                });
            }
            Row::Sparse(_) if row.width() > expected => {
                return Err(FormatError::missing(
                    None,
                    format!(
                        "sparse row {} references index {} but there are {} attributes",
                        self.rows.len() + 1,
                        row.width() - 1,
                        expected
                    ),
                ));
            }
            _ => {}
        }

        let row = if self.is_sparse {
            Row::Sparse(row.into_sparse())
        } else {
            Row::Dense(row.into_dense(expected))
        };
        self.rows.push(row);
        Ok(())
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Get all attribute names.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Names of numeric attributes.
    pub fn numeric_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.kind.is_numeric())
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Names of nominal attributes.
    pub fn nominal_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.kind.nominal_values().is_some())
            .map(|a| a.name.as_str())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find the first duplicated attribute name, if any.
    pub fn duplicate_attribute(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.attributes
            .iter()
            .map(|a| a.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}
