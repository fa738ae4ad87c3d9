//! In-memory delimited table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};

/// Represents parsed tabular data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Build a comma-delimited table from string slices.
    pub fn from_rows<H, R>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator,
        <R::Item as IntoIterator>::Item: Into<String>,
    {
        Self::new(
            headers.into_iter().map(Into::into).collect(),
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            b',',
        )
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// First duplicated header, if any.
    pub fn duplicate_header(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.headers
            .iter()
            .map(|h| h.as_str())
            .find(|h| !seen.insert(*h))
    }

    /// Copy of the table without the named columns.
    ///
    /// Every name must exist; unknown names are reported together.
    pub fn without_columns(&self, names: &[String]) -> Result<DataTable> {
        let unknown: Vec<&str> = names
            .iter()
            .filter(|n| self.column_index(n).is_none())
            .map(|n| n.as_str())
            .collect();
        if !unknown.is_empty() {
            return Err(FormatError::csv(
                None,
                format!("Exclude columns not found in CSV: {}", unknown.join(", ")),
            ));
        }

        let keep: Vec<usize> = (0..self.column_count())
            .filter(|&i| !names.contains(&self.headers[i]))
            .collect();

        Ok(DataTable {
            headers: keep.iter().map(|&i| self.headers[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    keep.iter()
                        .map(|&i| row.get(i).cloned().unwrap_or_default())
                        .collect()
                })
                .collect(),
            delimiter: self.delimiter,
        })
    }

    /// Keep only the first `limit` rows.
    pub fn head(&self, limit: usize) -> DataTable {
        DataTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
            delimiter: self.delimiter,
        }
    }
}
