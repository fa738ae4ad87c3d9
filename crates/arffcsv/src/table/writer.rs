//! Delimited table output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::source::DataTable;
use crate::error::{FormatError, Result};

/// Writes a [`DataTable`] as delimited text with a header row.
pub struct TableWriter {
    delimiter: u8,
}

impl TableWriter {
    /// Create a comma-delimited writer.
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Write a table to any writer.
    pub fn write_to(&self, table: &DataTable, out: impl Write) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(out);

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| FormatError::Csv(e.into()))?;
        Ok(())
    }

    /// Render a table to a string.
    pub fn write_string(&self, table: &DataTable) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(table, &mut buf)?;
        String::from_utf8(buf).map_err(|e| FormatError::csv(None, e.to_string()))
    }

    /// Write a table to a file, replacing any existing content.
    pub fn write_file(&self, table: &DataTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| FormatError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.write_to(table, file)?;
        debug!(path = %path.display(), rows = table.row_count(), "wrote table");
        Ok(())
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}
