//! ARFF writer.
//!
//! Produces text the parser reads back to an equal document: header
//! comments, `@RELATION`, one `@ATTRIBUTE` line per attribute, `@DATA`
//! and the rows in the document's layout.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::coercion::{quote_if_needed, CellCodec, CodecConfig};
use crate::error::{FormatError, Result};
use crate::model::{Attribute, AttributeKind, RelationDocument, Row};

/// Writer configuration.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Missing-value token and default date pattern.
    pub codec: CodecConfig,
    /// Emit header comments.
    pub include_comments: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            include_comments: true,
        }
    }
}

/// Serializes a [`RelationDocument`] as ARFF text.
pub struct ArffWriter {
    codec: CellCodec,
    include_comments: bool,
}

impl ArffWriter {
    /// Create a new writer with default configuration.
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    /// Create a writer with custom configuration.
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            codec: CellCodec::with_config(config.codec),
            include_comments: config.include_comments,
        }
    }

    /// Render a document to a string.
    pub fn write_string(&self, doc: &RelationDocument) -> Result<String> {
        let mut buf = Vec::new();
        self.write_inner(doc, &mut buf)
            .map_err(|e| with_path(e, Path::new("<string>")))?;
        String::from_utf8(buf).map_err(|e| FormatError::write(None, e.to_string()))
    }

    /// Write a document to any writer.
    pub fn write_to(&self, doc: &RelationDocument, out: impl Write) -> Result<()> {
        self.write_inner(doc, out)
            .map_err(|e| with_path(e, Path::new("<writer>")))
    }

    /// Write a document to a file, replacing any existing content.
    ///
    /// The whole document is rendered before the file is opened, so a
    /// document that fails to format leaves `path` untouched.
    pub fn write_file(&self, doc: &RelationDocument, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut buf = Vec::new();
        self.write_inner(doc, &mut buf)
            .map_err(|e| with_path(e, path))?;
        fs::write(path, &buf).map_err(|e| FormatError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), rows = doc.rows.len(), bytes = buf.len(), "wrote ARFF file");
        Ok(())
    }

    /// Check the document is structurally writable.
    fn validate(&self, doc: &RelationDocument) -> Result<()> {
        if doc.attributes.is_empty() {
            return Err(FormatError::write(None, "Relation has no attributes"));
        }
        if let Some(name) = doc.duplicate_attribute() {
            return Err(FormatError::write(
                None,
                format!("Duplicate attribute name '{}'", name),
            ));
        }
        for attribute in &doc.attributes {
            attribute
                .validate()
                .map_err(|e| FormatError::write(None, e.to_string()))?;
        }

        let width = doc.attributes.len();
        for (i, row) in doc.rows.iter().enumerate() {
            match row {
                Row::Dense(cells) if cells.len() != width => {
                    return Err(FormatError::write(
                        Some(i + 1),
                        format!("expected {} values, found {}", width, cells.len()),
                    ));
                }
                Row::Sparse(_) if row.width() > width => {
                    return Err(FormatError::write(
                        Some(i + 1),
                        format!(
                            "sparse index {} out of range ({} attributes)",
                            row.width() - 1,
                            width
                        ),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_inner(&self, doc: &RelationDocument, mut out: impl Write) -> WriteResult {
        self.validate(doc).map_err(WriteFailure::Format)?;
        let missing = self.codec.missing_value();

        if self.include_comments && !doc.comments.is_empty() {
            for comment in &doc.comments {
                if comment.is_empty() {
                    writeln!(out, "%")?;
                } else {
                    writeln!(out, "% {}", comment)?;
                }
            }
            writeln!(out)?;
        }

        writeln!(out, "@RELATION {}", quote_if_needed(&doc.relation_name, missing))?;
        writeln!(out)?;
        for attribute in &doc.attributes {
            writeln!(out, "{}", attribute_line(attribute, missing))?;
        }
        writeln!(out)?;
        writeln!(out, "@DATA")?;

        for (i, row) in doc.rows.iter().enumerate() {
            let line = if doc.is_sparse {
                self.sparse_line(doc, row)
            } else {
                self.dense_line(doc, row)
            }
            .map_err(|e| WriteFailure::Format(at_row(e, i + 1)))?;
            writeln!(out, "{}", line)?;
        }

        Ok(())
    }

    fn dense_line(&self, doc: &RelationDocument, row: &Row) -> Result<String> {
        let fields = doc
            .attributes
            .iter()
            .enumerate()
            .map(|(i, attr)| self.codec.format_cell(row.cell(i), attr))
            .collect::<Result<Vec<_>>>()?;
        Ok(fields.join(","))
    }

    fn sparse_line(&self, doc: &RelationDocument, row: &Row) -> Result<String> {
        let mut pairs = Vec::new();
        for (i, attr) in doc.attributes.iter().enumerate() {
            let cell = row.cell(i);
            if cell.is_missing() {
                continue;
            }
            pairs.push(format!("{} {}", i, self.codec.format_cell(cell, attr)?));
        }
        Ok(format!("{{{}}}", pairs.join(", ")))
    }
}

impl Default for ArffWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an `@ATTRIBUTE` line.
fn attribute_line(attribute: &Attribute, missing: &str) -> String {
    let name = quote_if_needed(&attribute.name, missing);
    let spec = match &attribute.kind {
        AttributeKind::Nominal { values } => {
            let values: Vec<_> = values
                .iter()
                .map(|v| quote_if_needed(v, missing))
                .collect();
            format!("{{{}}}", values.join(","))
        }
        AttributeKind::Date { format: Some(format) } => {
            format!("DATE '{}'", format.replace('\\', "\\\\").replace('\'', "\\'"))
        }
        kind => kind.to_string(),
    };
    format!("@ATTRIBUTE {} {}", name, spec)
}

/// Failure while streaming: either a document fault or an IO fault
/// that still needs its path.
enum WriteFailure {
    Format(FormatError),
    Io(std::io::Error),
}

impl From<std::io::Error> for WriteFailure {
    fn from(e: std::io::Error) -> Self {
        WriteFailure::Io(e)
    }
}

type WriteResult = std::result::Result<(), WriteFailure>;

fn with_path(failure: WriteFailure, path: &Path) -> FormatError {
    match failure {
        WriteFailure::Format(e) => e,
        WriteFailure::Io(e) => FormatError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Report a cell-level failure against its 1-based data row.
fn at_row(error: FormatError, row: usize) -> FormatError {
    match error {
        FormatError::InvalidAttribute {
            attribute,
            value,
            message,
            ..
        } => FormatError::write(
            Some(row),
            format!("invalid value '{}' for attribute '{}': {}", value, attribute, message),
        ),
        other => other,
    }
}
