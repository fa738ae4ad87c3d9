//! Error types for the arffcsv library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for conversion operations.
///
/// Every variant carries enough context (line or row, attribute name,
/// offending text) to locate the fault without re-scanning the input.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Malformed ARFF syntax, out-of-order directive, or unparseable type spec.
    #[error("ARFF parse error{}: {message}{}", fmt_line(.line), fmt_found(.found))]
    ArffParse {
        line: Option<usize>,
        message: String,
        found: Option<String>,
    },

    /// Structurally inconsistent relation document at write time.
    #[error("ARFF write error{}: {message}", fmt_row(.row))]
    ArffWrite { row: Option<usize>, message: String },

    /// Malformed table data reaching the converter.
    #[error("CSV parse error{}: {message}", fmt_row(.row))]
    CsvParse { row: Option<usize>, message: String },

    /// A value failed coercion against its declared attribute kind.
    #[error("Invalid value '{value}' for attribute '{attribute}'{}: {message}", fmt_line(.line))]
    InvalidAttribute {
        attribute: String,
        value: String,
        message: String,
        line: Option<usize>,
    },

    /// Required data is absent where the format mandates it.
    #[error("Missing data{}: {message}", fmt_line(.line))]
    MissingData { message: String, line: Option<usize> },

    /// A dense row whose field count disagrees with the attribute count.
    ///
    /// `data_line` is the 1-based position among data lines, which stays
    /// stable when comments or blank lines are inserted.
    #[error("Missing data at data line {data_line}: expected {expected} values, found {found}")]
    FieldCount {
        expected: usize,
        found: usize,
        data_line: usize,
    },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`FormatError`] for programmatic branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArffParse,
    ArffWrite,
    CsvParse,
    InvalidAttribute,
    MissingData,
    Io,
    Config,
}

impl FormatError {
    pub fn parse(line: Option<usize>, message: impl Into<String>) -> Self {
        FormatError::ArffParse {
            line,
            message: message.into(),
            found: None,
        }
    }

    pub fn parse_found(
        line: Option<usize>,
        message: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        FormatError::ArffParse {
            line,
            message: message.into(),
            found: Some(found.into()),
        }
    }

    pub fn write(row: Option<usize>, message: impl Into<String>) -> Self {
        FormatError::ArffWrite {
            row,
            message: message.into(),
        }
    }

    pub fn csv(row: Option<usize>, message: impl Into<String>) -> Self {
        FormatError::CsvParse {
            row,
            message: message.into(),
        }
    }

    pub fn missing(line: Option<usize>, message: impl Into<String>) -> Self {
        FormatError::MissingData {
            message: message.into(),
            line,
        }
    }

    pub fn invalid(
        attribute: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FormatError::InvalidAttribute {
            attribute: attribute.into(),
            value: value.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Get the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormatError::ArffParse { .. } => ErrorKind::ArffParse,
            FormatError::ArffWrite { .. } => ErrorKind::ArffWrite,
            FormatError::CsvParse { .. } | FormatError::Csv(_) => ErrorKind::CsvParse,
            FormatError::InvalidAttribute { .. } => ErrorKind::InvalidAttribute,
            FormatError::MissingData { .. } | FormatError::FieldCount { .. } => {
                ErrorKind::MissingData
            }
            FormatError::Io { .. } => ErrorKind::Io,
            FormatError::Json(_) | FormatError::Config(_) => ErrorKind::Config,
        }
    }

    /// Line number carried by the error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::ArffParse { line, .. }
            | FormatError::InvalidAttribute { line, .. }
            | FormatError::MissingData { line, .. } => *line,
            _ => None,
        }
    }

    /// Attach a line number to an error raised below the parser.
    ///
    /// A line already present is kept.
    pub fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            FormatError::ArffParse { line, .. }
            | FormatError::InvalidAttribute { line, .. }
            | FormatError::MissingData { line, .. } => {
                line.get_or_insert(number);
            }
            _ => {}
        }
        self
    }
}

fn fmt_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

fn fmt_row(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {}", r)).unwrap_or_default()
}

fn fmt_found(found: &Option<String>) -> String {
    found
        .as_ref()
        .map(|f| format!(" (found '{}')", f))
        .unwrap_or_default()
}

/// Result type alias for arffcsv operations.
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_keeps_existing_line() {
        let err = FormatError::parse(Some(3), "bad").at_line(9);
        assert_eq!(err.line(), Some(3));

        let err = FormatError::invalid("a", "x", "not a number").at_line(9);
        assert_eq!(err.line(), Some(9));
        assert_eq!(err.kind(), ErrorKind::InvalidAttribute);
    }

    #[test]
    fn test_display_includes_context() {
        let err = FormatError::parse_found(Some(4), "Unknown directive", "@FOO");
        let text = err.to_string();
        assert!(text.contains("line 4"));
        assert!(text.contains("@FOO"));
    }
}
