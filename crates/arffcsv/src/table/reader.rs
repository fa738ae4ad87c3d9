//! CSV/TSV reader with delimiter detection.

use std::path::Path;

use tracing::debug;

use super::source::DataTable;
use crate::error::{FormatError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Table reader configuration.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads delimited text with a header row into a [`DataTable`].
pub struct TableReader {
    config: TableConfig,
}

impl TableReader {
    /// Create a new reader with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
        }
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Read a file from disk.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<DataTable> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| FormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = self.read_bytes(&contents)?;
        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            delimiter = %(table.delimiter as char).escape_default(),
            "read table"
        );
        Ok(table)
    }

    /// Read delimited text from a string.
    pub fn read_str(&self, content: &str) -> Result<DataTable> {
        self.read_bytes(content.as_bytes())
    }

    /// Read delimited bytes.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers = normalize_headers(reader.headers()?.iter());
        if headers.is_empty() {
            return Err(FormatError::csv(None, "No columns found"));
        }

        let expected = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            if record.len() != expected {
                let line = record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(row_idx + 2);
                return Err(FormatError::csv(
                    Some(line),
                    format!(
                        "CSV file has rows with a different number of columns than the header (expected {}, found {})",
                        expected,
                        record.len()
                    ),
                ));
            }
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        let table = DataTable::new(headers, rows, delimiter);
        if let Some(name) = table.duplicate_header() {
            return Err(FormatError::csv(
                Some(1),
                format!("Duplicate column name '{}'", name),
            ));
        }
        Ok(table)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Give blank and spreadsheet-style `Unnamed: n` headers a stable name.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.enumerate()
        .map(|(idx, header)| {
            let trimmed = header.trim();
            if trimmed.is_empty() {
                return format!("Unnamed_{}", idx);
            }
            if let Some(rest) = trimmed.strip_prefix("Unnamed") {
                let suffix = rest.trim_start_matches(':').trim();
                if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
                    return format!("Unnamed_{}", suffix);
                }
                if rest.is_empty() || rest.starts_with(':') {
                    return format!("Unnamed_{}", idx);
                }
            }
            header.to_string()
        })
        .collect()
}

/// Pick the delimiter whose count is steadiest over the first lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .take(10)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(FormatError::csv(None, "Input is empty"));
    }

    let mut best = (b',', 0);
    for &delimiter in DELIMITERS {
        let score = delimiter_score(&lines, delimiter);
        if score > best.1 {
            best = (delimiter, score);
        }
    }
    Ok(best.0)
}

fn delimiter_score(lines: &[&str], delimiter: u8) -> usize {
    let counts: Vec<usize> = lines
        .iter()
        .map(|line| count_unquoted(line, delimiter as char))
        .collect();

    let first = counts[0];
    if first == 0 {
        return 0;
    }
    if counts.iter().all(|&c| c == first) {
        // Tabs rarely occur inside values
        return first * 1000 + if delimiter == b'\t' { 100 } else { 0 };
    }

    let n = counts.len() as f64;
    let mean = counts.iter().sum::<usize>() as f64 / n;
    let variance = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / n;
    if variance < 1.0 { first * 100 } else { first }
}

/// Occurrences of `delimiter` outside double quotes.
fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    line.chars()
        .filter(|&c| {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            c == delimiter && !in_quotes
        })
        .count()
}
