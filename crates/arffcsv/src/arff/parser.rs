//! ARFF parser.
//!
//! Single forward pass over the input lines, tracking which section of the
//! file is being read:
//!
//! ```text
//! Header --@RELATION--> Attributes --@DATA--> Data
//! ```
//!
//! Comment (`%`) and blank lines are skipped in every section. Errors carry
//! the 1-based file line, except row-length mismatches, which report the
//! 1-based data line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::lexer::{split_fields, split_token};
use crate::coercion::{unquote, CellCodec, CodecConfig};
use crate::error::{FormatError, Result};
use crate::model::{Attribute, AttributeKind, RelationDocument, Row};

static RELATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^@relation(?:\s+(.*))?$").unwrap());
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^@attribute(?:\s+(.*))?$").unwrap());
static DATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^@data\s*$").unwrap());
static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^@(relation|attribute|data)(\s|$)").unwrap());
static DATE_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^date(?:\s+(.+))?$").unwrap());

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Missing-value token and default date pattern.
    pub codec: CodecConfig,
}

/// Which part of the file is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Attributes,
    Data,
}

impl Section {
    fn expected(&self) -> &'static str {
        match self {
            Section::Header => "@RELATION",
            Section::Attributes => "@ATTRIBUTE or @DATA",
            Section::Data => "a data row",
        }
    }
}

/// Parses ARFF text into a [`RelationDocument`].
pub struct ArffParser {
    codec: CellCodec,
}

impl ArffParser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            codec: CellCodec::with_config(config.codec),
        }
    }

    /// Parse an ARFF file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<RelationDocument> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FormatError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "parsing ARFF file");
        self.parse_lines(BufReader::new(file), path)
    }

    /// Parse ARFF content from a string.
    pub fn parse_str(&self, content: &str) -> Result<RelationDocument> {
        self.parse_lines(content.as_bytes(), Path::new("<string>"))
    }

    /// Parse ARFF content from any buffered reader.
    pub fn parse_reader(&self, reader: impl BufRead) -> Result<RelationDocument> {
        self.parse_lines(reader, Path::new("<reader>"))
    }

    fn parse_lines(&self, reader: impl BufRead, source: &Path) -> Result<RelationDocument> {
        let mut state = ParseState::new(&self.codec);

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| FormatError::Io {
                path: PathBuf::from(source),
                source: e,
            })?;
            state.feed(idx + 1, &line)?;
        }

        let doc = state.finish()?;
        debug!(
            relation = %doc.relation_name,
            attributes = doc.attributes.len(),
            rows = doc.rows.len(),
            sparse = doc.is_sparse,
            "parsed ARFF document"
        );
        Ok(doc)
    }
}

impl Default for ArffParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Incremental parse state; one line at a time.
struct ParseState<'a> {
    codec: &'a CellCodec,
    section: Section,
    relation: Option<String>,
    attributes: Vec<Attribute>,
    comments: Vec<String>,
    doc: Option<RelationDocument>,
    data_line: usize,
}

impl<'a> ParseState<'a> {
    fn new(codec: &'a CellCodec) -> Self {
        Self {
            codec,
            section: Section::Header,
            relation: None,
            attributes: Vec::new(),
            comments: Vec::new(),
            doc: None,
            data_line: 0,
        }
    }

    fn feed(&mut self, line_no: usize, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        if let Some(comment) = line.strip_prefix('%') {
            if self.section != Section::Data {
                self.comments.push(comment.trim().to_string());
            }
            return Ok(());
        }

        if self.section == Section::Data {
            if let Some(m) = DIRECTIVE.captures(line) {
                return Err(FormatError::parse_found(
                    Some(line_no),
                    format!(
                        "@{} is not allowed after @DATA; expected {}",
                        m[1].to_uppercase(),
                        Section::Data.expected()
                    ),
                    line,
                ));
            }
            return self.data_row(line_no, line);
        }

        if let Some(caps) = RELATION.captures(line) {
            if self.section != Section::Header {
                return Err(self.out_of_order(line_no, line));
            }
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if name.is_empty() {
                return Err(FormatError::parse_found(
                    Some(line_no),
                    "@RELATION requires a name",
                    line,
                ));
            }
            self.relation = Some(unquote(name).unwrap_or_else(|| name.to_string()));
            self.section = Section::Attributes;
            return Ok(());
        }

        if let Some(caps) = ATTRIBUTE.captures(line) {
            if self.section != Section::Attributes {
                return Err(self.out_of_order(line_no, line));
            }
            let definition = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let attribute = parse_attribute(definition).map_err(|e| e.at_line(line_no))?;
            if self.attributes.iter().any(|a| a.name == attribute.name) {
                return Err(FormatError::parse_found(
                    Some(line_no),
                    "Duplicate attribute name",
                    attribute.name,
                ));
            }
            self.attributes.push(attribute);
            return Ok(());
        }

        if DATA.is_match(line) {
            if self.section != Section::Attributes {
                return Err(self.out_of_order(line_no, line));
            }
            if self.attributes.is_empty() {
                return Err(FormatError::missing(
                    Some(line_no),
                    "@DATA found before any @ATTRIBUTE definition",
                ));
            }
            let relation = self.relation.take().unwrap_or_default();
            let attributes = std::mem::take(&mut self.attributes);
            let comments = std::mem::take(&mut self.comments);
            self.doc = Some(RelationDocument::new(relation, attributes).with_comments(comments));
            self.section = Section::Data;
            return Ok(());
        }

        if line.starts_with('@') {
            let directive = line.split_whitespace().next().unwrap_or(line);
            return Err(FormatError::parse_found(
                Some(line_no),
                format!("Unknown directive; expected {}", self.section.expected()),
                directive,
            ));
        }

        Err(FormatError::parse_found(
            Some(line_no),
            format!("Unexpected line; expected {}", self.section.expected()),
            line,
        ))
    }

    fn out_of_order(&self, line_no: usize, line: &str) -> FormatError {
        FormatError::parse_found(
            Some(line_no),
            format!("Directive out of order; expected {}", self.section.expected()),
            line,
        )
    }

    fn data_row(&mut self, line_no: usize, line: &str) -> Result<()> {
        let Some(doc) = self.doc.as_mut() else {
            return Err(FormatError::parse(Some(line_no), "Data row outside the data section"));
        };

        self.data_line += 1;
        let is_sparse_line = line.starts_with('{');
        if self.data_line == 1 {
            doc.is_sparse = is_sparse_line;
        } else if doc.is_sparse != is_sparse_line {
            let message = if doc.is_sparse {
                "Dense row in a sparse data section"
            } else {
                "Sparse row in a dense data section"
            };
            return Err(FormatError::parse_found(Some(line_no), message, line));
        }

        let row = if is_sparse_line {
            sparse_row(self.codec, &doc.attributes, line_no, line)?
        } else {
            dense_row(self.codec, &doc.attributes, self.data_line, line_no, line)?
        };

        trace!(line = line_no, "parsed data row");
        doc.push_row(row).map_err(|e| e.at_line(line_no))
    }

    fn finish(self) -> Result<RelationDocument> {
        match self.section {
            Section::Header => Err(FormatError::missing(None, "No @RELATION found")),
            Section::Attributes if self.attributes.is_empty() => Err(FormatError::missing(
                None,
                "No @ATTRIBUTE definitions found",
            )),
            Section::Attributes => Err(FormatError::missing(None, "No @DATA section found")),
            Section::Data => self
                .doc
                .ok_or_else(|| FormatError::missing(None, "No @DATA section found")),
        }
    }
}

/// Parse the text after `@ATTRIBUTE`.
fn parse_attribute(definition: &str) -> Result<Attribute> {
    let (raw_name, type_spec) = split_token(definition)?;
    if raw_name.is_empty() {
        return Err(FormatError::parse(None, "@ATTRIBUTE requires a name and a type"));
    }
    let name = unquote(raw_name).unwrap_or_else(|| raw_name.to_string());
    if type_spec.is_empty() {
        return Err(FormatError::parse_found(
            None,
            "Invalid attribute definition (missing type)",
            definition,
        ));
    }

    let kind = parse_type_spec(type_spec)?;
    let attribute = Attribute::new(name, kind);
    attribute.validate()?;
    Ok(attribute)
}

/// Parse an attribute type spec.
fn parse_type_spec(spec: &str) -> Result<AttributeKind> {
    match spec.to_ascii_uppercase().as_str() {
        "NUMERIC" => return Ok(AttributeKind::Numeric),
        "REAL" => return Ok(AttributeKind::Real),
        "INTEGER" => return Ok(AttributeKind::Integer),
        "STRING" => return Ok(AttributeKind::String),
        _ => {}
    }

    if let Some(caps) = DATE_TYPE.captures(spec) {
        let format = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .map(|f| unquote(f).unwrap_or_else(|| f.to_string()));
        return Ok(AttributeKind::Date { format });
    }

    if let Some(inner) = spec.strip_prefix('{') {
        let inner = inner.strip_suffix('}').ok_or_else(|| {
            FormatError::parse_found(None, "Unterminated nominal value set", spec)
        })?;
        let mut values = Vec::new();
        for raw in split_fields(inner, ',')? {
            match unquote(raw) {
                Some(value) => values.push(value),
                None if raw.is_empty() => {
                    return Err(FormatError::parse_found(
                        None,
                        "Empty value in nominal set",
                        spec,
                    ));
                }
                None => values.push(raw.to_string()),
            }
        }
        return Ok(AttributeKind::Nominal { values });
    }

    Err(FormatError::parse_found(None, "Unknown attribute type", spec))
}

fn dense_row(
    codec: &CellCodec,
    attributes: &[Attribute],
    data_line: usize,
    line_no: usize,
    line: &str,
) -> Result<Row> {
    let fields = split_fields(line, ',').map_err(|e| e.at_line(line_no))?;
    if fields.len() != attributes.len() {
        return Err(FormatError::FieldCount {
            expected: attributes.len(),
            found: fields.len(),
            data_line,
        });
    }

    let cells = fields
        .iter()
        .zip(attributes)
        .map(|(raw, attr)| codec.parse_cell(raw, attr).map_err(|e| e.at_line(line_no)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Row::Dense(cells))
}

fn sparse_row(
    codec: &CellCodec,
    attributes: &[Attribute],
    line_no: usize,
    line: &str,
) -> Result<Row> {
    let inner = line
        .strip_prefix('{')
        .and_then(|l| l.strip_suffix('}'))
        .ok_or_else(|| FormatError::parse_found(Some(line_no), "Unterminated sparse row", line))?
        .trim();

    if inner.is_empty() {
        return Ok(Row::sparse([]));
    }

    let mut cells = Vec::new();
    let mut previous: Option<usize> = None;

    for pair in split_fields(inner, ',').map_err(|e| e.at_line(line_no))? {
        let (index_text, raw) = pair.split_once(char::is_whitespace).ok_or_else(|| {
            FormatError::parse_found(Some(line_no), "Expected '<index> <value>' in sparse row", pair)
        })?;

        let index: usize = index_text.parse().map_err(|_| {
            FormatError::parse_found(Some(line_no), "Invalid sparse index", index_text)
        })?;
        if index >= attributes.len() {
            return Err(FormatError::parse_found(
                Some(line_no),
                format!(
                    "Sparse index out of range (there are {} attributes)",
                    attributes.len()
                ),
                index_text,
            ));
        }
        if previous.is_some_and(|p| index <= p) {
            return Err(FormatError::parse_found(
                Some(line_no),
                "Sparse indices must be strictly ascending",
                index_text,
            ));
        }
        previous = Some(index);

        let cell = codec
            .parse_cell(raw, &attributes[index])
            .map_err(|e| e.at_line(line_no))?;
        cells.push((index, cell));
    }

    Ok(Row::sparse(cells))
}
