//! Column specs and the re-runnable conversion directive.
//!
//! A column spec pins one attribute on the command line:
//!
//! ```text
//! age:integer
//! outcome:nominal:yes,no
//! visit:date:yyyy-MM-dd HH\:mm\:ss
//! ```
//!
//! `\` escapes `:`, `,` and itself inside names, values and formats.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};
use crate::model::{Attribute, AttributeKind};

/// Program name used in rendered directives.
pub const DEFAULT_PROGRAM: &str = "arff-csv";

/// An explicit attribute declaration for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: AttributeKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Parse `<name>:<kind>[:<values-or-format>]`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |message: &str| {
            FormatError::Config(format!("Invalid column spec '{}': {}", text, message))
        };

        let parts = split_escaped(text, ':');
        if parts.len() < 2 {
            return Err(invalid("expected <name>:<kind>"));
        }

        let name = unescape(parts[0]);
        if name.is_empty() {
            return Err(invalid("column name is empty"));
        }

        let extra = if parts.len() > 2 {
            Some(parts[2..].join(":"))
        } else {
            None
        };

        let kind = match parts[1].trim().to_ascii_lowercase().as_str() {
            "numeric" => AttributeKind::Numeric,
            "integer" => AttributeKind::Integer,
            "real" => AttributeKind::Real,
            "string" => AttributeKind::String,
            "date" => AttributeKind::Date {
                format: extra.as_deref().map(unescape).filter(|f| !f.is_empty()),
            },
            "nominal" => {
                let raw = extra.ok_or_else(|| invalid("nominal columns need a value list"))?;
                let values: Vec<String> = split_escaped(&raw, ',')
                    .into_iter()
                    .map(unescape)
                    .collect();
                if values.iter().any(|v| v.is_empty()) {
                    return Err(invalid("nominal values must not be empty"));
                }
                AttributeKind::Nominal { values }
            }
            other => return Err(invalid(&format!("unknown kind '{}'", other))),
        };

        if !matches!(kind, AttributeKind::Nominal { .. } | AttributeKind::Date { .. })
            && parts.len() > 2
        {
            return Err(invalid("only nominal and date columns take a third part"));
        }

        let spec = Self { name, kind };
        spec.clone()
            .into_attribute()
            .validate()
            .map_err(|e| invalid(&e.to_string()))?;
        Ok(spec)
    }

    pub fn into_attribute(self) -> Attribute {
        Attribute::new(self.name, self.kind)
    }
}

impl From<&Attribute> for ColumnSpec {
    fn from(attribute: &Attribute) -> Self {
        Self::new(attribute.name.clone(), attribute.kind.clone())
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", escape(&self.name), self.kind.keyword())?;
        match &self.kind {
            AttributeKind::Nominal { values } => {
                let values: Vec<String> = values.iter().map(|v| escape(v)).collect();
                write!(f, ":{}", values.join(","))
            }
            AttributeKind::Date { format: Some(format) } => write!(f, ":{}", escape(format)),
            _ => Ok(()),
        }
    }
}

/// Options that shape the rendered directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectiveOptions {
    /// Program name at the head of the command.
    pub program: String,
    /// Input path as it should appear in the command.
    pub input: String,
    /// Output path; defaults to the input with an `.arff` extension.
    pub output: Option<String>,
    /// Relation name; defaults to the input file stem.
    pub relation: Option<String>,
    /// Delimiter to spell out when it is not a comma.
    pub delimiter: Option<char>,
    /// Columns the user already chose to exclude.
    pub exclude: Vec<String>,
    /// Also exclude columns the analysis flagged.
    pub apply_exclusions: bool,
}

impl Default for DirectiveOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            input: "input.csv".to_string(),
            output: None,
            relation: None,
            delimiter: None,
            exclude: Vec::new(),
            apply_exclusions: true,
        }
    }
}

impl DirectiveOptions {
    pub fn output_path(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| with_extension(&self.input, "arff"))
    }

    pub fn relation_name(&self) -> String {
        self.relation.clone().unwrap_or_else(|| file_stem(&self.input))
    }
}

/// A complete `csv2arff` invocation with every column pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDirective {
    pub program: String,
    pub input: String,
    pub output: String,
    pub relation: String,
    pub columns: Vec<ColumnSpec>,
    pub exclude: Vec<String>,
    pub delimiter: Option<char>,
    /// Missing-value token, when it is not the default `?`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<String>,
}

impl ConversionDirective {
    /// Render as a single shell-safe command line.
    pub fn render(&self) -> String {
        let mut parts = vec![
            shell_quote(&self.program),
            "csv2arff".to_string(),
            shell_quote(&self.input),
            shell_quote(&self.output),
            "--relation".to_string(),
            shell_quote(&self.relation),
        ];
        for column in &self.columns {
            parts.push("--column".to_string());
            parts.push(shell_quote(&column.to_string()));
        }
        for name in &self.exclude {
            parts.push("--exclude".to_string());
            parts.push(shell_quote(name));
        }
        if let Some(delimiter) = self.delimiter.filter(|d| *d != ',') {
            parts.push("--delimiter".to_string());
            parts.push(shell_quote(&delimiter_text(delimiter)));
        }
        if let Some(missing) = &self.missing {
            parts.push("--missing".to_string());
            parts.push(shell_quote(missing));
        }
        parts.join(" ")
    }

    /// Parse a rendered directive back.
    pub fn parse(command: &str) -> Result<Self> {
        let invalid = |message: String| FormatError::Config(format!("Invalid directive: {}", message));

        let tokens = shell_split(command).map_err(|m| invalid(m.to_string()))?;
        let mut iter = tokens.into_iter();

        let program = iter.next().ok_or_else(|| invalid("empty command".into()))?;
        match iter.next().as_deref() {
            Some("csv2arff") => {}
            other => {
                return Err(invalid(format!(
                    "expected 'csv2arff' subcommand, found {:?}",
                    other.unwrap_or("")
                )));
            }
        }

        let mut positional = Vec::new();
        let mut relation = None;
        let mut columns = Vec::new();
        let mut exclude = Vec::new();
        let mut delimiter = None;
        let mut missing = None;

        while let Some(token) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .ok_or_else(|| invalid(format!("{} needs a value", flag)))
            };
            match token.as_str() {
                "--relation" | "-r" => relation = Some(value(token.as_str())?),
                "--column" => columns.push(ColumnSpec::parse(&value(token.as_str())?)?),
                "--exclude" => exclude.push(value(token.as_str())?),
                "--delimiter" => {
                    let text = value(token.as_str())?;
                    delimiter = Some(parse_delimiter(&text).map_err(|m| invalid(m.to_string()))?);
                }
                "--missing" | "-m" => {
                    let text = value(token.as_str())?;
                    if text.is_empty() {
                        return Err(invalid("--missing needs a non-empty token".into()));
                    }
                    missing = Some(text);
                }
                flag if flag.starts_with("--") => {
                    return Err(invalid(format!("unknown option '{}'", flag)));
                }
                _ => positional.push(token),
            }
        }

        let [input, output]: [String; 2] = positional
            .try_into()
            .map_err(|p: Vec<String>| invalid(format!("expected input and output, found {} paths", p.len())))?;

        Ok(Self {
            program,
            relation: relation.unwrap_or_else(|| file_stem(&input)),
            input,
            output,
            columns,
            exclude,
            delimiter,
            missing,
        })
    }

    /// Attributes in column order.
    pub fn attributes(&self) -> Vec<Attribute> {
        self.columns
            .iter()
            .cloned()
            .map(ColumnSpec::into_attribute)
            .collect()
    }
}

impl fmt::Display for ConversionDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Parse a delimiter argument: a single character or `\t`.
pub fn parse_delimiter(text: &str) -> std::result::Result<char, &'static str> {
    match text {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c),
                _ => Err("delimiter must be a single ASCII character"),
            }
        }
    }
}

fn delimiter_text(delimiter: char) -> String {
    match delimiter {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | ':' | ',') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on unescaped separators, keeping escapes in the pieces.
fn split_escaped(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

fn shell_quote(text: &str) -> String {
    let safe = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:,=@%+".contains(c));
    if safe {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\'', "'\\''"))
    }
}

fn shell_split(command: &str) -> std::result::Result<Vec<String>, &'static str> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err("unclosed single quote"),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch @ ('"' | '\\' | '$' | '`')) => current.push(ch),
                            Some(ch) => {
                                current.push('\\');
                                current.push(ch);
                            }
                            None => return Err("unclosed double quote"),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err("unclosed double quote"),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some('\n') => {}
                    Some(ch) => current.push(ch),
                    None => current.push('\\'),
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn file_stem(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "relation".to_string())
}

fn with_extension(path: &str, extension: &str) -> String {
    std::path::Path::new(path)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}
