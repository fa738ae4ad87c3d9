//! End-to-end conversions between delimited tables and ARFF.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisReport, AnalyzerConfig, ColumnSpec, TypeAnalyzer};
use crate::arff::{ArffParser, ArffWriter, ParserConfig, WriterConfig};
use crate::coercion::{CellCodec, CodecConfig};
use crate::error::Result;
use crate::model::{Attribute, AttributeKind, Cell, RelationDocument, Row};
use crate::table::{DataTable, TableConfig, TableReader, TableWriter};

/// Configuration shared by all conversions.
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    /// Missing-value token and default date pattern.
    pub codec: CodecConfig,
    /// How delimited input is read.
    pub table: TableConfig,
    /// Type inference settings; its missing token follows `codec`.
    pub analyzer: AnalyzerConfig,
}

/// Options for a table → ARFF conversion.
#[derive(Debug, Clone, Default)]
pub struct CsvToArffOptions {
    /// Relation name (None = input file stem).
    pub relation: Option<String>,
    /// Fully specified columns; these win over every other option.
    pub columns: Vec<ColumnSpec>,
    /// Columns to declare nominal, with their observed values.
    pub nominal: Vec<String>,
    /// Columns to declare STRING.
    pub string: Vec<String>,
    /// Columns to declare DATE, with an optional pattern.
    pub dates: IndexMap<String, Option<String>>,
    /// Columns to drop before conversion.
    pub exclude: Vec<String>,
    /// Header comments for the ARFF output.
    pub comments: Vec<String>,
    /// Infer unspecified columns with the type analyzer.
    pub analyze: bool,
    /// Write the data section in sparse layout.
    pub sparse: bool,
}

/// Options for an ARFF → table conversion.
#[derive(Debug, Clone)]
pub struct ArffToCsvOptions {
    /// Output delimiter.
    pub delimiter: u8,
    /// Text written for missing cells.
    pub missing: String,
    /// Prepend a zero-based `index` column.
    pub include_index: bool,
}

impl Default for ArffToCsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing: String::new(),
            include_index: false,
        }
    }
}

/// Orchestrates table reading, inference, ARFF writing and parsing.
pub struct Converter {
    config: ConverterConfig,
    codec: CellCodec,
}

impl Converter {
    /// Create a new converter with default configuration.
    pub fn new() -> Self {
        Self::with_config(ConverterConfig::default())
    }

    /// Create a converter with custom configuration.
    pub fn with_config(mut config: ConverterConfig) -> Self {
        config.analyzer.missing_value = config.codec.missing_value.clone();
        let codec = CellCodec::with_config(config.codec.clone());
        Self { config, codec }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Read a delimited file.
    pub fn read_table(&self, path: impl AsRef<Path>) -> Result<DataTable> {
        TableReader::with_config(self.config.table.clone()).read_file(path)
    }

    /// Convert a delimited file to an ARFF file.
    pub fn csv_to_arff(
        &self,
        csv_path: impl AsRef<Path>,
        arff_path: impl AsRef<Path>,
        options: &CsvToArffOptions,
    ) -> Result<RelationDocument> {
        let csv_path = csv_path.as_ref();
        let arff_path = arff_path.as_ref();

        let doc = self.csv_file_to_document(csv_path, options)?;
        self.writer().write_file(&doc, arff_path)?;

        info!(
            input = %csv_path.display(),
            output = %arff_path.display(),
            rows = doc.row_count(),
            attributes = doc.attributes.len(),
            "converted CSV to ARFF"
        );
        Ok(doc)
    }

    /// Convert a delimited file to ARFF text.
    pub fn csv_to_arff_string(
        &self,
        csv_path: impl AsRef<Path>,
        options: &CsvToArffOptions,
    ) -> Result<String> {
        let doc = self.csv_file_to_document(csv_path.as_ref(), options)?;
        self.writer().write_string(&doc)
    }

    fn csv_file_to_document(
        &self,
        csv_path: &Path,
        options: &CsvToArffOptions,
    ) -> Result<RelationDocument> {
        let table = self.read_table(csv_path)?;
        let mut options = options.clone();
        if options.relation.is_none() {
            options.relation = csv_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned());
        }
        self.table_to_document(&table, &options)
    }

    /// Build a relation document from a table.
    pub fn table_to_document(
        &self,
        table: &DataTable,
        options: &CsvToArffOptions,
    ) -> Result<RelationDocument> {
        let table = if options.exclude.is_empty() {
            table.clone()
        } else {
            table.without_columns(&options.exclude)?
        };

        self.warn_unknown_columns(&table, options);

        let inferred = if options.analyze {
            TypeAnalyzer::with_config(self.config.analyzer.clone())
                .analyze(&table)
                .attributes()
        } else {
            Vec::new()
        };
        let mut inferred = inferred.into_iter();

        let attributes: Vec<Attribute> = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let inferred = inferred.next();
                self.resolve_attribute(&table, i, name, options, inferred)
            })
            .collect();

        for attribute in &attributes {
            attribute.validate()?;
        }

        let relation = options
            .relation
            .clone()
            .unwrap_or_else(|| "relation".to_string());
        let mut doc = RelationDocument::new(relation, attributes)
            .with_sparse(options.sparse)
            .with_comments(options.comments.clone());

        for (row_idx, raw_row) in table.rows.iter().enumerate() {
            let cells = doc
                .attributes
                .iter()
                .enumerate()
                .map(|(col, attr)| {
                    let raw = raw_row.get(col).map(String::as_str).unwrap_or("");
                    self.table_cell(raw, attr).map_err(|e| e.at_line(row_idx + 1))
                })
                .collect::<Result<Vec<_>>>()?;
            doc.push_row(Row::Dense(cells))?;
        }

        debug!(
            relation = %doc.relation_name,
            rows = doc.row_count(),
            analyzed = options.analyze,
            "built relation from table"
        );
        Ok(doc)
    }

    /// Choose the attribute for one column, most explicit option first.
    fn resolve_attribute(
        &self,
        table: &DataTable,
        index: usize,
        name: &str,
        options: &CsvToArffOptions,
        inferred: Option<Attribute>,
    ) -> Attribute {
        if let Some(spec) = options.columns.iter().find(|c| c.name == name) {
            return spec.clone().into_attribute();
        }
        if let Some(format) = options.dates.get(name) {
            return Attribute::date(name, format.as_deref());
        }
        if options.nominal.iter().any(|n| n == name) {
            let mut values: Vec<&str> = self.present_values(table, index).into_iter().collect();
            values.sort_unstable();
            if values.is_empty() {
                warn!(column = name, "nominal column has no values; declaring it STRING");
                return Attribute::string(name);
            }
            return Attribute::nominal(name, values);
        }
        if options.string.iter().any(|n| n == name) {
            return Attribute::string(name);
        }
        if let Some(attribute) = inferred {
            return attribute;
        }
        self.basic_guess(table, index, name)
    }

    /// Integer, numeric or string, from the values alone.
    fn basic_guess(&self, table: &DataTable, index: usize, name: &str) -> Attribute {
        let values = self.present_values(table, index);
        if values.is_empty() {
            return Attribute::string(name);
        }
        if values.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
            Attribute::integer(name)
        } else if values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
            Attribute::numeric(name)
        } else {
            Attribute::new(name, AttributeKind::String)
        }
    }

    /// Distinct non-missing values of a column, first-seen order.
    fn present_values<'t>(&self, table: &'t DataTable, index: usize) -> IndexSet<&'t str> {
        let missing = self.codec.missing_value();
        table
            .column_values(index)
            .filter(|v| {
                let t = v.trim();
                !t.is_empty() && t != missing
            })
            .collect()
    }

    fn table_cell(&self, raw: &str, attribute: &Attribute) -> Result<Cell> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == self.codec.missing_value() {
            return Ok(Cell::Missing);
        }
        self.codec.coerce_text(raw, attribute)
    }

    fn warn_unknown_columns(&self, table: &DataTable, options: &CsvToArffOptions) {
        let named = options
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .chain(options.nominal.iter().map(String::as_str))
            .chain(options.string.iter().map(String::as_str))
            .chain(options.dates.keys().map(String::as_str));
        for name in named {
            if table.column_index(name).is_none() && !options.exclude.iter().any(|e| e == name) {
                warn!(column = name, "type option names a column that is not in the table");
            }
        }
    }

    /// Convert an ARFF file to a delimited file.
    pub fn arff_to_csv(
        &self,
        arff_path: impl AsRef<Path>,
        csv_path: impl AsRef<Path>,
        options: &ArffToCsvOptions,
    ) -> Result<RelationDocument> {
        let arff_path = arff_path.as_ref();
        let csv_path = csv_path.as_ref();

        let doc = self.parser().parse_file(arff_path)?;
        let table = self.document_to_table(&doc, options);
        TableWriter::with_delimiter(options.delimiter).write_file(&table, csv_path)?;

        info!(
            input = %arff_path.display(),
            output = %csv_path.display(),
            rows = doc.row_count(),
            "converted ARFF to CSV"
        );
        Ok(doc)
    }

    /// Flatten a relation document into a table.
    pub fn document_to_table(&self, doc: &RelationDocument, options: &ArffToCsvOptions) -> DataTable {
        let width = doc.attributes.len();
        let mut headers = Vec::with_capacity(width + 1);
        if options.include_index {
            headers.push("index".to_string());
        }
        headers.extend(doc.attributes.iter().map(|a| a.name.clone()));

        let rows = doc
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut out = Vec::with_capacity(width + 1);
                if options.include_index {
                    out.push(i.to_string());
                }
                out.extend((0..width).map(|c| row.cell(c).to_plain_string(&options.missing)));
                out
            })
            .collect();

        DataTable::new(headers, rows, options.delimiter)
    }

    /// Analyze a delimited file's columns.
    pub fn analyze_csv(&self, csv_path: impl AsRef<Path>) -> Result<AnalysisReport> {
        let csv_path = csv_path.as_ref();
        let table = self.read_table(csv_path)?;

        let mut config = self.config.analyzer.clone();
        config.directive.input = csv_path.display().to_string();
        if config.directive.delimiter.is_none() && table.delimiter != b',' {
            config.directive.delimiter = Some(table.delimiter as char);
        }
        Ok(TypeAnalyzer::with_config(config).analyze(&table))
    }

    /// Analyze an in-memory table.
    pub fn analyze_table(&self, table: &DataTable) -> AnalysisReport {
        TypeAnalyzer::with_config(self.config.analyzer.clone()).analyze(table)
    }

    fn parser(&self) -> ArffParser {
        ArffParser::with_config(ParserConfig {
            codec: self.config.codec.clone(),
        })
    }

    fn writer(&self) -> ArffWriter {
        ArffWriter::with_config(WriterConfig {
            codec: self.config.codec.clone(),
            ..Default::default()
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, FormatError};
    use crate::model::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn table() -> DataTable {
        DataTable::from_rows(
            ["id", "age", "height", "name", "smoker"],
            [
                ["1", "34", "1.75", "Ann", "yes"],
                ["2", "?", "1.62", "Bob", "no"],
                ["3", "51", "", "Cy", "yes"],
            ],
        )
    }

    #[test]
    fn test_basic_guess() {
        let doc = Converter::new()
            .table_to_document(&table(), &CsvToArffOptions::default())
            .unwrap();

        let kinds: Vec<_> = doc.attributes.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                AttributeKind::Integer,
                AttributeKind::Integer,
                AttributeKind::Numeric,
                AttributeKind::String,
                AttributeKind::String,
            ]
        );
        assert_eq!(doc.rows[1].cell(1), &Cell::Missing);
        assert_eq!(doc.rows[2].cell(2), &Cell::Missing);
        assert_eq!(doc.rows[0].cell(2), &Cell::number(1.75));
    }

    #[test]
    fn test_explicit_types_and_exclusion() {
        let options = CsvToArffOptions {
            relation: Some("people".into()),
            nominal: vec!["smoker".into()],
            string: vec!["age".into()],
            exclude: vec!["id".into()],
            ..Default::default()
        };
        let doc = Converter::new().table_to_document(&table(), &options).unwrap();

        assert_eq!(doc.relation_name, "people");
        assert_eq!(doc.attribute_names(), vec!["age", "height", "name", "smoker"]);
        assert_eq!(doc.attributes[0].kind, AttributeKind::String);
        assert_eq!(
            doc.attribute("smoker").map(|a| a.kind.clone()),
            Some(AttributeKind::Nominal {
                values: vec!["no".into(), "yes".into()]
            })
        );
    }

    #[test]
    fn test_column_spec_wins() {
        let options = CsvToArffOptions {
            columns: vec![ColumnSpec::parse("age:real").unwrap()],
            string: vec!["age".into()],
            ..Default::default()
        };
        let doc = Converter::new().table_to_document(&table(), &options).unwrap();
        assert_eq!(doc.attributes[1].kind, AttributeKind::Real);
    }

    #[test]
    fn test_unknown_exclude_fails() {
        let options = CsvToArffOptions {
            exclude: vec!["ghost".into()],
            ..Default::default()
        };
        let err = Converter::new()
            .table_to_document(&table(), &options)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CsvParse);
    }

    #[test]
    fn test_analyze_option() {
        let options = CsvToArffOptions {
            analyze: true,
            ..Default::default()
        };
        let doc = Converter::new().table_to_document(&table(), &options).unwrap();
        assert_eq!(
            doc.attribute("smoker").map(|a| a.kind.clone()),
            Some(AttributeKind::Nominal {
                values: vec!["yes".into(), "no".into()]
            })
        );
    }

    #[test]
    fn test_coercion_error_names_row() {
        let options = CsvToArffOptions {
            columns: vec![ColumnSpec::parse("name:integer").unwrap()],
            ..Default::default()
        };
        let err = Converter::new()
            .table_to_document(&table(), &options)
            .unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidAttribute { line: Some(1), .. }
        ));
    }

    #[test]
    fn test_date_column() {
        let table = DataTable::from_rows(["when"], [["2024-01-05"], ["?"]]);
        let mut dates = IndexMap::new();
        dates.insert("when".to_string(), Some("yyyy-MM-dd".to_string()));
        let options = CsvToArffOptions {
            dates,
            ..Default::default()
        };
        let doc = Converter::new().table_to_document(&table, &options).unwrap();
        assert!(matches!(
            doc.rows[0].cell(0),
            Cell::Typed(Value::Date(d)) if d.text == "2024-01-05"
        ));
        assert_eq!(doc.rows[1].cell(0), &Cell::Missing);
    }

    #[test]
    fn test_sparse_output() {
        let table = DataTable::from_rows(["a", "b"], [["0", "?"], ["?", "2"]]);
        let options = CsvToArffOptions {
            sparse: true,
            ..Default::default()
        };
        let doc = Converter::new().table_to_document(&table, &options).unwrap();
        assert!(doc.is_sparse);
        assert_eq!(doc.rows[0], Row::sparse([(0, Cell::integer(0))]));
    }

    #[test]
    fn test_csv_to_arff_file() {
        let csv = create_test_file("temp,play\n21.5,yes\n18,no\n");
        let dir = tempfile::tempdir().unwrap();
        let arff = dir.path().join("weather.arff");

        let options = CsvToArffOptions {
            relation: Some("weather".into()),
            nominal: vec!["play".into()],
            comments: vec!["converted".into()],
            ..Default::default()
        };
        let doc = Converter::new().csv_to_arff(csv.path(), &arff, &options).unwrap();
        assert_eq!(doc.row_count(), 2);

        let text = std::fs::read_to_string(&arff).unwrap();
        assert!(text.starts_with("% converted\n"));
        assert!(text.contains("@ATTRIBUTE play {no,yes}"));
        assert!(text.contains("21.5,yes"));
        assert!(text.contains("18.0,no"));
    }

    #[test]
    fn test_relation_defaults_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("iris.csv");
        std::fs::write(&csv, "a\n1\n").unwrap();

        let text = Converter::new()
            .csv_to_arff_string(&csv, &CsvToArffOptions::default())
            .unwrap();
        assert!(text.starts_with("@RELATION iris\n"));
    }

    #[test]
    fn test_arff_to_csv_file() {
        let arff = create_test_file(
            "@RELATION r\n@ATTRIBUTE a NUMERIC\n@ATTRIBUTE b {yes,no}\n@DATA\n1.5,yes\n?,no\n",
        );
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("out.csv");

        let options = ArffToCsvOptions {
            include_index: true,
            ..Default::default()
        };
        Converter::new().arff_to_csv(arff.path(), &csv, &options).unwrap();
        let text = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(text, "index,a,b\n0,1.5,yes\n1,,no\n");
    }

    #[test]
    fn test_document_to_table_missing_text() {
        let mut doc = RelationDocument::new("r", vec![Attribute::numeric("a")]);
        doc.push_row(Row::Dense(vec![Cell::Missing])).unwrap();
        let options = ArffToCsvOptions {
            missing: "?".into(),
            ..Default::default()
        };
        let table = Converter::new().document_to_table(&doc, &options);
        assert_eq!(table.rows, vec![vec!["?".to_string()]]);
    }

    #[test]
    fn test_analyze_csv_sets_directive_input() {
        let csv = create_test_file("flag;n\n0;1.5\n1;2.5\n1;3.5\n");
        let report = Converter::new().analyze_csv(csv.path()).unwrap();
        assert_eq!(report.directive.input, csv.path().display().to_string());
        assert_eq!(report.directive.delimiter, Some(';'));
        assert!(report.suggested_command.contains("--delimiter ';'"));
    }
}
