//! Integration tests for arffcsv.

use std::io::Write;
use tempfile::NamedTempFile;

use arffcsv::{
    ArffParser, ArffToCsvOptions, ArffWriter, Attribute, AttributeKind, Cell, CodecConfig,
    ColumnSpec, ConversionDirective, Converter, ConverterConfig, CsvToArffOptions, ErrorKind,
    FormatError, InferenceRule, RelationDocument, Row, TableReader, TypeAnalyzer,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

// =============================================================================
// ARFF Parsing
// =============================================================================

#[test]
fn test_parse_dense_with_missing() {
    let content = "@RELATION r\n@ATTRIBUTE a NUMERIC\n@ATTRIBUTE b {yes,no}\n@DATA\n1.5,yes\n?,no\n";
    let file = create_test_file(content);

    let doc = ArffParser::new().parse_file(file.path()).expect("Parse failed");

    assert_eq!(doc.relation_name, "r");
    assert_eq!(doc.row_count(), 2);
    assert_eq!(doc.rows[0], Row::Dense(vec![Cell::number(1.5), Cell::nominal("yes")]));
    assert_eq!(doc.rows[1], Row::Dense(vec![Cell::Missing, Cell::nominal("no")]));
}

#[test]
fn test_attribute_after_data_names_line() {
    let content = "@RELATION r\n@ATTRIBUTE a NUMERIC\n@DATA\n1\n@ATTRIBUTE b NUMERIC\n";

    let err = ArffParser::new().parse_str(content).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ArffParse);
    assert_eq!(err.line(), Some(5));
}

#[test]
fn test_nominal_outside_set_is_rejected() {
    let content = "@RELATION r\n@ATTRIBUTE x {a,b}\n@DATA\na\nc\n";

    let err = ArffParser::new().parse_str(content).unwrap_err();

    match err {
        FormatError::InvalidAttribute {
            attribute,
            value,
            message,
            ..
        } => {
            assert_eq!(attribute, "x");
            assert_eq!(value, "c");
            assert!(message.contains("{a,b}"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_custom_missing_token() {
    let content = "@RELATION r\n@ATTRIBUTE a NUMERIC\n@DATA\nNA\n?\n";
    let parser = ArffParser::with_config(arffcsv::ParserConfig {
        codec: CodecConfig {
            missing_value: "NA".into(),
            ..Default::default()
        },
    });

    let err = parser.parse_str(content).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAttribute);

    let doc = parser.parse_str("@RELATION r\n@ATTRIBUTE a NUMERIC\n@DATA\nNA\n").unwrap();
    assert_eq!(doc.rows[0].cell(0), &Cell::Missing);
}

// =============================================================================
// Sparse Data
// =============================================================================

#[test]
fn test_sparse_write_and_parse() {
    let attributes = (0..4).map(|i| Attribute::numeric(format!("f{i}"))).collect();
    let mut doc = RelationDocument::new("sparse", attributes).with_sparse(true);
    doc.push_row(Row::sparse([(1, Cell::number(3.0))])).unwrap();

    let text = ArffWriter::new().write_string(&doc).unwrap();
    assert!(text.contains("\n{1 3.0}\n"));

    let parsed = ArffParser::new().parse_str(&text).unwrap();
    let row = &parsed.rows[0];
    assert_eq!(row.cell(0), &Cell::Missing);
    assert_eq!(row.cell(1), &Cell::number(3.0));
    assert_eq!(row.cell(2), &Cell::Missing);
    assert_eq!(row.cell(3), &Cell::Missing);
}

// =============================================================================
// Type Analysis
// =============================================================================

#[test]
fn test_binary_column_is_nominal() {
    let analysis = TypeAnalyzer::new().analyze_column("flag", &["0", "1", "1", "0"]);

    assert_eq!(analysis.rule, InferenceRule::Binary);
    assert_eq!(
        analysis.attribute.kind,
        AttributeKind::Nominal {
            values: vec!["0".into(), "1".into()]
        }
    );
    assert!(analysis.rationale.to_lowercase().contains("binary"));
}

#[test]
fn test_high_cardinality_integers_stay_integer() {
    let values: Vec<String> = (1..=500).map(|i| i.to_string()).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();

    let analysis = TypeAnalyzer::new().analyze_column("count", &refs);

    assert_eq!(analysis.attribute.kind, AttributeKind::Integer);
    assert_eq!(analysis.unique_count, 500);
}

#[test]
fn test_analyze_csv_suggested_command_round_trips() {
    let content = "id,outlook,temperature,play\n\
                   1,sunny,21.5,yes\n\
                   2,rainy,18.25,no\n\
                   3,sunny,25.0,yes\n\
                   4,overcast,19.75,no\n";
    let file = create_test_file(content);

    let report = Converter::new().analyze_csv(file.path()).unwrap();
    assert_eq!(report.row_count, 4);
    assert!(!report.approximate);

    let directive = ConversionDirective::parse(&report.suggested_command).unwrap();
    assert_eq!(directive, report.directive);
    assert_eq!(
        report.column("play").map(|c| c.rule),
        Some(InferenceRule::Binary)
    );
}

#[test]
fn test_suggested_command_reruns_with_custom_missing_token() {
    let csv = create_test_file("a,b\nx,1.5\nNA,2.5\ny,NA\n");
    let dir = tempfile::tempdir().unwrap();

    let codec = |missing: &str| CodecConfig {
        missing_value: missing.to_string(),
        ..Default::default()
    };
    let analyzing = Converter::with_config(ConverterConfig {
        codec: codec("NA"),
        ..Default::default()
    });
    let report = analyzing.analyze_csv(csv.path()).unwrap();
    let directive = ConversionDirective::parse(&report.suggested_command).unwrap();
    assert_eq!(directive.missing.as_deref(), Some("NA"));

    let rerun = Converter::with_config(ConverterConfig {
        codec: codec(directive.missing.as_deref().unwrap_or("?")),
        ..Default::default()
    });
    let pinned = rerun
        .csv_to_arff(
            csv.path(),
            dir.path().join("pinned.arff"),
            &CsvToArffOptions {
                relation: Some(directive.relation.clone()),
                columns: directive.columns.clone(),
                exclude: directive.exclude.clone(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(pinned.attributes, directive.attributes());
    assert_eq!(pinned.rows[1].cell(0), &Cell::Missing);
    assert_eq!(pinned.rows[2].cell(1), &Cell::Missing);

    let inferred = analyzing
        .csv_to_arff(
            csv.path(),
            dir.path().join("inferred.arff"),
            &CsvToArffOptions {
                relation: Some(directive.relation.clone()),
                analyze: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(pinned, inferred);
}

#[test]
fn test_sample_size_marks_report_approximate() {
    let content = "n\n1\n2\n3\n4\n5\n6\n";
    let file = create_test_file(content);

    let mut config = ConverterConfig::default();
    config.analyzer.sample_size = Some(3);
    let report = Converter::with_config(config).analyze_csv(file.path()).unwrap();

    assert!(report.approximate);
    assert_eq!(report.scanned_rows, 3);
    assert_eq!(report.row_count, 6);
}

// =============================================================================
// End-to-end Conversion
// =============================================================================

#[test]
fn test_csv_to_arff_to_csv() {
    let csv = create_test_file(
        "name,age,smoker\n\
         Ann,34,yes\n\
         Bob,,no\n\
         \"Smith, J\",51,yes\n",
    );
    let dir = tempfile::tempdir().unwrap();
    let arff = dir.path().join("people.arff");
    let back = dir.path().join("people.csv");

    let options = CsvToArffOptions {
        columns: vec![
            ColumnSpec::parse("name:string").unwrap(),
            ColumnSpec::parse("age:integer").unwrap(),
            ColumnSpec::parse("smoker:nominal:yes,no").unwrap(),
        ],
        ..Default::default()
    };
    let converter = Converter::new();
    let doc = converter.csv_to_arff(csv.path(), &arff, &options).unwrap();
    assert_eq!(doc.rows[1].cell(1), &Cell::Missing);

    let text = std::fs::read_to_string(&arff).unwrap();
    assert!(text.contains("@ATTRIBUTE smoker {yes,no}"));
    assert!(text.contains("'Smith, J',51,yes"));

    converter
        .arff_to_csv(&arff, &back, &ArffToCsvOptions::default())
        .unwrap();
    let table = TableReader::new().read_file(&back).unwrap();
    assert_eq!(table.headers, vec!["name", "age", "smoker"]);
    assert_eq!(table.rows[1], vec!["Bob", "", "no"]);
    assert_eq!(table.rows[2], vec!["Smith, J", "51", "yes"]);
}

#[test]
fn test_analyze_then_convert() {
    let csv = create_test_file(
        "temp;class\n\
         21.5;good\n\
         18.0;bad\n\
         25.5;good\n",
    );
    let dir = tempfile::tempdir().unwrap();
    let arff = dir.path().join("out.arff");

    let options = CsvToArffOptions {
        analyze: true,
        relation: Some("weather".into()),
        ..Default::default()
    };
    let doc = Converter::new().csv_to_arff(csv.path(), &arff, &options).unwrap();

    assert_eq!(doc.attributes[0].kind, AttributeKind::Numeric);
    assert_eq!(
        doc.attributes[1].kind,
        AttributeKind::Nominal {
            values: vec!["good".into(), "bad".into()]
        }
    );

    let parsed = ArffParser::new().parse_file(&arff).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn test_ragged_csv_is_rejected() {
    let csv = create_test_file("a,b\n1,2\n3\n");
    let dir = tempfile::tempdir().unwrap();

    let err = Converter::new()
        .csv_to_arff(
            csv.path(),
            dir.path().join("x.arff"),
            &CsvToArffOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CsvParse);
}

#[test]
fn test_missing_input_file() {
    let err = ArffParser::new()
        .parse_file("/nonexistent/path/file.arff")
        .unwrap_err();
    assert!(matches!(err, FormatError::Io { .. }));
}
