//! Column type inference for untyped tables.
//!
//! Each column runs through a fixed cascade; the first rule that fits wins:
//!
//! 1. target name (`class`, `label`, ...) with few distinct values → nominal
//! 2. values from a binary vocabulary pair (`yes/no`, `0/1`, ...) → nominal
//! 3. whole numbers → nominal when few distinct values, integer otherwise
//! 4. floating-point numbers → numeric
//! 5. anything else → nominal when few distinct values, string otherwise
//!
//! Missing cells (the sentinel or empty text) are ignored by every rule.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::directive::{ColumnSpec, ConversionDirective, DirectiveOptions};
use super::report::{AnalysisReport, ColumnAnalysis, InferenceRule};
use crate::coercion::DEFAULT_MISSING;
use crate::model::{Attribute, AttributeKind};
use crate::table::DataTable;

/// Default distinct-value limit for nominal inference.
pub const DEFAULT_NOMINAL_THRESHOLD: usize = 10;

/// Default number of sample values shown per column.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Column names that usually hold the class label.
pub const TARGET_NAMES: &[&str] = &["class", "target", "label", "y", "clase", "etiqueta"];

/// Recognised two-valued vocabularies, lowercase, in label order.
pub const BINARY_VOCABULARY: &[(&str, &str)] = &[
    ("0", "1"),
    ("yes", "no"),
    ("true", "false"),
    ("t", "f"),
    ("y", "n"),
    ("si", "no"),
    ("sí", "no"),
];

/// Analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Columns with at most this many distinct values may become nominal.
    pub nominal_threshold: usize,
    /// Sample values kept per column for display.
    pub preview_rows: usize,
    /// Inspect only the first N rows (None = all).
    pub sample_size: Option<usize>,
    /// Token treated as missing.
    pub missing_value: String,
    /// Column names hinting at a class label (matched case-insensitively).
    pub target_names: Vec<String>,
    /// Binary vocabulary pairs, lowercase.
    pub binary_vocabulary: Vec<(String, String)>,
    /// How to render the suggested conversion command.
    pub directive: DirectiveOptions,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            nominal_threshold: DEFAULT_NOMINAL_THRESHOLD,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_size: None,
            missing_value: DEFAULT_MISSING.to_string(),
            target_names: TARGET_NAMES.iter().map(|s| s.to_string()).collect(),
            binary_vocabulary: BINARY_VOCABULARY
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            directive: DirectiveOptions::default(),
        }
    }
}

/// Infers an ARFF attribute for every column of a table.
pub struct TypeAnalyzer {
    config: AnalyzerConfig,
}

impl TypeAnalyzer {
    /// Create a new analyzer with default configuration.
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }

    /// Create an analyzer with custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze every column of a table.
    pub fn analyze(&self, table: &DataTable) -> AnalysisReport {
        let row_count = table.row_count();
        let scanned_rows = self
            .config
            .sample_size
            .map_or(row_count, |n| n.min(row_count));
        let approximate = self.config.sample_size.is_some();

        if approximate {
            warn!(
                scanned = scanned_rows,
                total = row_count,
                "analysis is approximate: only a sample of rows was inspected"
            );
        }

        let columns: Vec<ColumnAnalysis> = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<&str> = table.column_values(i).take(scanned_rows).collect();
                self.analyze_column(name, &values)
            })
            .collect();

        let directive = self.build_directive(&columns);
        debug!(
            columns = columns.len(),
            rows = row_count,
            scanned = scanned_rows,
            "analysis complete"
        );

        AnalysisReport {
            columns,
            row_count,
            scanned_rows,
            approximate,
            suggested_command: directive.render(),
            directive,
        }
    }

    /// Analyze a single column of raw values.
    pub fn analyze_column(&self, name: &str, values: &[&str]) -> ColumnAnalysis {
        let profile = Profile::collect(values, &self.config.missing_value, self.config.preview_rows);
        let (attribute, rule, rationale) = self.infer(name, &profile);

        let rationale = if profile.missing > 0 && rule != InferenceRule::NoData {
            format!("{}; {} missing", rationale, profile.missing)
        } else {
            rationale
        };

        let total = values.len();
        let unique_count = profile.distinct.len();
        let exclude_reason = if total > 0 && unique_count <= 1 {
            Some("Single unique value".to_string())
        } else if total > 0 && profile.missing == 0 && unique_count == total {
            Some("Unique value for every row".to_string())
        } else {
            None
        };

        debug!(column = name, rule = %rule, kind = %attribute.kind, "column analyzed");

        ColumnAnalysis {
            name: name.to_string(),
            attribute,
            rule,
            rationale,
            sample_values: profile.samples,
            missing_count: profile.missing,
            unique_count,
            exclude_reason,
        }
    }

    fn infer(&self, name: &str, profile: &Profile<'_>) -> (Attribute, InferenceRule, String) {
        let threshold = self.config.nominal_threshold;
        let unique = profile.distinct.len();

        if unique == 0 {
            return (
                Attribute::string(name),
                InferenceRule::NoData,
                "No data available".to_string(),
            );
        }

        let lower_name = name.trim().to_lowercase();
        if unique <= threshold
            && self
                .config
                .target_names
                .iter()
                .any(|t| t.to_lowercase() == lower_name)
        {
            return (
                Attribute::nominal(name, profile.distinct.iter().copied()),
                InferenceRule::TargetName,
                format!("Common target/class column name ({} unique values)", unique),
            );
        }

        if let Some((values, mixed)) = self.binary_labels(profile) {
            let rationale = if mixed {
                "Binary values detected (mixed spellings kept)".to_string()
            } else {
                "Binary values detected".to_string()
            };
            return (Attribute::nominal(name, values), InferenceRule::Binary, rationale);
        }

        if profile.distinct.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
            if unique <= threshold {
                return (
                    Attribute::nominal(name, profile.distinct.iter().copied()),
                    InferenceRule::Integer,
                    format!("Integer with {} unique values (<= {})", unique, threshold),
                );
            }
            return (
                Attribute::integer(name),
                InferenceRule::Integer,
                format!("Integer with {} unique values (> {})", unique, threshold),
            );
        }

        if profile.distinct.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
            return (
                Attribute::numeric(name),
                InferenceRule::Numeric,
                "Floating point values".to_string(),
            );
        }

        if unique <= threshold {
            (
                Attribute::nominal(name, profile.distinct.iter().copied()),
                InferenceRule::Text,
                format!("Categorical with {} unique values (<= {})", unique, threshold),
            )
        } else {
            (
                Attribute::new(name, AttributeKind::String),
                InferenceRule::Text,
                format!("Text with {} unique values (> {})", unique, threshold),
            )
        }
    }

    /// Nominal labels for a column that fits a binary vocabulary pair.
    ///
    /// Labels follow vocabulary order. Each label uses its observed
    /// spellings, or the vocabulary word when it never occurs. The flag is
    /// set when some label occurs with more than one spelling.
    fn binary_labels(&self, profile: &Profile<'_>) -> Option<(Vec<String>, bool)> {
        let mut spellings: IndexMap<String, Vec<&str>> = IndexMap::new();
        for value in &profile.distinct {
            spellings
                .entry(value.trim().to_lowercase())
                .or_default()
                .push(*value);
        }
        if spellings.len() > 2 {
            return None;
        }

        let (a, b) = self
            .config
            .binary_vocabulary
            .iter()
            .find(|(a, b)| spellings.keys().all(|k| k == a || k == b))?;

        let mut values = Vec::new();
        let mut mixed = false;
        for label in [a, b] {
            match spellings.get(label) {
                Some(observed) => {
                    mixed |= observed.len() > 1;
                    values.extend(observed.iter().map(|s| s.to_string()));
                }
                None => values.push(label.clone()),
            }
        }
        Some((values, mixed))
    }

    fn build_directive(&self, columns: &[ColumnAnalysis]) -> ConversionDirective {
        let options = &self.config.directive;
        let mut exclude = options.exclude.clone();

        if options.apply_exclusions {
            let suggested: Vec<&str> = columns
                .iter()
                .filter(|c| c.exclude_suggested() && !exclude.contains(&c.name))
                .map(|c| c.name.as_str())
                .collect();
            let remaining = columns
                .iter()
                .filter(|c| !exclude.contains(&c.name) && !suggested.contains(&c.name.as_str()))
                .count();
            if remaining > 0 {
                exclude.extend(suggested.into_iter().map(String::from));
            }
        }

        ConversionDirective {
            program: options.program.clone(),
            input: options.input.clone(),
            output: options.output_path(),
            relation: options.relation_name(),
            columns: columns
                .iter()
                .filter(|c| !exclude.contains(&c.name))
                .map(|c| ColumnSpec::from(&c.attribute))
                .collect(),
            exclude,
            delimiter: options.delimiter,
            missing: (self.config.missing_value != DEFAULT_MISSING)
                .then(|| self.config.missing_value.clone()),
        }
    }
}

impl Default for TypeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Single pass over a column's values.
struct Profile<'a> {
    distinct: IndexSet<&'a str>,
    samples: Vec<String>,
    missing: usize,
}

impl<'a> Profile<'a> {
    fn collect(values: &[&'a str], missing_value: &str, preview: usize) -> Self {
        let mut distinct = IndexSet::new();
        let mut samples = Vec::new();
        let mut missing = 0;

        for &value in values {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed == missing_value {
                missing += 1;
                continue;
            }
            distinct.insert(value);
            if samples.len() < preview {
                samples.push(value.to_string());
            }
        }

        Self {
            distinct,
            samples,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(name: &str, values: &[&str]) -> ColumnAnalysis {
        TypeAnalyzer::new().analyze_column(name, values)
    }

    fn nominal_values(analysis: &ColumnAnalysis) -> Vec<&str> {
        analysis
            .attribute
            .kind
            .nominal_values()
            .unwrap_or_default()
            .iter()
            .map(|s| s.as_str())
            .collect()
    }

    #[test]
    fn test_binary_zero_one() {
        let a = analyze("flag", &["0", "1", "1", "0"]);
        assert_eq!(a.rule, InferenceRule::Binary);
        assert_eq!(nominal_values(&a), vec!["0", "1"]);
        assert!(a.rationale.contains("Binary"));
    }

    #[test]
    fn test_binary_vocabulary_order() {
        let a = analyze("smoker", &["no", "yes", "no"]);
        assert_eq!(nominal_values(&a), vec!["yes", "no"]);

        let a = analyze("ok", &["TRUE", "FALSE"]);
        assert_eq!(nominal_values(&a), vec!["TRUE", "FALSE"]);
    }

    #[test]
    fn test_binary_single_observed_label() {
        let a = analyze("done", &["y", "y", "y"]);
        assert_eq!(a.rule, InferenceRule::Binary);
        assert_eq!(nominal_values(&a), vec!["y", "n"]);
    }

    #[test]
    fn test_binary_mixed_spellings() {
        let a = analyze("answer", &["Yes", "NO", "yes"]);
        assert_eq!(a.rule, InferenceRule::Binary);
        assert_eq!(nominal_values(&a), vec!["Yes", "yes", "NO"]);
        assert!(a.rationale.contains("mixed"));
    }

    #[test]
    fn test_many_integers_stay_integer() {
        let values: Vec<String> = (1..=500).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let a = analyze("count", &refs);
        assert_eq!(a.attribute.kind, AttributeKind::Integer);
        assert_eq!(a.unique_count, 500);
    }

    #[test]
    fn test_few_integers_become_nominal() {
        let a = analyze("grade", &["3", "1", "2", "3", "1"]);
        assert_eq!(a.rule, InferenceRule::Integer);
        assert_eq!(nominal_values(&a), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_floats_are_numeric() {
        let a = analyze("weight", &["1.5", "2", "3.25"]);
        assert_eq!(a.attribute.kind, AttributeKind::Numeric);
        assert_eq!(a.rationale, "Floating point values");
    }

    #[test]
    fn test_target_name_hint() {
        let a = analyze("Class", &["3", "1", "2", "1"]);
        assert_eq!(a.rule, InferenceRule::TargetName);
        assert_eq!(nominal_values(&a), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_target_name_over_threshold() {
        let values: Vec<String> = (0..20).map(|i| format!("{}.5", i)).collect();
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let a = analyze("target", &refs);
        assert_eq!(a.attribute.kind, AttributeKind::Numeric);
    }

    #[test]
    fn test_text_fallback() {
        let a = analyze("city", &["Paris", "Lima", "Paris"]);
        assert_eq!(a.rule, InferenceRule::Text);
        assert_eq!(nominal_values(&a), vec!["Paris", "Lima"]);

        let values: Vec<String> = (0..11).map(|i| format!("name {}", i)).collect();
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let a = analyze("name", &refs);
        assert_eq!(a.attribute.kind, AttributeKind::String);
        assert!(a.rationale.contains("11 unique"));
    }

    #[test]
    fn test_missing_values_ignored_and_reported() {
        let a = analyze("score", &["1.5", "?", "", "2.5"]);
        assert_eq!(a.attribute.kind, AttributeKind::Numeric);
        assert_eq!(a.missing_count, 2);
        assert!(a.rationale.contains("2 missing"));
        assert_eq!(a.sample_values, vec!["1.5", "2.5"]);
    }

    #[test]
    fn test_all_missing_is_string() {
        let a = analyze("empty", &["?", "", "?"]);
        assert_eq!(a.attribute.kind, AttributeKind::String);
        assert_eq!(a.rule, InferenceRule::NoData);
        assert!(a.rationale.contains("No data available"));
    }

    #[test]
    fn test_exclusion_reasons() {
        let a = analyze("constant", &["x", "x", "x"]);
        assert_eq!(a.exclude_reason.as_deref(), Some("Single unique value"));

        let a = analyze("id", &["a1", "a2", "a3"]);
        assert_eq!(a.exclude_reason.as_deref(), Some("Unique value for every row"));

        let a = analyze("mixed", &["a", "b", "a"]);
        assert_eq!(a.exclude_reason, None);
    }

    #[test]
    fn test_preview_rows_limit() {
        let values: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        assert_eq!(analyze("n", &refs).sample_values.len(), DEFAULT_PREVIEW_ROWS);
    }

    fn weather() -> DataTable {
        DataTable::from_rows(
            ["id", "temp", "outlook", "play"],
            [
                ["1", "21.5", "sunny", "yes"],
                ["2", "18.0", "rainy", "no"],
                ["3", "25.25", "sunny", "yes"],
                ["4", "19.5", "overcast", "yes"],
            ],
        )
    }

    #[test]
    fn test_analyze_table_and_directive() {
        let config = AnalyzerConfig {
            directive: DirectiveOptions {
                input: "weather.csv".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = TypeAnalyzer::with_config(config).analyze(&weather());

        assert_eq!(report.row_count, 4);
        assert_eq!(report.scanned_rows, 4);
        assert!(!report.approximate);
        assert_eq!(report.columns.len(), 4);
        assert_eq!(report.column("play").map(|c| c.rule), Some(InferenceRule::Binary));
        assert_eq!(report.columns_of_kind("nominal"), vec!["id", "outlook", "play"]);

        // id and temp have a distinct value in every row
        assert_eq!(report.directive.exclude, vec!["id", "temp"]);
        assert_eq!(report.directive.relation, "weather");
        assert_eq!(report.directive.output, "weather.arff");
        assert_eq!(report.directive.missing, None);
        assert_eq!(
            report.suggested_command,
            "arff-csv csv2arff weather.csv weather.arff --relation weather \
             --column outlook:nominal:sunny,rainy,overcast --column play:nominal:yes,no \
             --exclude id --exclude temp"
        );

        let parsed = ConversionDirective::parse(&report.suggested_command).unwrap();
        assert_eq!(parsed, report.directive);
    }

    #[test]
    fn test_exclusions_never_drop_every_column() {
        let table = DataTable::from_rows(["a", "b"], [["1", "x"], ["2", "y"]]);
        let report = TypeAnalyzer::new().analyze(&table);
        assert!(report.directive.exclude.is_empty());
        assert_eq!(report.directive.columns.len(), 2);
    }

    #[test]
    fn test_directive_carries_missing_token() {
        let config = AnalyzerConfig {
            missing_value: "NA".into(),
            ..Default::default()
        };
        let table = DataTable::from_rows(["a", "b"], [["x", "1.5"], ["NA", "2.5"], ["y", "NA"]]);
        let report = TypeAnalyzer::with_config(config).analyze(&table);

        assert_eq!(report.directive.missing.as_deref(), Some("NA"));
        assert!(report.suggested_command.ends_with("--missing NA"));
        assert_eq!(
            report.column("a").map(|c| c.kind().clone()),
            Some(AttributeKind::Nominal {
                values: vec!["x".into(), "y".into()]
            })
        );
    }

    #[test]
    fn test_sample_size_marks_report_approximate() {
        let config = AnalyzerConfig {
            sample_size: Some(2),
            ..Default::default()
        };
        let report = TypeAnalyzer::with_config(config).analyze(&weather());
        assert!(report.approximate);
        assert_eq!(report.scanned_rows, 2);
        assert_eq!(report.row_count, 4);
        assert_eq!(
            report.column("outlook").map(|c| c.unique_count),
            Some(2)
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = TypeAnalyzer::new();
        let first = analyzer.analyze(&weather());
        let second = analyzer.analyze(&weather());
        assert_eq!(first, second);
    }
}
