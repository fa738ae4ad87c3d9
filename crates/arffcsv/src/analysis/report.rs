//! Analysis report types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::directive::ConversionDirective;
use crate::model::{Attribute, AttributeKind};

/// Which step of the cascade decided a column's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceRule {
    /// Column name matches a common target/label name.
    TargetName,
    /// Values fit a binary vocabulary pair.
    Binary,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Numeric,
    /// Anything else.
    Text,
    /// Column had no non-missing values.
    NoData,
}

impl fmt::Display for InferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InferenceRule::TargetName => "target-name",
            InferenceRule::Binary => "binary",
            InferenceRule::Integer => "integer",
            InferenceRule::Numeric => "numeric",
            InferenceRule::Text => "text",
            InferenceRule::NoData => "no-data",
        };
        write!(f, "{}", s)
    }
}

/// Inference result for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAnalysis {
    /// Column name.
    pub name: String,
    /// Proposed attribute.
    pub attribute: Attribute,
    /// Cascade step that decided the kind.
    pub rule: InferenceRule,
    /// Human-readable justification.
    pub rationale: String,
    /// Leading non-missing values, for display.
    pub sample_values: Vec<String>,
    /// Missing or empty cells seen.
    pub missing_count: usize,
    /// Distinct non-missing values seen.
    pub unique_count: usize,
    /// Set when the column carries no information for learning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_reason: Option<String>,
}

impl ColumnAnalysis {
    pub fn kind(&self) -> &AttributeKind {
        &self.attribute.kind
    }

    pub fn exclude_suggested(&self) -> bool {
        self.exclude_reason.is_some()
    }
}

/// Complete analysis of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// One entry per column, in table order.
    pub columns: Vec<ColumnAnalysis>,
    /// Rows in the table.
    pub row_count: usize,
    /// Rows actually inspected.
    pub scanned_rows: usize,
    /// True when only a sample of the rows was inspected.
    pub approximate: bool,
    /// Command that converts with the inferred types pinned.
    pub directive: ConversionDirective,
    /// `directive` rendered as a single command line.
    pub suggested_command: String,
}

impl AnalysisReport {
    /// Get a column analysis by name.
    pub fn column(&self, name: &str) -> Option<&ColumnAnalysis> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Proposed attributes, in column order.
    pub fn attributes(&self) -> Vec<Attribute> {
        self.columns.iter().map(|c| c.attribute.clone()).collect()
    }

    /// Columns flagged for exclusion.
    pub fn exclusion_candidates(&self) -> Vec<&ColumnAnalysis> {
        self.columns.iter().filter(|c| c.exclude_suggested()).collect()
    }

    /// Names of columns inferred with the given keyword (`nominal`, `string`, ...).
    pub fn columns_of_kind(&self, keyword: &str) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind().keyword() == keyword)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Count of numeric, nominal and string columns.
    pub fn summary(&self) -> KindSummary {
        let mut summary = KindSummary::default();
        for column in &self.columns {
            match column.kind() {
                kind if kind.is_numeric() => summary.numeric += 1,
                AttributeKind::Nominal { .. } => summary.nominal += 1,
                AttributeKind::Date { .. } => summary.date += 1,
                _ => summary.string += 1,
            }
        }
        summary.excluded = self.exclusion_candidates().len();
        summary
    }
}

/// Column counts by inferred kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSummary {
    pub numeric: usize,
    pub nominal: usize,
    pub string: usize,
    pub date: usize,
    pub excluded: usize,
}
