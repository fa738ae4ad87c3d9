//! Column type analysis and the conversion directive it produces.

mod analyzer;
mod directive;
mod report;

pub use analyzer::{
    AnalyzerConfig, TypeAnalyzer, BINARY_VOCABULARY, DEFAULT_NOMINAL_THRESHOLD,
    DEFAULT_PREVIEW_ROWS, TARGET_NAMES,
};
pub use directive::{parse_delimiter, ColumnSpec, ConversionDirective, DirectiveOptions, DEFAULT_PROGRAM};
pub use report::{AnalysisReport, ColumnAnalysis, InferenceRule, KindSummary};
