//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use arffcsv::analysis::{DEFAULT_NOMINAL_THRESHOLD, DEFAULT_PREVIEW_ROWS};

/// arff-csv: convert between CSV and ARFF (Weka) file formats
#[derive(Parser)]
#[command(name = "arff-csv")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV file to ARFF format
    Csv2arff(Csv2ArffArgs),

    /// Convert an ARFF file to CSV format
    Arff2csv {
        /// Input ARFF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Missing value token in the ARFF input
        #[arg(short, long, default_value = "?")]
        missing: String,

        /// Text written for missing values in the CSV output
        #[arg(long, default_value = "")]
        missing_text: String,

        /// CSV delimiter (a single character, or \t)
        #[arg(long, default_value = ",")]
        delimiter: String,

        /// Include a row index column in the CSV output
        #[arg(long)]
        include_index: bool,
    },

    /// Display information about an ARFF file
    Info {
        /// Input ARFF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Missing value token
        #[arg(short, long, default_value = "?")]
        missing: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
pub struct Csv2ArffArgs {
    /// Input CSV file path
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output ARFF file path (not required with --analyze)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Relation name (default: input filename without extension)
    #[arg(short, long)]
    pub relation: Option<String>,

    /// Column type as <name>:<kind>[:<values-or-format>]
    #[arg(long = "column", value_name = "SPEC")]
    pub columns: Vec<String>,

    /// Column names to treat as nominal attributes
    #[arg(short, long, num_args = 1.., value_name = "COL")]
    pub nominal: Vec<String>,

    /// Column names to treat as string attributes
    #[arg(short, long, num_args = 1.., value_name = "COL")]
    pub string: Vec<String>,

    /// Date column as COL or COL=FORMAT
    #[arg(long = "date", value_name = "COL[=FORMAT]")]
    pub dates: Vec<String>,

    /// Column names to exclude from the conversion
    #[arg(long, num_args = 1.., value_name = "COL")]
    pub exclude: Vec<String>,

    /// Missing value representation
    #[arg(short, long, default_value = "?")]
    pub missing: String,

    /// Comments to add to the ARFF file
    #[arg(short, long = "comment", num_args = 1.., value_name = "TEXT")]
    pub comments: Vec<String>,

    /// CSV delimiter (default: auto-detect)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Write the data section in sparse format
    #[arg(long)]
    pub sparse: bool,

    /// Infer types for columns without an explicit type
    #[arg(long, conflicts_with = "analyze")]
    pub infer: bool,

    /// Analyze the CSV and suggest column types (does not convert)
    #[arg(short, long, conflicts_with_all = ["nominal", "string", "columns", "dates"])]
    pub analyze: bool,

    /// Number of rows to preview in analysis
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS, value_name = "N")]
    pub preview_rows: usize,

    /// Max unique values to consider a column as nominal
    #[arg(long, default_value_t = DEFAULT_NOMINAL_THRESHOLD, value_name = "N")]
    pub nominal_threshold: usize,

    /// Inspect only the first N rows when inferring types
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Print the analysis as JSON
    #[arg(long, requires = "analyze")]
    pub json: bool,
}
