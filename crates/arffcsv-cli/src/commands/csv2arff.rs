//! csv2arff command - convert a CSV file to ARFF, or analyze it.

use std::path::Path;

use colored::Colorize;
use indexmap::IndexMap;

use arffcsv::{
    AnalysisReport, AnalyzerConfig, CodecConfig, ColumnSpec, Converter, ConverterConfig,
    CsvToArffOptions, DataTable, DirectiveOptions, TableConfig, TableReader,
};

use super::{delimiter_byte, truncate};
use crate::cli::Csv2ArffArgs;

pub fn run(args: Csv2ArffArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let delimiter = args.delimiter.as_deref().map(delimiter_byte).transpose()?;

    let codec = CodecConfig {
        missing_value: args.missing.clone(),
        ..Default::default()
    };
    let table_config = TableConfig {
        delimiter,
        ..Default::default()
    };

    if args.analyze {
        let table = TableReader::with_config(table_config.clone()).read_file(&args.input)?;

        let analyzer = AnalyzerConfig {
            nominal_threshold: args.nominal_threshold,
            preview_rows: args.preview_rows,
            sample_size: args.sample_size,
            directive: DirectiveOptions {
                input: args.input.display().to_string(),
                output: args.output.as_ref().map(|p| p.display().to_string()),
                relation: args.relation.clone(),
                delimiter: Some(table.delimiter as char),
                exclude: args.exclude.clone(),
                ..Default::default()
            },
            ..Default::default()
        };
        let converter = Converter::with_config(ConverterConfig {
            codec,
            table: table_config,
            analyzer,
        });
        let report = converter.analyze_table(&table);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_analysis(&args.input, &table, &report, args.preview_rows);
        }
        return Ok(());
    }

    let output = args
        .output
        .as_ref()
        .ok_or("Output file is required for conversion")?;

    let options = CsvToArffOptions {
        relation: args.relation.clone(),
        columns: args
            .columns
            .iter()
            .map(|s| ColumnSpec::parse(s))
            .collect::<Result<Vec<_>, _>>()?,
        nominal: args.nominal.clone(),
        string: args.string.clone(),
        dates: parse_dates(&args.dates),
        exclude: args.exclude.clone(),
        comments: args.comments.clone(),
        analyze: args.infer,
        sparse: args.sparse,
    };

    let converter = Converter::with_config(ConverterConfig {
        codec,
        table: table_config,
        analyzer: AnalyzerConfig {
            nominal_threshold: args.nominal_threshold,
            sample_size: args.sample_size,
            ..Default::default()
        },
    });

    let doc = converter.csv_to_arff(&args.input, output, &options)?;

    println!(
        "{} {} {} {}",
        "Converted".green().bold(),
        args.input.display(),
        "->".dimmed(),
        output.display()
    );
    println!("  Relation:   {}", doc.relation_name.white().bold());
    println!("  Attributes: {}", doc.attributes.len());
    println!("  Instances:  {}", doc.row_count());

    if verbose {
        println!();
        for attribute in &doc.attributes {
            println!("  {} {}", attribute.name.cyan(), attribute.kind);
        }
    }

    Ok(())
}

/// Split `COL` or `COL=FORMAT` date arguments.
fn parse_dates(args: &[String]) -> IndexMap<String, Option<String>> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, format)) if !format.is_empty() => {
                (name.to_string(), Some(format.to_string()))
            }
            Some((name, _)) => (name.to_string(), None),
            None => (arg.clone(), None),
        })
        .collect()
}

fn print_analysis(input: &Path, table: &DataTable, report: &AnalysisReport, preview_rows: usize) {
    println!(
        "{} {}",
        "Analyzing CSV file:".cyan().bold(),
        input.display().to_string().white()
    );
    println!(
        "Shape: {} rows × {} columns",
        report.row_count.to_string().white().bold(),
        table.column_count().to_string().white().bold()
    );
    if report.approximate {
        println!(
            "{}",
            format!(
                "Approximate: inferred from the first {} rows",
                report.scanned_rows
            )
            .yellow()
        );
    }
    println!();

    // Data preview
    let preview = table.head(preview_rows);
    println!("{}", format!("Data preview (first {} rows):", preview.row_count()).yellow().bold());
    println!("  {}", preview.headers.join(" | ").dimmed());
    for row in &preview.rows {
        let cells: Vec<String> = row.iter().map(|c| truncate(c, 20)).collect();
        println!("  {}", cells.join(" | "));
    }
    println!();

    // Column table
    println!("{}", "Column analysis:".yellow().bold());
    println!(
        "  {:<24} {:<10} {:>8} {:>8}  {}",
        "Column", "Type", "Unique", "Nulls", "Reason"
    );
    println!("  {}", "-".repeat(70));
    for column in &report.columns {
        let kind = format!("{:<10}", column.kind().keyword().to_uppercase());
        let kind = if column.exclude_suggested() {
            kind.red()
        } else if column.kind().is_numeric() {
            kind.green()
        } else {
            kind.blue()
        };
        println!(
            "  {:<24} {} {:>8} {:>8}  {}",
            truncate(&column.name, 24),
            kind,
            column.unique_count,
            column.missing_count,
            column.rationale.dimmed()
        );
    }
    println!();

    // Exclusion suggestions
    let candidates = report.exclusion_candidates();
    if !candidates.is_empty() {
        println!("{}", "Suggested exclusions:".yellow().bold());
        for column in candidates {
            println!(
                "  {} {}",
                column.name.red(),
                format!("({})", column.exclude_reason.as_deref().unwrap_or("")).dimmed()
            );
        }
        println!();
    }

    println!("{}", "Suggested command:".yellow().bold());
    println!("  {}", report.suggested_command.cyan());
    println!();

    let summary = report.summary();
    println!("{}", "Summary:".yellow().bold());
    println!("  Numeric: {}", summary.numeric.to_string().green());
    println!("  Nominal: {}", summary.nominal.to_string().blue());
    println!("  String:  {}", summary.string.to_string().white());
    if summary.date > 0 {
        println!("  Date:    {}", summary.date.to_string().magenta());
    }
    if summary.excluded > 0 {
        println!("  Suggested for exclusion: {}", summary.excluded.to_string().red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse_args(args: &[&str]) -> Csv2ArffArgs {
        let mut argv = vec!["arff-csv", "csv2arff"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Csv2arff(args) => args,
            _ => panic!("expected csv2arff"),
        }
    }

    #[test]
    fn test_parse_dates() {
        let dates = parse_dates(&[
            "when".to_string(),
            "born=yyyy-MM-dd".to_string(),
            "seen=".to_string(),
        ]);
        assert_eq!(dates.get("when"), Some(&None));
        assert_eq!(dates.get("born"), Some(&Some("yyyy-MM-dd".to_string())));
        assert_eq!(dates.get("seen"), Some(&None));
    }

    #[test]
    fn test_convert_writes_arff() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("weather.csv");
        let output = dir.path().join("weather.arff");
        std::fs::write(&input, "temp,play\n21.5,yes\n18,no\n").unwrap();

        let args = parse_args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "-n",
            "play",
        ]);
        run(args, false).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("@RELATION weather\n"));
        assert!(text.contains("@ATTRIBUTE play {no,yes}"));
    }

    #[test]
    fn test_convert_requires_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("t.csv");
        std::fs::write(&input, "a\n1\n").unwrap();

        let err = run(parse_args(&[input.to_str().unwrap()]), false).unwrap_err();
        assert_eq!(err.to_string(), "Output file is required for conversion");
    }

    #[test]
    fn test_analyze_conflicts_with_explicit_types() {
        let result = Cli::try_parse_from(["arff-csv", "csv2arff", "in.csv", "--analyze", "-n", "a"]);
        assert!(result.is_err());
    }
}
