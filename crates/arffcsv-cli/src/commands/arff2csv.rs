//! arff2csv command - convert an ARFF file to CSV.

use std::path::PathBuf;

use colored::Colorize;

use arffcsv::{ArffToCsvOptions, CodecConfig, Converter, ConverterConfig};

use super::delimiter_byte;

pub fn run(
    input: PathBuf,
    output: PathBuf,
    missing: String,
    missing_text: String,
    delimiter: String,
    include_index: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_config(ConverterConfig {
        codec: CodecConfig {
            missing_value: missing,
            ..Default::default()
        },
        ..Default::default()
    });

    let options = ArffToCsvOptions {
        delimiter: delimiter_byte(&delimiter)?,
        missing: missing_text,
        include_index,
    };

    let doc = converter.arff_to_csv(&input, &output, &options)?;

    println!(
        "{} {} {} {}",
        "Converted".green().bold(),
        input.display(),
        "->".dimmed(),
        output.display()
    );
    println!("  Relation:   {}", doc.relation_name.white().bold());
    println!("  Attributes: {}", doc.attributes.len());
    println!("  Instances:  {}", doc.row_count());
    if verbose && doc.is_sparse {
        println!("  {}", "Sparse data section expanded to dense rows".dimmed());
    }

    Ok(())
}
