//! Info command - describe an ARFF file.

use std::path::PathBuf;

use colored::Colorize;

use arffcsv::{ArffParser, AttributeKind, CodecConfig, ParserConfig, RelationDocument};

use super::truncate;

const MAX_NOMINAL_VALUES: usize = 5;
const PREVIEW_ROWS: usize = 5;
const MAX_COMMENTS: usize = 10;

pub fn run(
    input: PathBuf,
    missing: String,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = ArffParser::with_config(ParserConfig {
        codec: CodecConfig {
            missing_value: missing.clone(),
            ..Default::default()
        },
    });
    let doc = parser.parse_file(&input)?;

    if json_output {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "relation": doc.relation_name,
            "instances": doc.row_count(),
            "sparse": doc.is_sparse,
            "attributes": doc.attributes,
            "comments": doc.comments,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "ARFF file:".cyan().bold(),
        input.display().to_string().white()
    );
    println!("Relation:   {}", doc.relation_name.white().bold());
    println!("Attributes: {}", doc.attributes.len());
    println!("Instances:  {}", doc.row_count());
    println!("Format:     {}", if doc.is_sparse { "sparse" } else { "dense" });
    println!();

    println!("{}", "Attributes:".yellow().bold());
    for (i, attribute) in doc.attributes.iter().enumerate() {
        let detail = match &attribute.kind {
            AttributeKind::Nominal { values } => {
                let shown: Vec<&str> = values
                    .iter()
                    .take(MAX_NOMINAL_VALUES)
                    .map(String::as_str)
                    .collect();
                if values.len() > MAX_NOMINAL_VALUES {
                    format!("{{{}, ...}} ({} total)", shown.join(", "), values.len())
                } else {
                    format!("{{{}}}", shown.join(", "))
                }
            }
            AttributeKind::Date { format } => match format {
                Some(format) => format!("DATE \"{}\"", format),
                None => "DATE".to_string(),
            },
            kind => kind.keyword().to_uppercase(),
        };
        println!("  {:>3}. {} {}", i + 1, attribute.name.cyan(), detail);
    }
    println!();

    print_preview(&doc, &missing);

    if !doc.comments.is_empty() {
        println!("{}", "Comments:".yellow().bold());
        for comment in doc.comments.iter().take(MAX_COMMENTS) {
            println!("  % {}", comment.dimmed());
        }
        if doc.comments.len() > MAX_COMMENTS {
            println!("  ... ({} total)", doc.comments.len());
        }
    }

    Ok(())
}

fn print_preview(doc: &RelationDocument, missing: &str) {
    if doc.rows.is_empty() {
        println!("{}", "No data rows.".dimmed());
        println!();
        return;
    }

    let shown = doc.rows.len().min(PREVIEW_ROWS);
    println!("{}", format!("Data preview (first {} rows):", shown).yellow().bold());
    println!("  {}", doc.attribute_names().join(" | ").dimmed());
    for row in doc.rows.iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = (0..doc.attributes.len())
            .map(|c| truncate(&row.cell(c).to_plain_string(missing), 20))
            .collect();
        println!("  {}", cells.join(" | "));
    }
    println!();
}
