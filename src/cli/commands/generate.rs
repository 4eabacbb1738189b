//! Generate command implementation

use super::{check_file_overwrite, load_diagram, write_output};
use crate::api::GenerateResponse;
use crate::cli::error::CliError;
use crate::export::sql::{GeneratorOptions, SchemaGenerator};
use std::path::PathBuf;

/// Arguments for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Input file path or `-` for stdin
    pub input: String,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Emit the JSON response envelope instead of the bare script
    pub json: bool,
    pub force: bool,
    pub options: GeneratorOptions,
}

/// Handle the generate command
pub fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    if let Some(output) = &args.output {
        check_file_overwrite(output, args.force)?;
    }

    let imported = load_diagram(&args.input)?;
    for warning in &imported.warnings {
        eprintln!("⚠️  Skipped {}", warning);
    }

    let result = SchemaGenerator::new(args.options.clone()).generate(&imported.diagram);
    for warning in &result.warnings {
        eprintln!("⚠️  {}", warning);
    }

    let content = if args.json {
        let response = GenerateResponse {
            success: true,
            sql: result.sql,
            statistics: result.statistics,
            warnings: result.warnings,
        };
        let mut json = serde_json::to_string_pretty(&response)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize response: {}", e)))?;
        json.push('\n');
        json
    } else {
        result.sql
    };

    match &args.output {
        Some(output) => {
            write_output(output, &content)?;
            eprintln!(
                "✅ Generated {} tables from {} classes and {} relationships to {}",
                result.statistics.table_count,
                result.statistics.class_count,
                result.statistics.relationship_count,
                output.display()
            );
        }
        None => print!("{}", content),
    }

    Ok(())
}
