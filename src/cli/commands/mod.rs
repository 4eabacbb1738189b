//! CLI command implementations

pub mod generate;
pub mod validate;

use crate::cli::error::CliError;
use crate::import::{DiagramImporter, ImportResult};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Load and import a diagram from a file or stdin (`-`)
///
/// Files ending in `.yaml`/`.yml` are read as YAML; everything else, stdin
/// included, as JSON.
pub fn load_diagram(input: &str) -> Result<ImportResult, CliError> {
    let importer = DiagramImporter::new();

    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        return Ok(importer.import_json(&content)?);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        return Err(CliError::FileNotFound(path));
    }
    let content =
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
    let result = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => importer.import_yaml(&content)?,
        _ => importer.import_json(&content)?,
    };
    Ok(result)
}

/// Check if file exists and handle overwrite
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Write output to file, creating parent directories if needed
pub fn write_output(output_path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                output_path.to_path_buf(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }

    std::fs::write(output_path, content)
        .map_err(|e| CliError::FileWriteError(output_path.to_path_buf(), e.to_string()))
}
