//! Validate command implementation

use super::load_diagram;
use crate::cli::error::CliError;
use crate::validation::{DiagramValidationReport, validate_diagram};

/// Handle the validate command
///
/// Prints every finding. Orphaned relationships, inheritance cycles, naming
/// collisions and invalid table names fail the command; self-references are
/// reported only.
pub fn handle_validate(input: &str) -> Result<(), CliError> {
    let imported = load_diagram(input)?;
    for warning in &imported.warnings {
        println!("⚠️  Skipped {}", warning);
    }

    let report = validate_diagram(&imported.diagram);
    print_report(&report);

    if !report.is_clean() {
        return Err(CliError::ValidationFailed(format!(
            "{} problem(s) found",
            problem_count(&report)
        )));
    }

    println!(
        "Validation successful: {} classes, {} relationships",
        imported.diagram.classes.len(),
        imported.diagram.relationships.len()
    );
    Ok(())
}

fn problem_count(report: &DiagramValidationReport) -> usize {
    report.tables.naming_conflicts.len()
        + report.tables.invalid_names.len()
        + report.relationships.orphaned.len()
        + report.relationships.generalization_cycles.len()
}

fn print_report(report: &DiagramValidationReport) {
    for conflict in &report.tables.naming_conflicts {
        println!(
            "❌ Classes '{}' ({}) and '{}' ({}) both map to table '{}'",
            conflict.existing_class_name,
            conflict.existing_class_id,
            conflict.new_class_name,
            conflict.new_class_id,
            conflict.table_name
        );
    }
    for invalid in &report.tables.invalid_names {
        println!("❌ Class {}: {}", invalid.class_id, invalid.error);
    }
    for orphan in &report.relationships.orphaned {
        let missing: Vec<&str> = [
            (!orphan.from_exists).then_some(orphan.from.as_str()),
            (!orphan.to_exists).then_some(orphan.to.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect();
        println!(
            "❌ Relationship {} ({} -> {}) references unknown class {}",
            orphan.edge_index,
            orphan.from,
            orphan.to,
            missing.join(", ")
        );
    }
    for cycle in &report.relationships.generalization_cycles {
        println!(
            "❌ Generalization {} closes an inheritance cycle: {}",
            cycle.edge_index,
            cycle.cycle_path.join(" -> ")
        );
    }
    for self_ref in &report.relationships.self_references {
        println!(
            "ℹ️  Relationship {} is a self-reference on class {}",
            self_ref.edge_index, self_ref.class_id
        );
    }
}
