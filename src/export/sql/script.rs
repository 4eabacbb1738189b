//! Script assembly: banner, class tables, relationship DDL, trailer

use super::ddl::{DdlStatement, render_block};
use super::rules::RuleApplication;
use super::GenerationStatistics;
use chrono::{DateTime, SecondsFormat, Utc};

/// Concatenate the generated blocks into one script.
///
/// The banner and trailer are plain comments; `generated_at` only ever appears on the
/// `-- Date:` line.
pub fn assemble(
    tables: &[Vec<DdlStatement>],
    applications: &[RuleApplication],
    statistics: &GenerationStatistics,
    generated_at: Option<DateTime<Utc>>,
) -> String {
    let mut sql = String::new();

    if let Some(at) = generated_at {
        sql.push_str("-- Generated from class diagram\n");
        sql.push_str(&format!(
            "-- Date: {}\n",
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        sql.push_str(&format!(
            "-- Classes: {}, Relationships: {}\n\n",
            statistics.class_count, statistics.relationship_count
        ));
    }

    for block in tables {
        sql.push_str(&render_block(block));
    }
    for application in applications {
        sql.push_str(&render_block(&application.statements));
    }

    if generated_at.is_some() {
        sql.push_str("-- End of generated script\n");
        sql.push_str(&format!("-- Total tables: {}\n", statistics.table_count));
        sql.push_str(&format!(
            "-- Total relationships processed: {}\n",
            statistics.relationship_count
        ));
    }

    sql
}
