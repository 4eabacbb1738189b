//! PostgreSQL DDL statements
//!
//! Every statement renders to SQL that is safe to run against a database that
//! already holds the schema: tables use `IF NOT EXISTS`, columns use
//! `ADD COLUMN IF NOT EXISTS`, and constraint changes run inside a `DO $$` block
//! guarded by an `information_schema` lookup.

use crate::models::{Column, ForeignKey, Index, Table};
use serde::{Deserialize, Serialize};

/// One DDL statement (or comment) of the generated script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "statement", rename_all = "camelCase")]
pub enum DdlStatement {
    /// `-- text`, one line per line of text (PostgreSQL ends a line comment at `\n` or `\r`)
    Comment { text: String },
    CreateTable { table: Table },
    AddColumn { table: String, column: Column },
    /// Foreign key added after the fact, skipped when the constraint exists
    AddForeignKey { foreign_key: ForeignKey },
    /// Swap `<table>_pkey` for a key over `columns`, unless it already covers them
    ReplacePrimaryKey { table: String, columns: Vec<String> },
    CreateIndex { index: Index },
}

impl DdlStatement {
    pub fn comment(text: impl Into<String>) -> Self {
        DdlStatement::Comment { text: text.into() }
    }

    /// Render as PostgreSQL, terminated by a newline
    pub fn render(&self) -> String {
        match self {
            DdlStatement::Comment { text } => text
                .split(['\n', '\r'])
                .filter(|line| !line.is_empty())
                .map(|line| format!("-- {}\n", line))
                .collect(),
            DdlStatement::CreateTable { table } => render_create_table(table),
            DdlStatement::AddColumn { table, column } => format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {};\n",
                table,
                column.definition()
            ),
            DdlStatement::AddForeignKey { foreign_key } => render_add_foreign_key(foreign_key),
            DdlStatement::ReplacePrimaryKey { table, columns } => render_replace_primary_key(table, columns),
            DdlStatement::CreateIndex { index } => format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({});\n",
                index.name, index.table, index.column
            ),
        }
    }
}

/// Name PostgreSQL gives a table's primary key constraint
pub fn primary_key_name(table: &str) -> String {
    format!("{}_pkey", table)
}

fn foreign_key_clause(fk: &ForeignKey) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {}(id) ON DELETE {}",
        fk.column, fk.referenced_table, fk.on_delete
    )
}

fn render_create_table(table: &Table) -> String {
    let mut lines: Vec<String> = table.columns.iter().map(Column::definition).collect();

    if let Some(key) = &table.composite_key {
        lines.push(format!("PRIMARY KEY ({})", key.join(", ")));
    }
    for unique in &table.unique_keys {
        lines.push(format!("UNIQUE ({})", unique.join(", ")));
    }
    for fk in &table.foreign_keys {
        lines.push(format!("CONSTRAINT {} {}", fk.name, foreign_key_clause(fk)));
    }
    for check in &table.checks {
        lines.push(format!("CONSTRAINT {} CHECK ({})", check.name, check.expression));
    }

    let body = lines
        .iter()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n);\n", table.name, body)
}

fn render_add_foreign_key(fk: &ForeignKey) -> String {
    format!(
        "DO $$\n\
         BEGIN\n\
         \x20 IF NOT EXISTS (\n\
         \x20   SELECT 1 FROM information_schema.table_constraints\n\
         \x20   WHERE constraint_name = '{name}' AND table_name = '{table}'\n\
         \x20 ) THEN\n\
         \x20   ALTER TABLE {table} ADD CONSTRAINT {name} {clause};\n\
         \x20 END IF;\n\
         END $$;\n",
        name = fk.name,
        table = fk.table,
        clause = foreign_key_clause(fk),
    )
}

fn render_replace_primary_key(table: &str, columns: &[String]) -> String {
    let pkey = primary_key_name(table);
    let covered = columns
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "DO $$\n\
         BEGIN\n\
         \x20 IF (\n\
         \x20   SELECT count(*) FROM information_schema.key_column_usage\n\
         \x20   WHERE constraint_name = '{pkey}' AND table_name = '{table}'\n\
         \x20     AND column_name IN ({covered})\n\
         \x20 ) < {count} THEN\n\
         \x20   ALTER TABLE {table} DROP CONSTRAINT IF EXISTS {pkey};\n\
         \x20   ALTER TABLE {table} ADD CONSTRAINT {pkey} PRIMARY KEY ({columns});\n\
         \x20 END IF;\n\
         END $$;\n",
        count = columns.len(),
        columns = columns.join(", "),
    )
}

/// Render a group of statements as one blank-line separated block
pub fn render_block(statements: &[DdlStatement]) -> String {
    let mut sql: String = statements.iter().map(DdlStatement::render).collect();
    sql.push('\n');
    sql
}
