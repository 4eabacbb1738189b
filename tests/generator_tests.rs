//! Schema generation tests

use chrono::{TimeZone, Utc};
use uml_schema_sdk::export::sql::rules::Rule;
use uml_schema_sdk::export::sql::{GenerationResult, GeneratorOptions, SchemaGenerator};
use uml_schema_sdk::models::{ClassNode, CollisionPolicy, Diagram, RelationshipEdge, RelationshipKind};

fn generate(diagram: &Diagram) -> GenerationResult {
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap();
    SchemaGenerator::default().generate_at(diagram, at)
}

fn class(id: &str, name: &str) -> ClassNode {
    ClassNode::new(id, name)
}

fn edge(kind: RelationshipKind, from: &str, to: &str, mf: &str, mt: &str) -> RelationshipEdge {
    RelationshipEdge::new(kind, from, to).with_multiplicities(mf, mt)
}

fn rules(result: &GenerationResult) -> Vec<Rule> {
    result.applied_rules.iter().map(|a| a.rule).collect()
}

#[test]
fn test_single_class_table() {
    let diagram = Diagram::new(
        vec![class("1", "Person").with_attributes(["+ age: int"])],
        vec![],
    );
    let result = generate(&diagram);

    assert!(result.sql.contains(
        "-- Table for class person\n\
         CREATE TABLE IF NOT EXISTS person (\n  id BIGSERIAL PRIMARY KEY,\n  age integer\n);\n"
    ));
    assert_eq!(result.statistics.class_count, 1);
    assert_eq!(result.statistics.table_count, 1);
    assert!(result.applied_rules.is_empty());
}

#[test]
fn test_full_script_layout() {
    let diagram = Diagram::new(vec![class("1", "Tag")], vec![]);
    let result = generate(&diagram);

    assert_eq!(
        result.sql,
        "-- Generated from class diagram\n\
         -- Date: 2024-05-17T09:00:00Z\n\
         -- Classes: 1, Relationships: 0\n\
         \n\
         -- Table for class tag\n\
         CREATE TABLE IF NOT EXISTS tag (\n  id BIGSERIAL PRIMARY KEY,\n  data jsonb\n);\n\
         \n\
         -- End of generated script\n\
         -- Total tables: 1\n\
         -- Total relationships processed: 0\n"
    );
}

#[test]
fn test_many_to_many_join_table() {
    let diagram = Diagram::new(
        vec![class("a", "A"), class("b", "B")],
        vec![edge(RelationshipKind::Association, "a", "b", "*", "*")],
    );
    let result = generate(&diagram);

    assert!(result.sql.contains("CREATE TABLE IF NOT EXISTS a (\n"));
    assert!(result.sql.contains("CREATE TABLE IF NOT EXISTS b (\n"));
    assert!(result.sql.contains(
        "CREATE TABLE IF NOT EXISTS a_b_rel (\n\
         \x20 id BIGSERIAL PRIMARY KEY,\n\
         \x20 a_id BIGINT NOT NULL,\n\
         \x20 b_id BIGINT NOT NULL,\n\
         \x20 UNIQUE (a_id, b_id),\n\
         \x20 CONSTRAINT fk_a_b_rel_a FOREIGN KEY (a_id) REFERENCES a(id) ON DELETE CASCADE,\n\
         \x20 CONSTRAINT fk_a_b_rel_b FOREIGN KEY (b_id) REFERENCES b(id) ON DELETE CASCADE\n\
         );\n"
    ));
    assert_eq!(result.statistics.table_count, 3);
    assert_eq!(rules(&result), [Rule::ManyToMany]);
}

#[test]
fn test_composition_replaces_primary_key() {
    let diagram = Diagram::new(
        vec![class("a", "A"), class("b", "B")],
        vec![edge(RelationshipKind::Composition, "a", "b", "1", "*")],
    );
    let sql = generate(&diagram).sql;

    assert!(sql.contains("ALTER TABLE b ADD COLUMN IF NOT EXISTS a_id BIGINT NOT NULL;\n"));
    assert!(sql.contains("ALTER TABLE b DROP CONSTRAINT IF EXISTS b_pkey;\n"));
    assert!(sql.contains("ALTER TABLE b ADD CONSTRAINT b_pkey PRIMARY KEY (id, a_id);\n"));
    assert!(sql.contains(
        "ALTER TABLE b ADD CONSTRAINT fk_b_a FOREIGN KEY (a_id) REFERENCES a(id) ON DELETE CASCADE;\n"
    ));
    assert!(!sql.contains("ALTER TABLE a ADD COLUMN"));
}

#[test]
fn test_self_loop_adds_parent_reference() {
    let diagram = Diagram::new(
        vec![class("a", "A")],
        vec![edge(RelationshipKind::Association, "a", "a", "*", "*")],
    );
    let result = generate(&diagram);

    assert!(result.sql.contains("ALTER TABLE a ADD COLUMN IF NOT EXISTS parent_id BIGINT;\n"));
    assert!(result.sql.contains(
        "ALTER TABLE a ADD CONSTRAINT fk_a_parent FOREIGN KEY (parent_id) REFERENCES a(id) ON DELETE SET NULL;\n"
    ));
    assert!(!result.sql.contains("_rel"));
    assert_eq!(rules(&result), [Rule::SelfReference]);
    assert_eq!(result.statistics.table_count, 1);
}

#[test]
fn test_recursive_many_to_many() {
    let diagram = Diagram::new(
        vec![class("s", "S"), class("t", "T")],
        vec![
            edge(RelationshipKind::Association, "s", "t", "1", "*"),
            edge(RelationshipKind::Association, "s", "t", "1", "*"),
        ],
    );
    let result = generate(&diagram);

    assert!(!result.sql.contains("CREATE TABLE IF NOT EXISTS t ("));
    assert!(result.sql.contains(
        "CREATE TABLE IF NOT EXISTS s_recursiva_rel (\n\
         \x20 s_id1 BIGINT NOT NULL,\n\
         \x20 s_id2 BIGINT NOT NULL,\n\
         \x20 PRIMARY KEY (s_id1, s_id2),\n\
         \x20 CONSTRAINT fk_s_recursiva_rel_s_1 FOREIGN KEY (s_id1) REFERENCES s(id) ON DELETE CASCADE,\n\
         \x20 CONSTRAINT fk_s_recursiva_rel_s_2 FOREIGN KEY (s_id2) REFERENCES s(id) ON DELETE CASCADE,\n\
         \x20 CONSTRAINT chk_s_recursiva_rel_distinct CHECK (s_id1 <> s_id2)\n\
         );\n"
    ));
    assert_eq!(result.sql.matches("s_recursiva_rel (").count(), 1);
    assert_eq!(rules(&result), [Rule::RecursiveManyToMany]);
}

#[test]
fn test_single_qualifying_edge_is_one_to_many() {
    let diagram = Diagram::new(
        vec![class("s", "S"), class("t", "T")],
        vec![edge(RelationshipKind::Association, "s", "t", "1", "*")],
    );
    let result = generate(&diagram);

    assert!(result.sql.contains("CREATE TABLE IF NOT EXISTS t ("));
    assert!(!result.sql.contains("recursiva"));
    assert!(result.sql.contains("ALTER TABLE t ADD COLUMN IF NOT EXISTS s_id BIGINT;\n"));
    assert!(result.sql.contains(
        "ALTER TABLE t ADD CONSTRAINT fk_t_s FOREIGN KEY (s_id) REFERENCES s(id) ON DELETE SET NULL;\n"
    ));
    assert_eq!(rules(&result), [Rule::OneToMany]);
}

#[test]
fn test_three_qualifying_edges_fall_through() {
    let e = || edge(RelationshipKind::Association, "s", "t", "1", "*");
    let diagram = Diagram::new(vec![class("s", "S"), class("t", "T")], vec![e(), e(), e()]);
    let result = generate(&diagram);

    assert!(result.sql.contains("CREATE TABLE IF NOT EXISTS t ("));
    assert_eq!(rules(&result), [Rule::OneToMany, Rule::OneToMany, Rule::OneToMany]);
}

#[test]
fn test_generalization() {
    let diagram = Diagram::new(
        vec![class("p", "Person"), class("s", "Student")],
        vec![edge(RelationshipKind::Generalization, "p", "s", "", "")],
    );
    let sql = generate(&diagram).sql;

    assert!(sql.contains("ALTER TABLE student ADD COLUMN IF NOT EXISTS person_id BIGINT;\n"));
    assert!(sql.contains(
        "ALTER TABLE student ADD CONSTRAINT fk_student_person FOREIGN KEY (person_id) REFERENCES person(id) ON DELETE CASCADE;\n"
    ));
    assert!(sql.contains(
        "ALTER TABLE student ADD COLUMN IF NOT EXISTS tipo_student VARCHAR(50) DEFAULT 'student';\n"
    ));
    assert!(sql.contains("CREATE INDEX IF NOT EXISTS idx_student_person_id ON student(person_id);\n"));
    assert!(sql.contains("CREATE INDEX IF NOT EXISTS idx_student_tipo ON student(tipo_student);\n"));
}

#[test]
fn test_missing_endpoint_is_a_comment() {
    let diagram = Diagram::new(
        vec![class("a", "A")],
        vec![edge(RelationshipKind::Composition, "a", "ghost", "1", "*")],
    );
    let result = generate(&diagram);

    assert!(result.sql.contains("-- Skipped Composition relationship from a to ghost: class not found\n"));
    assert!(!result.sql.contains("ALTER TABLE"));
    assert_eq!(result.statistics.relationship_count, 1);
}

#[test]
fn test_every_edge_handled_exactly_once() {
    let diagram = Diagram::new(
        vec![class("a", "A"), class("b", "B"), class("c", "C"), class("j", "Link")],
        vec![
            edge(RelationshipKind::Association, "a", "j", "1", "*"),
            edge(RelationshipKind::Aggregation, "a", "b", "1", "*"),
            edge(RelationshipKind::Association, "b", "c", "*", "*"),
            edge(RelationshipKind::Association, "a", "j", "1", "*"),
            edge(RelationshipKind::Association, "c", "j", "1", "1"),
            edge(RelationshipKind::Generalization, "a", "c", "", ""),
            edge(RelationshipKind::Association, "b", "b", "", ""),
            edge(RelationshipKind::Association, "b", "missing", "1", "*"),
            edge(RelationshipKind::Association, "a", "b", "1", "1"),
        ],
    );
    let result = generate(&diagram);

    let mut handled: Vec<usize> = result
        .applied_rules
        .iter()
        .flat_map(|a| a.edges.iter().copied())
        .collect();
    handled.sort_unstable();
    assert_eq!(handled, (0..diagram.relationships.len()).collect::<Vec<_>>());

    assert_eq!(
        rules(&result),
        [
            Rule::RecursiveManyToMany,
            Rule::Aggregation,
            Rule::ManyToMany,
            Rule::MissingEndpoint,
            Rule::Generalization,
            Rule::SelfReference,
            Rule::MissingEndpoint,
            Rule::Fallback,
        ]
    );
    assert_eq!(result.statistics.table_count, 5);
}

#[test]
fn test_every_statement_is_guarded() {
    let diagram = Diagram::new(
        vec![class("a", "A"), class("b", "B"), class("c", "C")],
        vec![
            edge(RelationshipKind::Composition, "a", "b", "1", "*"),
            edge(RelationshipKind::Generalization, "a", "c", "", ""),
            edge(RelationshipKind::Aggregation, "b", "c", "*", "1"),
            edge(RelationshipKind::Association, "a", "c", "*", "*"),
            edge(RelationshipKind::Association, "c", "c", "", ""),
        ],
    );
    let sql = generate(&diagram).sql;

    for line in sql.lines() {
        let line = line.trim_start();
        if line.starts_with("CREATE TABLE") || line.starts_with("CREATE INDEX") {
            assert!(line.contains("IF NOT EXISTS"), "unguarded: {}", line);
        }
        if line.contains("ADD COLUMN") {
            assert!(line.contains("ADD COLUMN IF NOT EXISTS"), "unguarded: {}", line);
        }
        if line.contains("DROP CONSTRAINT") {
            assert!(line.contains("DROP CONSTRAINT IF EXISTS"), "unguarded: {}", line);
        }
    }

    // constraint changes only ever happen inside a DO block
    let mut in_block = false;
    for line in sql.lines() {
        if line == "DO $$" {
            in_block = true;
        } else if line == "END $$;" {
            in_block = false;
        } else if line.contains("ALTER TABLE") && line.contains("CONSTRAINT") {
            assert!(in_block, "constraint change outside guard: {}", line);
        }
    }
}

#[test]
fn test_output_is_deterministic() {
    let diagram = Diagram::new(
        vec![class("a", "A"), class("b", "B")],
        vec![
            edge(RelationshipKind::Association, "a", "b", "*", "*"),
            edge(RelationshipKind::Composition, "a", "b", "", ""),
        ],
    );
    assert_eq!(generate(&diagram).sql, generate(&diagram).sql);

    let generator = SchemaGenerator::default();
    let strip = |sql: String| {
        sql.lines()
            .filter(|line| !line.starts_with("-- Date:"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(
        strip(generator.generate(&diagram).sql),
        strip(generator.generate(&diagram).sql)
    );
}

#[test]
fn test_collisions_warn_by_default() {
    let diagram = Diagram::new(vec![class("1", "Line Item"), class("2", "line_item")], vec![]);
    let result = generate(&diagram);

    assert_eq!(result.sql.matches("CREATE TABLE IF NOT EXISTS line_item (").count(), 2);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("line_item"));
}

#[test]
fn test_collisions_suffixed_on_request() {
    let diagram = Diagram::new(
        vec![class("1", "Line Item"), class("2", "line_item")],
        vec![edge(RelationshipKind::Association, "1", "2", "1", "*")],
    );
    let generator = SchemaGenerator::new(GeneratorOptions {
        collision_policy: CollisionPolicy::Suffix,
        include_banner: false,
    });
    let result = generator.generate(&diagram);

    assert!(result.sql.starts_with("-- Table for class line_item\n"));
    assert!(result.sql.contains("CREATE TABLE IF NOT EXISTS line_item_2 ("));
    assert!(result.sql.contains("ALTER TABLE line_item_2 ADD COLUMN IF NOT EXISTS line_item_id BIGINT;\n"));
    assert!(!result.sql.contains("-- End of generated script"));
}

#[test]
fn test_inheritance_cycle_is_reported() {
    let diagram = Diagram::new(
        vec![class("a", "Animal"), class("d", "Dog")],
        vec![
            edge(RelationshipKind::Generalization, "a", "d", "", ""),
            edge(RelationshipKind::Generalization, "d", "a", "", ""),
        ],
    );
    let result = generate(&diagram);

    assert_eq!(rules(&result), [Rule::Generalization, Rule::Generalization]);
    assert!(result.warnings.iter().any(|w| w.contains("inheritance cycle")));
}
