//! Diagram import tests

use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use uml_schema_sdk::api::{ApiResponse, handle_generate_request};
use uml_schema_sdk::export::sql::SchemaGenerator;
use uml_schema_sdk::import::{DiagramImporter, ImportError};
use uml_schema_sdk::models::{Multiplicity, RelationshipKind};

#[test]
fn test_import_flattens_boards_in_order() {
    let document = json!([
        [
            {"type": "Class", "id": "1", "name": "Author", "attributes": ["+ name: string"]},
            {"type": "Note", "text": "ignored"}
        ],
        [
            {"type": "Class", "id": "2", "name": "Book", "attributes": null, "methods": ["+ read()"]},
            {"type": "Association", "from": "1", "to": "2", "multiplicityFrom": "1", "multiplicityTo": "0..*", "label": "writes"}
        ]
    ]);
    let result = DiagramImporter::new().import_value(document).unwrap();

    assert_eq!(result.board_count, 2);
    let names: Vec<&str> = result.diagram.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Author", "Book"]);
    assert!(result.diagram.classes[1].attributes.is_empty());

    let rel = &result.diagram.relationships[0];
    assert_eq!(rel.kind, RelationshipKind::Association);
    assert_eq!(rel.multiplicity_from, Multiplicity::One);
    assert_eq!(rel.multiplicity_to, Multiplicity::Many);
    assert_eq!(rel.label, "writes");
    assert!(result.warnings.is_empty());
}

#[test]
fn test_numeric_ids_match_string_references() {
    let document = json!({
        "elementsByBoard": [[
            {"type": "Class", "id": 1700000000001u64, "name": "A"},
            {"type": "Class", "id": 1700000000002u64, "name": "B"},
            {"type": "Composition", "from": 1700000000001u64, "to": "1700000000002"}
        ]]
    });
    let result = DiagramImporter::new().import_value(document).unwrap();
    let rel = &result.diagram.relationships[0];
    assert!(result.diagram.class(&rel.from).is_some());
    assert!(result.diagram.class(&rel.to).is_some());
}

#[test]
fn test_import_yaml_file() {
    let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
    writeln!(
        file,
        r#"elementsByBoard:
  - - type: Class
      id: p
      name: Person
      attributes:
        - "+ birthday: date"
    - type: Class
      id: e
      name: Employee
    - type: Generalization
      from: p
      to: e"#
    )
    .unwrap();
    file.flush().unwrap();

    let result = DiagramImporter::new().import_file(file.path()).unwrap();
    assert_eq!(result.diagram.classes.len(), 2);
    assert_eq!(result.diagram.relationships[0].kind, RelationshipKind::Generalization);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = DiagramImporter::new()
        .import_file(std::path::Path::new("/nonexistent/diagram.json"))
        .unwrap_err();
    assert!(matches!(err, ImportError::IoError(_)));
}

#[test]
fn test_editor_request_end_to_end() {
    let body = json!({
        "elementosPorPizarra": [[
            {"tipo": "Class", "id": 10, "name": "Curso", "attributes": ["+ titulo: string", "+ creditos: int"]},
            {"tipo": "Class", "id": 11, "name": "Alumno", "attributes": ["- id: int", "- activo: bool"]},
            {"tipo": "Aggregation", "from": 10, "to": 11, "multOrigen": "1", "multDestino": "*"}
        ]]
    });
    let response = handle_generate_request(&body.to_string(), &SchemaGenerator::default());

    let ApiResponse::Generated(response) = response else {
        panic!("expected a generated response");
    };
    assert!(response.success);
    assert!(response.sql.contains("  attr_id integer,\n  activo boolean\n"));
    assert!(response.sql.contains("ALTER TABLE alumno ADD COLUMN IF NOT EXISTS curso_id BIGINT;\n"));
    assert_eq!(response.statistics.table_count, 2);
}

#[test]
fn test_request_with_non_list_boards_is_rejected() {
    let response = handle_generate_request(
        r#"{"elementsByBoard": {"type": "Class"}}"#,
        &SchemaGenerator::default(),
    );
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"success": false, "error": "Invalid input shape: elementsByBoard must be a list of boards"}));
}
