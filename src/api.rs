//! Request/response contract for schema generation
//!
//! The diagram editor posts a project as `{"elementsByBoard": [[...], ...]}` and gets
//! back the script with its statistics, or `{"success": false, "error": "..."}` when
//! the request is malformed. The CLI's `--json` output and the WASM binding use the
//! same shapes.

use crate::export::sql::{GenerationStatistics, SchemaGenerator};
use crate::import::{DiagramImporter, ImportError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Generation request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// One list of elements per board, concatenated in board order
    #[serde(default, alias = "elementosPorPizarra")]
    pub elements_by_board: Value,
}

/// Successful generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub sql: String,
    pub statistics: GenerationStatistics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Rejected request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl From<ImportError> for ErrorResponse {
    fn from(err: ImportError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

/// Either response shape, serialized without a wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ApiResponse {
    Generated(GenerateResponse),
    Failed(ErrorResponse),
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Generated(_))
    }
}

/// Generate from a decoded request. Fails only when the boards are not a list of lists.
pub fn generate(request: GenerateRequest, generator: &SchemaGenerator) -> Result<GenerateResponse, ImportError> {
    if !request.elements_by_board.is_array() {
        return Err(ImportError::InvalidShape(
            "elementsByBoard must be a list of boards".to_string(),
        ));
    }

    let imported = DiagramImporter::new().import_value(request.elements_by_board)?;
    let result = generator.generate(&imported.diagram);

    let mut warnings: Vec<String> = imported.warnings.iter().map(ToString::to_string).collect();
    warnings.extend(result.warnings);

    Ok(GenerateResponse {
        success: true,
        sql: result.sql,
        statistics: result.statistics,
        warnings,
    })
}

/// Handle a raw JSON request body
///
/// # Example
///
/// ```rust
/// use uml_schema_sdk::api::{ApiResponse, handle_generate_request};
/// use uml_schema_sdk::export::sql::SchemaGenerator;
///
/// let body = r#"{"elementsByBoard": [[{"type": "Class", "id": "1", "name": "Person"}]]}"#;
/// let response = handle_generate_request(body, &SchemaGenerator::default());
/// assert!(response.is_success());
///
/// let response = handle_generate_request(r#"{"elementsByBoard": 3}"#, &SchemaGenerator::default());
/// assert!(!response.is_success());
/// ```
pub fn handle_generate_request(body: &str, generator: &SchemaGenerator) -> ApiResponse {
    let outcome = serde_json::from_str::<GenerateRequest>(body)
        .map_err(|e| ImportError::ParseError(format!("Invalid JSON: {}", e)))
        .and_then(|request| generate(request, generator));

    match outcome {
        Ok(response) => ApiResponse::Generated(response),
        Err(err) => {
            warn!("Rejected generation request: {}", err);
            ApiResponse::Failed(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statistics_serialize_camel_case() {
        let body = json!({
            "elementosPorPizarra": [
                [{"tipo": "Class", "id": 1, "name": "A"}, {"tipo": "Class", "id": 2, "name": "B"}],
                [{"tipo": "Association", "from": 1, "to": 2, "multOrigen": "*", "multDestino": "*"}]
            ]
        });
        let response = handle_generate_request(&body.to_string(), &SchemaGenerator::default());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(
            value["statistics"],
            json!({"classCount": 2, "relationshipCount": 1, "tableCount": 3})
        );
    }

    #[test]
    fn missing_boards_are_rejected() {
        let response = handle_generate_request("{}", &SchemaGenerator::default());
        let ApiResponse::Failed(error) = response else {
            panic!("expected a failure");
        };
        assert!(!error.success);
        assert!(error.error.contains("elementsByBoard"));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let response = handle_generate_request("not json", &SchemaGenerator::default());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(false));
        assert!(value["error"].as_str().unwrap().starts_with("Parse error"));
    }
}
