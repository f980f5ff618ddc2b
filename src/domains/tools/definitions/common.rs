//! Payload helpers shared by the calendar tools.
//!
//! Every tool answers with exactly one text content item holding a JSON
//! object: the result on success, `{"error": "..."}` on failure.

use std::fmt::Display;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domains::tools::ToolError;

/// Create a success result with the JSON encoding of `value`.
pub fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_result(format!("Failed to encode result: {}", e)),
    }
}

/// Create an error result with a `{"error": message}` payload.
pub fn error_result(message: impl Display) -> CallToolResult {
    let message = message.to_string();
    warn!("{}", message);
    let payload = serde_json::json!({ "error": message });
    CallToolResult::error(vec![Content::text(payload.to_string())])
}

/// Deserialize tool arguments, rendering failures as an error payload.
pub fn parse_arguments<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, CallToolResult> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| error_result(ToolError::invalid_arguments(e.to_string())))
}

/// Reject missing or blank required string fields.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "'{}' must be a non-empty string",
            field
        )));
    }
    Ok(())
}

/// Treat blank optional strings as absent.
pub fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_error_result_payload() {
        let result = error_result("boom");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
        let payload: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(payload, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn test_json_result_payload() {
        let result = json_result(&serde_json::json!({"meetings": []}));
        assert_ne!(result.is_error, Some(true));
        assert_eq!(text_of(&result), r#"{"meetings":[]}"#);
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("summary", "Standup").is_ok());
        assert!(require_non_empty("summary", "   ").is_err());
        assert!(require_non_empty("summary", "").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(&"Room 1".to_string())), Some("Room 1".to_string()));
        assert_eq!(non_blank(Some(&" ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
