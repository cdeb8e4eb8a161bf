//! Wrapped operation contract
//!
//! The embedding system supplies the operation as a closure
//! `(operation_name, arguments) -> Future<Output = OperationResult>`. Errors
//! are values, so the pipeline can always turn them into a response.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Named arguments of a call
pub type Arguments = serde_json::Map<String, Value>;

/// Result of a wrapped operation
pub type OperationResult = Result<OperationOutput, OperationError>;

/// One block of operation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
    Json { value: Value },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn json(value: Value) -> Self {
        Content::Json { value }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            Content::Json { .. } => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Content::Json { value } => Some(value),
            Content::Text { .. } => None,
        }
    }
}

/// Successful output of a wrapped operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationOutput {
    pub content: Vec<Content>,
}

impl OperationOutput {
    pub fn new(content: Vec<Content>) -> Self {
        Self { content }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Content::text(text)])
    }

    pub fn json(value: Value) -> Self {
        Self::new(vec![Content::json(value)])
    }

    /// JSON view of the output, used as the updater's outcome data
    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.content).unwrap_or(Value::Null)
    }
}

/// Failure of a wrapped operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    #[error("Operation failed: {0}")]
    Failed(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl OperationError {
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::Failed(_) => "failed",
            OperationError::Cancelled => "cancelled",
            OperationError::InvalidArguments(_) => "invalid_arguments",
        }
    }

    /// Structured `success=false` result entry
    pub fn to_failure_value(&self) -> Value {
        json!({
            "success": false,
            "error": self.to_string(),
            "kind": self.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_wire_format() {
        let value = serde_json::to_value(Content::text("hi")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hi"}));
    }

    #[test]
    fn test_failure_value() {
        let v = OperationError::Cancelled.to_failure_value();
        assert_eq!(v["success"], false);
        assert_eq!(v["kind"], "cancelled");
    }
}
