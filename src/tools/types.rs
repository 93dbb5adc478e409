//! Parameter schemas for tools.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The JSON Schema a tool advertises for its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    pub schema: Value,
}

impl ToolParameters {
    pub fn from_schema(schema: Value) -> Self {
        Self { schema }
    }

    /// Schema for a tool taking no arguments.
    pub fn empty() -> Self {
        Self::from_schema(json!({
            "type": "object",
            "properties": {},
            "required": [],
        }))
    }
}
