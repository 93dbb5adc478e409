//! Tool descriptors advertised by the tool server.

use serde::{Deserialize, Serialize};

/// Schema for a tool exposed by the MCP tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: serde_json::Value,
}
