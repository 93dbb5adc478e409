//! Bridge tool-server tools into the Scout tool system.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ScoutError;
use crate::tools::arguments::ToolArguments;
use crate::tools::dynamic::{DynamicTool, DynamicToolProvider};
use crate::tools::types::ToolParameters;

use super::client::ToolServerClient;
use super::schema::ToolSchema;

/// Adapts the tool-server client to the [`DynamicToolProvider`] trait, so
/// the reasoning loop invokes remote tools through plain [`crate::tools::Tool`]
/// objects without knowing about MCP.
pub struct ToolServerAdapter {
    client: Arc<ToolServerClient>,
}

impl ToolServerAdapter {
    pub fn new(client: Arc<ToolServerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynamicToolProvider for ToolServerAdapter {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, ScoutError> {
        let tools = self.client.list_tools().await?;
        Ok(tools.into_iter().map(map_schema_to_dynamic).collect())
    }

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
    ) -> Result<serde_json::Value, ScoutError> {
        let invocation = self.client.call_tool(name, args.raw().clone()).await?;
        Ok(invocation.into_payload())
    }
}

fn map_schema_to_dynamic(tool: ToolSchema) -> DynamicTool {
    DynamicTool {
        name: tool.name,
        description: tool.description.unwrap_or_default(),
        parameters: ToolParameters::from_schema(tool.input_schema),
    }
}
