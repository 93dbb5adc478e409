//! Tools discovered at runtime from a remote source such as an MCP server.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::ToolParameters;
use crate::error::ScoutError;

/// Description of one remotely-discovered tool.
#[derive(Debug, Clone)]
pub struct DynamicTool {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
}

/// Source of runtime-discovered tools: enumerates them once and executes
/// them by name afterwards.
#[async_trait]
pub trait DynamicToolProvider: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, ScoutError>;

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
    ) -> Result<serde_json::Value, ScoutError>;
}

/// Presents one discovered tool through the [`Tool`] trait, routing
/// execution back to the provider it came from.
pub struct DynamicToolAdapter {
    provider: Arc<dyn DynamicToolProvider>,
    spec: DynamicTool,
}

impl DynamicToolAdapter {
    pub fn new(provider: Arc<dyn DynamicToolProvider>, spec: DynamicTool) -> Self {
        Self { provider, spec }
    }
}

#[async_trait]
impl Tool for DynamicToolAdapter {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> &str {
        &self.spec.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.spec.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, ScoutError> {
        self.provider.execute_tool(&self.spec.name, args).await
    }
}

/// Materialize every tool a provider knows about as boxed [`Tool`] objects.
pub async fn collect_tools(
    provider: Arc<dyn DynamicToolProvider>,
) -> Result<Vec<Box<dyn Tool>>, ScoutError> {
    let discovered = provider.list_tools().await?;
    Ok(discovered
        .into_iter()
        .map(|spec| Box::new(DynamicToolAdapter::new(provider.clone(), spec)) as Box<dyn Tool>)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoProvider;

    #[async_trait]
    impl DynamicToolProvider for EchoProvider {
        async fn list_tools(&self) -> Result<Vec<DynamicTool>, ScoutError> {
            Ok(vec![DynamicTool {
                name: "echo".into(),
                description: "echo arguments back".into(),
                parameters: ToolParameters::empty(),
            }])
        }

        async fn execute_tool(
            &self,
            name: &str,
            args: &ToolArguments,
        ) -> Result<serde_json::Value, ScoutError> {
            Ok(json!({"tool": name, "args": args.raw()}))
        }
    }

    #[tokio::test]
    async fn collect_tools_wraps_discovered_tools() {
        let tools = collect_tools(Arc::new(EchoProvider)).await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "echo");

        let result = tools[0]
            .execute(&ToolArguments::new(json!({"q": "hi"})))
            .await
            .unwrap();
        assert_eq!(result["tool"], "echo");
        assert_eq!(result["args"]["q"], "hi");
    }

    #[tokio::test]
    async fn empty_provider_yields_no_tools() {
        struct EmptyProvider;

        #[async_trait]
        impl DynamicToolProvider for EmptyProvider {
            async fn list_tools(&self) -> Result<Vec<DynamicTool>, ScoutError> {
                Ok(Vec::new())
            }

            async fn execute_tool(
                &self,
                name: &str,
                _args: &ToolArguments,
            ) -> Result<serde_json::Value, ScoutError> {
                Err(ScoutError::ToolExecution {
                    tool_name: name.to_string(),
                    message: "no tools available".into(),
                })
            }
        }

        let tools = collect_tools(Arc::new(EmptyProvider)).await.unwrap();
        assert!(tools.is_empty());
    }
}
