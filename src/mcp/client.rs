//! MCP client for the remote tool server.

use rmcp::{
    model::{CallToolRequestParams, CallToolResult, Content, JsonObject, ResourceContents},
    service::{ClientInitializeError, RoleClient, RunningService, ServiceError},
    transport::StreamableHttpClientTransport,
    ServiceExt,
};
use tracing::debug;

use super::schema::ToolSchema;
use crate::error::ScoutError;

pub type ToolServerSession = RunningService<RoleClient, ()>;

/// What the tool server sent back for one invocation.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub structured: Option<serde_json::Value>,
    pub text: Option<String>,
    pub raw_content: Vec<serde_json::Value>,
}

impl ToolInvocation {
    /// The single payload handed to the model: structured content wins,
    /// then joined text, then the raw content records.
    pub fn into_payload(self) -> serde_json::Value {
        match (self.structured, self.text) {
            (Some(value), _) => value,
            (None, Some(text)) => serde_json::Value::String(text),
            (None, None) => serde_json::Value::Array(self.raw_content),
        }
    }
}

/// Client for the MCP tool server.
///
/// Holds one streamable-HTTP session for the lifetime of the process.
/// There is no automatic reconnect: when the session drops, every call
/// fails and reconnecting is the caller's explicit decision.
pub struct ToolServerClient {
    session: ToolServerSession,
}

impl ToolServerClient {
    /// Connect to the tool server and run the MCP initialize handshake.
    pub async fn connect(url: &str) -> Result<Self, ScoutError> {
        debug!(url, "connecting to MCP tool server");
        let transport = StreamableHttpClientTransport::from_uri(url.to_string());
        let session = ().serve(transport).await.map_err(connect_error)?;
        Ok(Self { session })
    }

    /// Wrap an already-running rmcp session (handshake already done).
    pub fn from_session(session: ToolServerSession) -> Self {
        Self { session }
    }

    /// List available tools from the tool server.
    pub async fn list_tools(&self) -> Result<Vec<ToolSchema>, ScoutError> {
        self.ensure_open()?;

        // Some servers reject the paginated list; retry single-page.
        let tools = match self.session.list_all_tools().await {
            Ok(tools) => tools,
            Err(ServiceError::UnexpectedResponse) => {
                self.session
                    .list_tools(None)
                    .await
                    .map_err(|e| rpc_error("list_tools", e))?
                    .tools
            }
            Err(e) => return Err(rpc_error("list_tools", e)),
        };

        Ok(tools.into_iter().map(schema_from_rmcp).collect())
    }

    /// Execute a tool on the tool server.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolInvocation, ScoutError> {
        self.ensure_open()?;

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: normalize_arguments(arguments)?,
            task: None,
        };
        let result = self
            .session
            .call_tool(params)
            .await
            .map_err(|e| rpc_error("call_tool", e))?;

        invocation_from_result(name, result)
    }

    /// Tear the session down explicitly.
    pub async fn disconnect(self) -> Result<(), ScoutError> {
        self.session
            .cancel()
            .await
            .map_err(|e| ScoutError::Connection(format!("MCP shutdown failed: {e}")))?;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ScoutError> {
        if self.session.is_closed() {
            return Err(ScoutError::Connection("MCP session is closed".into()));
        }
        Ok(())
    }
}

fn schema_from_rmcp(tool: rmcp::model::Tool) -> ToolSchema {
    let input_schema = serde_json::Value::Object(tool.input_schema.as_ref().clone());
    ToolSchema {
        name: tool.name.into(),
        description: tool.description.map(String::from),
        input_schema,
    }
}

/// Providers hand arguments over as an object, null, or a JSON-encoded
/// object inside a string; anything else is a caller bug.
fn normalize_arguments(value: serde_json::Value) -> Result<Option<JsonObject>, ScoutError> {
    use serde_json::Value;

    let value = match value {
        Value::String(raw) => {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str(raw.trim()).map_err(|e| {
                ScoutError::InvalidArgument(format!("tool arguments must be valid JSON: {e}"))
            })?
        }
        other => other,
    };

    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(ScoutError::InvalidArgument(format!(
            "tool arguments must be a JSON object; got {other}"
        ))),
    }
}

fn collect_text(content: &[Content]) -> Option<String> {
    let lines: Vec<&str> = content
        .iter()
        .filter_map(|item| {
            if let Some(text) = item.as_text() {
                return Some(text.text.as_str());
            }
            match item.as_resource().map(|r| &r.resource) {
                Some(ResourceContents::TextResourceContents { text, .. }) => Some(text.as_str()),
                _ => None,
            }
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn invocation_from_result(
    name: &str,
    result: CallToolResult,
) -> Result<ToolInvocation, ScoutError> {
    let text = collect_text(&result.content);

    if result.is_error.unwrap_or(false) {
        let message = match (&result.structured_content, &text) {
            (Some(value), _) => value.to_string(),
            (None, Some(text)) => text.clone(),
            (None, None) => "tool returned an error result".into(),
        };
        return Err(ScoutError::ToolExecution {
            tool_name: name.into(),
            message,
        });
    }

    let raw_content = result
        .content
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect();

    Ok(ToolInvocation {
        structured: result.structured_content,
        text,
        raw_content,
    })
}

fn connect_error(error: ClientInitializeError) -> ScoutError {
    let detail = match error {
        ClientInitializeError::ConnectionClosed(context) => {
            format!("connection closed: {context}")
        }
        ClientInitializeError::TransportError { error, context } => {
            format!("transport error ({context}): {error}")
        }
        ClientInitializeError::JsonRpcError(error) => {
            format!("JSON-RPC error {}: {}", error.code.0, error.message)
        }
        ClientInitializeError::Cancelled => "cancelled".into(),
        other => other.to_string(),
    };
    ScoutError::Connection(format!("MCP initialize failed: {detail}"))
}

fn rpc_error(op: &str, error: ServiceError) -> ScoutError {
    match error {
        ServiceError::McpError(e) => ScoutError::Provider {
            provider: "mcp".into(),
            message: format!("{op}: MCP error {}: {}", e.code.0, e.message),
        },
        ServiceError::UnexpectedResponse => ScoutError::Provider {
            provider: "mcp".into(),
            message: format!("{op}: unexpected MCP response"),
        },
        ServiceError::TransportSend(e) => {
            ScoutError::Connection(format!("{op}: MCP transport send failed: {e}"))
        }
        ServiceError::TransportClosed => {
            ScoutError::Connection(format!("{op}: MCP transport closed"))
        }
        ServiceError::Cancelled { reason } => ScoutError::Connection(match reason {
            Some(r) => format!("{op}: MCP request cancelled ({r})"),
            None => format!("{op}: MCP request cancelled"),
        }),
        // The taxonomy has no timeout variant; a timed-out session is
        // treated like a lost connection.
        ServiceError::Timeout { timeout } => ScoutError::Connection(format!(
            "{op}: MCP request timed out after {}ms",
            timeout.as_millis()
        )),
        other => ScoutError::Provider {
            provider: "mcp".into(),
            message: format!("{op}: MCP service error: {other}"),
        },
    }
}
