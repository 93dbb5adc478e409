//! Tool trait implemented by every invocable capability.

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::ScoutError;

/// The only surface the reasoning loop sees: a named, described,
/// schema-carrying capability it can invoke with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model addresses this tool by.
    fn name(&self) -> &str;

    /// Description surfaced to the model.
    fn description(&self) -> &str;

    /// Argument schema advertised to the model.
    fn parameters(&self) -> &ToolParameters;

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, ScoutError>;
}
