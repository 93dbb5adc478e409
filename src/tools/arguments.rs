//! Typed access to tool-call arguments.

use serde::de::DeserializeOwned;

use crate::error::{Result, ScoutError};

/// Arguments passed to a tool, as produced by the model.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    raw: serde_json::Value,
}

impl ToolArguments {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    /// The raw JSON argument mapping.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Deserialize a single named argument.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .raw
            .get(name)
            .ok_or_else(|| ScoutError::InvalidArgument(format!("missing argument '{name}'")))?;
        serde_json::from_value(value.clone()).map_err(ScoutError::Serialization)
    }
}
