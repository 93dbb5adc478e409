//! Model Context Protocol (MCP) client and tool bridge.

pub mod bridge;
pub mod client;
pub mod schema;

pub use bridge::ToolServerAdapter;
pub use client::{ToolInvocation, ToolServerClient};
pub use schema::ToolSchema;
