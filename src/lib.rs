//! Scout — conversational MCP tool-client agent.
//!
//! Connects to a remote MCP tool server, lets a language model decide which
//! tools to invoke, and reconciles the model's final answer with raw tool
//! output when the model fails to produce one.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use scout::config::ScoutConfig;
//! use scout::mcp::{ToolServerAdapter, ToolServerClient};
//! use scout::reasoning::ToolLoopReasoner;
//! use scout::session::Session;
//!
//! # async fn example() -> scout::error::Result<()> {
//! let config = ScoutConfig::from_env();
//! let provider = scout::provider::create_provider(&config)?;
//! let client = Arc::new(ToolServerClient::connect(config.server_url()).await?);
//! let tools =
//!     scout::tools::dynamic::collect_tools(Arc::new(ToolServerAdapter::new(client))).await?;
//! let session = Session::new(Arc::new(ToolLoopReasoner::new(provider, tools)));
//! let answer = session.answer("what is the phone number of X?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prelude;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tools;
pub mod types;
