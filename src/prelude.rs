//! Common imports for Scout users.

pub use crate::config::ScoutConfig;
pub use crate::error::{Result, ScoutError};
pub use crate::reasoning::{Reasoner, ToolLoopReasoner};
pub use crate::session::{Session, NO_RESPONSE};
pub use crate::types::*;
