//! Session pipeline: answer extraction, fallback synthesis, orchestration.

pub mod analyzer;
pub mod fallback;
pub mod orchestrator;

pub use orchestrator::{Session, TraceEvent, TraceSink, NO_RESPONSE};
