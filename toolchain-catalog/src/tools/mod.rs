//! Tools subsystem.
//!
//! This module provides:
//! - Argument recognition and per-argument value history
//! - The tool abstraction and its execution lifecycle
//! - The local (path-backed) tool variant

mod args;
mod local;
mod tool;

pub use args::ArgumentHistory;
pub use local::LocalTool;
pub use tool::{Tool, ToolBackend, ToolKind, ToolOutput};
