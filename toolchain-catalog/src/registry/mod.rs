//! Registries for tools and tool chains.
//!
//! The [`ToolRegistry`] owns every tool; chains refer to tools through
//! [`ToolId`] handles. The [`ToolChainRegistry`] stores chain snapshots and
//! feeds their launch values back into tool argument histories.

mod chain;
mod chains;
mod tools;

pub use chain::{LaunchArgs, ToolChain, ToolChainEntry};
pub use chains::{trim_padding, ChainRegistration, LaunchValue, ToolChainRegistry, PADDING_CHAR};
pub use tools::{ToolId, ToolRegistry};
