//! Tool chain value types.

use super::{trim_padding, ToolId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Argument name to the single value used for one invocation.
pub type LaunchArgs = BTreeMap<String, String>;

/// One step in a tool chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChainEntry {
    /// Tool to be used.
    pub tool: ToolId,
    /// Arguments and values the tool is launched with.
    #[serde(default)]
    pub launch_args: LaunchArgs,
}

impl ToolChainEntry {
    /// Creates a step for `tool` with no launch arguments.
    #[must_use]
    pub fn new(tool: ToolId) -> Self {
        Self {
            tool,
            launch_args: LaunchArgs::new(),
        }
    }

    /// Sets a launch argument.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.launch_args.insert(name.into(), value.into());
        self
    }

    /// Renders the launch arguments as an argv list.
    ///
    /// Each argument name is followed by its value unless the value is empty,
    /// in name order. Storage padding is stripped first, so entries read back
    /// from a padded [`ToolChainRegistry`](super::ToolChainRegistry) render the
    /// same argv as before they were stored.
    #[must_use]
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.launch_args.len() * 2);
        for (name, value) in &self.launch_args {
            argv.push(name.clone());
            let value = trim_padding(value);
            if !value.is_empty() {
                argv.push(value.to_string());
            }
        }
        argv
    }
}

/// A complete tool chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChain {
    /// All steps, in execution order.
    pub entries: Vec<ToolChainEntry>,
    /// Human-readable description.
    pub description: String,
}

impl ToolChain {
    /// Creates an empty chain with a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            description: description.into(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn with_entry(mut self, entry: ToolChainEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Appends a step in place.
    pub fn push(&mut self, entry: ToolChainEntry) {
        self.entries.push(entry);
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;
    use crate::tools::Tool;

    #[test]
    fn test_to_argv_skips_empty_values() {
        let mut registry = ToolRegistry::new();
        let id = registry.insert("cc", Tool::local("/usr/bin/cc")).unwrap();

        let entry = ToolChainEntry::new(id)
            .with_arg("-o", "out")
            .with_arg("-c", "")
            .with_arg("--std", "c11");

        assert_eq!(entry.to_argv(), ["--std", "c11", "-c", "-o", "out"]);
    }

    #[test]
    fn test_to_argv_strips_padding() {
        let mut registry = ToolRegistry::new();
        let id = registry.insert("cc", Tool::local("/usr/bin/cc")).unwrap();

        let mut entry = ToolChainEntry::new(id).with_arg("-o", "out").with_arg("-c", "");
        for value in entry.launch_args.values_mut() {
            value.extend(std::iter::repeat('\0').take(8));
        }

        assert_eq!(entry.to_argv(), ["-c", "-o", "out"]);
    }

    #[test]
    fn test_chain_allows_repeated_steps() {
        let mut registry = ToolRegistry::new();
        let id = registry.insert("t", Tool::local("/bin/t")).unwrap();
        let step = ToolChainEntry::new(id).with_arg("x", "1");

        let chain = ToolChain::new("twice").with_entry(step.clone()).with_entry(step);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.entries[0].tool, chain.entries[1].tool);
    }
}
