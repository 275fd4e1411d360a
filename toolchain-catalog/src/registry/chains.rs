//! Tool chain registry.

use super::{ToolChain, ToolId, ToolRegistry};
use crate::config::CatalogConfig;
use crate::errors::RegistryError;
use tracing::{debug, info};

/// Character used to pad stored strings up to the configured capacity.
pub const PADDING_CHAR: char = '\0';

/// Strips trailing padding from a stored chain string.
#[must_use]
pub fn trim_padding(value: &str) -> &str {
    value.trim_end_matches(PADDING_CHAR)
}

/// Pads `value` with NUL until its UTF-8 length reaches `capacity` bytes.
fn pad_to(value: &mut String, capacity: usize) {
    let len = value.len();
    if len < capacity {
        value.extend(std::iter::repeat(PADDING_CHAR).take(capacity - len));
    }
}

/// One launch value seen while registering a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchValue {
    /// Tool the value was launched with.
    pub tool: ToolId,
    /// Argument name.
    pub name: String,
    /// Launch value.
    pub value: String,
}

/// Outcome of registering a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistration {
    /// Index of the stored chain.
    pub index: usize,
    /// Values appended to a tool's argument history.
    pub recorded: Vec<LaunchValue>,
    /// Values whose argument the tool does not recognize.
    pub ignored: Vec<LaunchValue>,
}

/// Registers tool chains together with their launch configurations.
///
/// Chains are copied in on insertion and never removed, so an index stays
/// valid for the registry's lifetime.
#[derive(Debug)]
pub struct ToolChainRegistry {
    chains: Vec<ToolChain>,
    field_capacity: Option<usize>,
    record_launch_history: bool,
}

impl Default for ToolChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolChainRegistry {
    /// Creates a new empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CatalogConfig::default())
    }

    /// Creates a new empty registry using `config`.
    #[must_use]
    pub fn with_config(config: &CatalogConfig) -> Self {
        Self {
            chains: Vec::new(),
            field_capacity: config.field_capacity,
            record_launch_history: config.record_launch_history,
        }
    }

    /// Inserts a copy of `chain`.
    ///
    /// Every launch value of every step is first appended to the history of
    /// the step's tool. Values for arguments the tool does not recognize are
    /// skipped. Fails without any mutation if a step refers to a tool that is
    /// not in `tools`.
    pub fn insert_tool_chain(
        &mut self,
        chain: &ToolChain,
        tools: &mut ToolRegistry,
    ) -> Result<ChainRegistration, RegistryError> {
        for entry in &chain.entries {
            tools.tool(entry.tool)?;
        }

        let mut recorded = Vec::new();
        let mut ignored = Vec::new();

        if self.record_launch_history {
            for entry in &chain.entries {
                let tool = tools.tool_mut(entry.tool)?;
                for (name, value) in &entry.launch_args {
                    let seen = LaunchValue {
                        tool: entry.tool,
                        name: name.clone(),
                        value: value.clone(),
                    };
                    match tool.add_arg_val(name, value.as_str()) {
                        Ok(()) => recorded.push(seen),
                        Err(err) => {
                            debug!(tool = %entry.tool, error = %err, "Launch value not recorded");
                            ignored.push(seen);
                        }
                    }
                }
            }
        }

        let mut stored = chain.clone();
        if let Some(capacity) = self.field_capacity {
            pad_to(&mut stored.description, capacity);
            for entry in &mut stored.entries {
                for value in entry.launch_args.values_mut() {
                    pad_to(value, capacity);
                }
            }
        }

        let index = self.chains.len();
        self.chains.push(stored);
        info!(
            index,
            steps = chain.entries.len(),
            recorded = recorded.len(),
            ignored = ignored.len(),
            "Registered tool chain"
        );

        Ok(ChainRegistration {
            index,
            recorded,
            ignored,
        })
    }

    /// All stored chains in insertion order.
    #[must_use]
    pub fn get_entries(&self) -> &[ToolChain] {
        &self.chains
    }

    /// Returns the chain stored at `index`.
    pub fn get(&self, index: usize) -> Result<&ToolChain, RegistryError> {
        self.chains
            .get(index)
            .ok_or(RegistryError::ChainNotFound { index })
    }

    /// Number of stored chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns true if no chains are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
