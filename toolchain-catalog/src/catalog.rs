//! The catalog context object.
//!
//! A [`Catalog`] holds the tool registry and the tool chain registry for one
//! process. It is constructed once at start-up and passed by reference (or as
//! a [`SharedCatalog`]) to every consumer.

use crate::config::CatalogConfig;
use crate::errors::{CatalogError, RegistryError};
use crate::events::{event_data, EventSink, NoOpEventSink};
use crate::registry::{ChainRegistration, ToolChain, ToolChainRegistry, ToolId, ToolRegistry};
use crate::tools::{Tool, ToolOutput};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A catalog guarded by a single lock for multi-threaded callers.
pub type SharedCatalog = Arc<Mutex<Catalog>>;

/// Tools and tool chains known to this process.
pub struct Catalog {
    tools: ToolRegistry,
    chains: ToolChainRegistry,
    config: CatalogConfig,
    sink: Arc<dyn EventSink>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Creates an empty catalog with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates an empty catalog with `config`.
    #[must_use]
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            tools: ToolRegistry::new(),
            chains: ToolChainRegistry::with_config(&config),
            config,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Wraps the catalog in a lock for sharing across threads.
    #[must_use]
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(Mutex::new(self))
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Read access to the tool registry.
    #[must_use]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Read access to the tool chain registry.
    #[must_use]
    pub fn chains(&self) -> &ToolChainRegistry {
        &self.chains
    }

    /// Registers `tool` under `key`.
    pub fn register_tool(&mut self, key: impl Into<String>, tool: Tool) -> Result<ToolId, RegistryError> {
        let key = key.into();
        match self.tools.insert(key.clone(), tool) {
            Ok(id) => {
                self.sink.try_emit(
                    "tool.registered",
                    Some(event_data(serde_json::json!({
                        "key": key,
                        "slot": id.slot(),
                    }))),
                );
                Ok(id)
            }
            Err(err) => {
                self.sink.try_emit(
                    "tool.rejected",
                    Some(event_data(serde_json::json!({
                        "key": key,
                        "error": err.to_dict(),
                    }))),
                );
                Err(err)
            }
        }
    }

    /// Registers a copy of `chain`, recording its launch values in the
    /// histories of the tools it uses.
    pub fn register_chain(&mut self, chain: &ToolChain) -> Result<ChainRegistration, RegistryError> {
        let registration = match self.chains.insert_tool_chain(chain, &mut self.tools) {
            Ok(registration) => registration,
            Err(err) => {
                self.sink.try_emit(
                    "chain.rejected",
                    Some(event_data(serde_json::json!({
                        "description": chain.description,
                        "error": err.to_dict(),
                    }))),
                );
                return Err(err);
            }
        };

        for seen in &registration.recorded {
            self.emit_launch_value("argument.recorded", seen.tool, &seen.name, &seen.value);
        }
        for seen in &registration.ignored {
            warn!(tool = %seen.tool, argument = %seen.name, "Launch argument not recognized by tool");
            self.emit_launch_value("argument.ignored", seen.tool, &seen.name, &seen.value);
        }

        self.sink.try_emit(
            "chain.registered",
            Some(event_data(serde_json::json!({
                "index": registration.index,
                "description": chain.description,
                "steps": chain.entries.len(),
            }))),
        );
        Ok(registration)
    }

    /// Mutable access to a registered tool, for argument edits.
    pub fn tool_mut(&mut self, id: ToolId) -> Result<&mut Tool, RegistryError> {
        self.tools.tool_mut(id)
    }

    /// Mutable access to the tool registered under `key`.
    pub fn get_tool_mut(&mut self, key: &str) -> Result<&mut Tool, RegistryError> {
        self.tools.get_tool_mut(key)
    }

    /// Runs a registered tool once.
    pub fn run_tool(&mut self, id: ToolId, args: &[String], payload: &[u8]) -> Result<ToolOutput, CatalogError> {
        let tool = self.tools.tool_mut(id)?;
        Ok(tool.run(args, payload)?)
    }

    fn emit_launch_value(&self, event_type: &str, tool: ToolId, name: &str, value: &str) {
        let key = self.tools.get_key(tool).unwrap_or_default();
        self.sink.try_emit(
            event_type,
            Some(event_data(serde_json::json!({
                "tool": key,
                "argument": name,
                "value": value,
            }))),
        );
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("tool_count", &self.tools.len())
            .field("chain_count", &self.chains.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
