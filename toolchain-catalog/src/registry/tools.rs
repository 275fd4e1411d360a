//! Tool registry mapping short keys to owned tools.

use crate::errors::RegistryError;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

/// Handle to a tool owned by a [`ToolRegistry`].
///
/// Handles stay valid for the registry's lifetime since tools are never
/// removed. A handle carries its registry's id, so using it against a
/// different registry fails instead of aliasing another tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolId {
    registry: Uuid,
    slot: usize,
}

impl ToolId {
    /// Position of the tool in registration order.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.registry, self.slot)
    }
}

#[derive(Debug)]
struct Slot {
    key: String,
    tool: Tool,
}

/// Registers tools under a short unique key.
///
/// The registry is the sole owner of every tool inserted into it. Everything
/// else refers to a tool through its [`ToolId`].
#[derive(Debug)]
pub struct ToolRegistry {
    id: Uuid,
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl ToolRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the tool under `key`.
    ///
    /// Fails without touching the registry if the key is already in use.
    pub fn insert(&mut self, key: impl Into<String>, tool: Tool) -> Result<ToolId, RegistryError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            debug!(key = %key, "Rejected duplicate tool key");
            return Err(RegistryError::duplicate_key(key));
        }

        let slot = self.slots.len();
        info!(key = %key, slot, local = tool.is_local(), "Registered tool");
        self.index.insert(key.clone(), slot);
        self.slots.push(Slot { key, tool });

        Ok(ToolId {
            registry: self.id,
            slot,
        })
    }

    /// Checks if the key is in the registry.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the handle of the tool registered under `key`.
    pub fn id_of(&self, key: &str) -> Result<ToolId, RegistryError> {
        self.index
            .get(key)
            .map(|&slot| ToolId {
                registry: self.id,
                slot,
            })
            .ok_or_else(|| RegistryError::not_registered(key))
    }

    /// Returns the tool registered under `key`.
    pub fn get_tool(&self, key: &str) -> Result<&Tool, RegistryError> {
        let slot = self.slot_of(key)?;
        Ok(&self.slots[slot].tool)
    }

    /// Mutable access to the tool registered under `key`.
    pub fn get_tool_mut(&mut self, key: &str) -> Result<&mut Tool, RegistryError> {
        let slot = self.slot_of(key)?;
        Ok(&mut self.slots[slot].tool)
    }

    /// Resolves a handle to its tool.
    pub fn tool(&self, id: ToolId) -> Result<&Tool, RegistryError> {
        self.resolve(id).map(|slot| &slot.tool)
    }

    /// Resolves a handle to its tool, mutably.
    pub fn tool_mut(&mut self, id: ToolId) -> Result<&mut Tool, RegistryError> {
        if id.registry != self.id {
            return Err(RegistryError::unknown_handle(id));
        }
        self.slots
            .get_mut(id.slot)
            .map(|slot| &mut slot.tool)
            .ok_or_else(|| RegistryError::unknown_handle(id))
    }

    /// Returns the key a handle was registered under.
    pub fn get_key(&self, id: ToolId) -> Result<&str, RegistryError> {
        self.resolve(id).map(|slot| slot.key.as_str())
    }

    /// Reverse lookup by identity.
    ///
    /// Matches only the exact instance owned by this registry, never an equal
    /// tool constructed elsewhere. Scans every entry.
    pub fn find_key(&self, tool: &Tool) -> Result<&str, RegistryError> {
        self.slots
            .iter()
            .find(|slot| std::ptr::eq(&slot.tool, tool))
            .map(|slot| slot.key.as_str())
            .ok_or(RegistryError::ToolNotRegistered)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ToolId, &Tool)> + '_ {
        self.slots.iter().enumerate().map(move |(slot, entry)| {
            (
                entry.key.as_str(),
                ToolId {
                    registry: self.id,
                    slot,
                },
                &entry.tool,
            )
        })
    }

    /// Lists registered keys in registration order.
    pub fn list_keys(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.key.clone()).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot_of(&self, key: &str) -> Result<usize, RegistryError> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| RegistryError::not_registered(key))
    }

    fn resolve(&self, id: ToolId) -> Result<&Slot, RegistryError> {
        if id.registry != self.id {
            return Err(RegistryError::unknown_handle(id));
        }
        self.slots
            .get(id.slot)
            .ok_or_else(|| RegistryError::unknown_handle(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_keys().is_empty());
    }

    #[test]
    fn test_duplicate_insert_keeps_original() {
        let mut registry = ToolRegistry::new();
        let first = registry
            .insert("cc", Tool::local_with_args("/usr/bin/cc", ["-o"]))
            .unwrap();

        let err = registry.insert("cc", Tool::local("/usr/bin/clang")).unwrap_err();
        assert_eq!(err, RegistryError::duplicate_key("cc"));

        assert!(registry.contains("cc"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.id_of("cc").unwrap(), first);

        let tool = registry.get_tool("cc").unwrap();
        assert_eq!(tool.as_local().unwrap().get_path(), "/usr/bin/cc");
        assert!(std::ptr::eq(tool, registry.tool(first).unwrap()));
    }

    #[test]
    fn test_get_tool_missing_key() {
        let registry = ToolRegistry::new();
        let err = registry.get_tool("nope").unwrap_err();
        assert_eq!(err, RegistryError::not_registered("nope"));
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn test_get_key_by_handle() {
        let mut registry = ToolRegistry::new();
        let a = registry.insert("a", Tool::local("/bin/a")).unwrap();
        let b = registry.insert("b", Tool::local("/bin/b")).unwrap();

        assert_eq!(registry.get_key(a).unwrap(), "a");
        assert_eq!(registry.get_key(b).unwrap(), "b");
    }

    #[test]
    fn test_handle_from_other_registry_is_rejected() {
        let mut first = ToolRegistry::new();
        let mut second = ToolRegistry::new();
        let id = first.insert("a", Tool::local("/bin/a")).unwrap();
        second.insert("b", Tool::local("/bin/b")).unwrap();

        assert!(second.get_key(id).unwrap_err().is_not_registered());
        assert!(second.tool_mut(id).is_err());
    }

    #[test]
    fn test_find_key_uses_identity() {
        let mut registry = ToolRegistry::new();
        registry.insert("test", Tool::local("/bin/a")).unwrap();

        let owned = registry.get_tool("test").unwrap();
        assert_eq!(registry.find_key(owned).unwrap(), "test");

        let lookalike = Tool::local("/bin/a");
        assert_eq!(&lookalike, owned);
        assert_eq!(
            registry.find_key(&lookalike).unwrap_err(),
            RegistryError::ToolNotRegistered
        );
    }

    #[test]
    fn test_mutation_through_registry() {
        let mut registry = ToolRegistry::new();
        let id = registry.insert("a", Tool::local_with_args("/bin/a", ["x"])).unwrap();

        registry.tool_mut(id).unwrap().add_arg_val("x", "1").unwrap();
        registry.get_tool_mut("a").unwrap().add_arg_val("x", "2").unwrap();

        assert_eq!(registry.tool(id).unwrap().arguments().values("x").unwrap(), ["1", "2"]);
    }

    #[test]
    fn test_entries_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.insert("z", Tool::local("/bin/z")).unwrap();
        registry.insert("a", Tool::local("/bin/a")).unwrap();

        let keys: Vec<_> = registry.entries().map(|(key, id, _)| (key, id.slot())).collect();
        assert_eq!(keys, vec![("z", 0), ("a", 1)]);
    }
}
