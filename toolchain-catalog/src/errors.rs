//! Error types for the toolchain catalog.
//!
//! Every failure in the core is local and recoverable. Operations return one of
//! the typed errors below instead of panicking, and the same checks run in
//! debug and release builds.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An argument mutation was rejected.
    #[error("{0}")]
    Argument(#[from] ArgumentError),

    /// A registry lookup or insertion failed.
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// A tool failed while running.
    #[error("{0}")]
    Tool(#[from] ToolError),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used across the crate.
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Errors raised by argument-history mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The argument is already recognized by the tool.
    #[error("Argument already recognized: {name}")]
    AlreadyRecognized {
        /// The argument name.
        name: String,
    },

    /// The argument is not recognized by the tool.
    #[error("Argument not recognized: {name}")]
    NotRecognized {
        /// The argument name.
        name: String,
    },
}

impl ArgumentError {
    /// Creates an already-recognized error.
    #[must_use]
    pub fn already_recognized(name: impl Into<String>) -> Self {
        Self::AlreadyRecognized { name: name.into() }
    }

    /// Creates a not-recognized error.
    #[must_use]
    pub fn not_recognized(name: impl Into<String>) -> Self {
        Self::NotRecognized { name: name.into() }
    }

    /// Returns the argument name the error refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AlreadyRecognized { name } | Self::NotRecognized { name } => name,
        }
    }
}

/// Errors raised by the tool and tool chain registries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool is already registered under the key.
    #[error("Key already registered: {key}")]
    DuplicateKey {
        /// The conflicting key.
        key: String,
    },

    /// No tool is registered under the key.
    #[error("Key is not registered: {key}")]
    NotRegistered {
        /// The missing key.
        key: String,
    },

    /// The handle does not belong to this registry.
    #[error("Tool handle is not registered: {id}")]
    UnknownHandle {
        /// Display form of the handle.
        id: String,
    },

    /// The tool instance is not owned by this registry.
    #[error("Tool not registered")]
    ToolNotRegistered,

    /// No chain is stored at the index.
    #[error("Tool chain not found at index {index}")]
    ChainNotFound {
        /// The requested index.
        index: usize,
    },
}

impl RegistryError {
    /// Creates a duplicate-key error.
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates a not-registered error.
    #[must_use]
    pub fn not_registered(key: impl Into<String>) -> Self {
        Self::NotRegistered { key: key.into() }
    }

    /// Creates an unknown-handle error.
    #[must_use]
    pub fn unknown_handle(id: impl std::fmt::Display) -> Self {
        Self::UnknownHandle { id: id.to_string() }
    }

    /// Returns true for any of the "not registered" conditions.
    #[must_use]
    pub fn is_not_registered(&self) -> bool {
        matches!(
            self,
            Self::NotRegistered { .. } | Self::UnknownHandle { .. } | Self::ToolNotRegistered
        )
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::DuplicateKey { key } => {
                map.insert("type".to_string(), serde_json::json!("DuplicateKey"));
                map.insert("key".to_string(), serde_json::json!(key));
            }
            Self::NotRegistered { key } => {
                map.insert("type".to_string(), serde_json::json!("NotRegistered"));
                map.insert("key".to_string(), serde_json::json!(key));
            }
            Self::UnknownHandle { id } => {
                map.insert("type".to_string(), serde_json::json!("UnknownHandle"));
                map.insert("id".to_string(), serde_json::json!(id));
            }
            Self::ToolNotRegistered => {
                map.insert("type".to_string(), serde_json::json!("ToolNotRegistered"));
            }
            Self::ChainNotFound { index } => {
                map.insert("type".to_string(), serde_json::json!("ChainNotFound"));
                map.insert("index".to_string(), serde_json::json!(index));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Errors related to running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool has no executable path.
    #[error("Tool has an empty path")]
    EmptyPath,

    /// A lifecycle hook ran before the channel it depends on was set up.
    #[error("Channel not ready before {stage}")]
    ChannelNotReady {
        /// The hook that found the channel missing.
        stage: &'static str,
    },

    /// The process could not be started.
    #[error("Failed to launch {path}: {reason}")]
    LaunchFailed {
        /// The executable path.
        path: String,
        /// The reason for failure.
        reason: String,
    },

    /// IO error while talking to the process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Creates a launch failure error.
    #[must_use]
    pub fn launch_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LaunchFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::EmptyPath => {
                map.insert("type".to_string(), serde_json::json!("ToolEmptyPath"));
            }
            Self::ChannelNotReady { stage } => {
                map.insert("type".to_string(), serde_json::json!("ToolChannelNotReady"));
                map.insert("stage".to_string(), serde_json::json!(stage));
            }
            Self::LaunchFailed { path, reason } => {
                map.insert("type".to_string(), serde_json::json!("ToolLaunchFailed"));
                map.insert("path".to_string(), serde_json::json!(path));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::Io(_) => {
                map.insert("type".to_string(), serde_json::json!("ToolIo"));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_error_name() {
        let err = ArgumentError::not_recognized("--out");
        assert_eq!(err.name(), "--out");
        assert_eq!(err.to_string(), "Argument not recognized: --out");
        assert_eq!(ArgumentError::already_recognized("-v").name(), "-v");
    }

    #[test]
    fn test_registry_error_to_dict() {
        let err = RegistryError::duplicate_key("gcc");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "DuplicateKey");
        assert_eq!(dict.get("key").unwrap(), "gcc");
        assert_eq!(dict.get("message").unwrap(), "Key already registered: gcc");
    }

    #[test]
    fn test_not_registered_family() {
        assert!(RegistryError::not_registered("x").is_not_registered());
        assert!(RegistryError::ToolNotRegistered.is_not_registered());
        assert!(RegistryError::unknown_handle("slot#3").is_not_registered());
        assert!(!RegistryError::duplicate_key("x").is_not_registered());
    }

    #[test]
    fn test_tool_error_to_dict() {
        let err = ToolError::launch_failed("/bin/none", "No such file");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "ToolLaunchFailed");
        assert_eq!(dict.get("path").unwrap(), "/bin/none");
    }

    #[test]
    fn test_catalog_error_from() {
        let err: CatalogError = RegistryError::not_registered("k").into();
        assert!(matches!(err, CatalogError::Registry(RegistryError::NotRegistered { .. })));
    }
}
