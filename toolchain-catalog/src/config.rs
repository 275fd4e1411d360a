//! Catalog configuration.

use crate::errors::CatalogError;
use serde::{Deserialize, Serialize};

/// Fixed field width, in bytes, used by front ends that bind chain strings to
/// fixed-size edit buffers.
///
/// Padding counts UTF-8 bytes, not characters, so a padded string fills the
/// buffer exactly.
pub const LEGACY_FIELD_CAPACITY: usize = 256;

/// Configuration for a [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Pad stored chain strings with NUL up to this many bytes.
    ///
    /// `None` stores strings at their exact length.
    #[serde(default)]
    pub field_capacity: Option<usize>,
    /// Whether registering a chain records its launch values in tool histories.
    #[serde(default = "default_record_launch_history")]
    pub record_launch_history: bool,
}

fn default_record_launch_history() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            field_capacity: None,
            record_launch_history: default_record_launch_history(),
        }
    }
}

impl CatalogConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration matching the fixed 256-byte buffer layout.
    #[must_use]
    pub fn legacy() -> Self {
        Self::default().with_field_capacity(LEGACY_FIELD_CAPACITY)
    }

    /// Sets the padded field capacity.
    #[must_use]
    pub fn with_field_capacity(mut self, capacity: usize) -> Self {
        self.field_capacity = Some(capacity);
        self
    }

    /// Enables or disables launch history recording.
    #[must_use]
    pub fn with_record_launch_history(mut self, enabled: bool) -> Self {
        self.record_launch_history = enabled;
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(input).map_err(|e| CatalogError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.field_capacity, None);
        assert!(config.record_launch_history);
    }

    #[test]
    fn test_legacy() {
        assert_eq!(CatalogConfig::legacy().field_capacity, Some(256));
    }

    #[test]
    fn test_from_json_partial() {
        let config = CatalogConfig::from_json(r#"{"field_capacity": 64}"#).unwrap();
        assert_eq!(config.field_capacity, Some(64));
        assert!(config.record_launch_history);

        let config = CatalogConfig::from_json("{}").unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = CatalogConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }
}
