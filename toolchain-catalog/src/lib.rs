//! # Toolchain Catalog
//!
//! A catalog of executable tools and tool chains, so a chain can be defined
//! once and replayed deterministically.
//!
//! The catalog provides:
//!
//! - **Tools**: local programs with recognized arguments and a history of the
//!   values each argument has been used with
//! - **Tool registry**: short unique keys mapped to owned tools
//! - **Tool chains**: ordered steps, each a tool plus its launch arguments
//! - **Chain registry**: stored chain snapshots whose launch values feed back
//!   into tool histories
//!
//! ## Quick Start
//!
//! ```rust
//! use toolchain_catalog::prelude::*;
//!
//! let mut catalog = Catalog::new();
//! let cc = catalog
//!     .register_tool("cc", Tool::local_with_args("/usr/bin/cc", ["-o"]))
//!     .unwrap();
//!
//! let chain = ToolChain::new("build hello")
//!     .with_entry(ToolChainEntry::new(cc).with_arg("-o", "hello"));
//! catalog.register_chain(&chain).unwrap();
//!
//! let history = catalog.tools().get_tool("cc").unwrap().arguments();
//! assert_eq!(history.values("-o").unwrap(), ["hello"]);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod catalog;
pub mod config;
pub mod errors;
pub mod events;
pub mod observability;
pub mod registry;
pub mod tools;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::{Catalog, SharedCatalog};
    pub use crate::config::{CatalogConfig, LEGACY_FIELD_CAPACITY};
    pub use crate::errors::{ArgumentError, CatalogError, RegistryError, ToolError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::registry::{
        trim_padding, ChainRegistration, LaunchArgs, ToolChain, ToolChainEntry,
        ToolChainRegistry, ToolId, ToolRegistry,
    };
    pub use crate::tools::{ArgumentHistory, LocalTool, Tool, ToolBackend, ToolKind, ToolOutput};
}
