//! The tool abstraction and its execution lifecycle.

use super::{ArgumentHistory, LocalTool};
use crate::errors::{ArgumentError, ToolError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Capabilities every tool variant provides.
///
/// The three hooks are invoked by [`Tool::run`] in a fixed order:
/// return channel, send channel, then execute. Transport details live
/// entirely in the implementor.
pub trait ToolBackend {
    /// Checks whether this tool runs on the local machine.
    fn is_local(&self) -> bool;

    /// Sets up the channel that receives the program's output.
    fn setup_return_channel(&mut self) -> Result<(), ToolError>;

    /// Sets up the channel that sends data to the program.
    fn setup_send_channel(&mut self) -> Result<(), ToolError>;

    /// Runs the program with `args`, feeding it `payload`.
    fn execute(&mut self, args: &[String], payload: &[u8]) -> Result<ToolOutput, ToolError>;
}

/// The closed set of tool variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ToolKind {
    /// A program on the local filesystem.
    Local(LocalTool),
}

impl ToolBackend for ToolKind {
    fn is_local(&self) -> bool {
        match self {
            Self::Local(tool) => tool.is_local(),
        }
    }

    fn setup_return_channel(&mut self) -> Result<(), ToolError> {
        match self {
            Self::Local(tool) => tool.setup_return_channel(),
        }
    }

    fn setup_send_channel(&mut self) -> Result<(), ToolError> {
        match self {
            Self::Local(tool) => tool.setup_send_channel(),
        }
    }

    fn execute(&mut self, args: &[String], payload: &[u8]) -> Result<ToolOutput, ToolError> {
        match self {
            Self::Local(tool) => tool.execute(args, payload),
        }
    }
}

/// Variant-specific equality: two tools are the same program, regardless of
/// their argument histories.
impl PartialEq for ToolKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Local(a), Self::Local(b)) => a == b,
        }
    }
}

impl Eq for ToolKind {}

impl From<LocalTool> for ToolKind {
    fn from(tool: LocalTool) -> Self {
        Self::Local(tool)
    }
}

/// Result of a single tool run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Exit code, if the program exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl ToolOutput {
    /// Returns true if the program exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Standard output decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// One executable program together with its recognized arguments.
///
/// A tool has no name of its own. It is identified by the key it is
/// registered under, or compared by variant (see [`ToolKind`]'s `PartialEq`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(flatten)]
    kind: ToolKind,
    #[serde(default)]
    arguments: ArgumentHistory,
}

impl Tool {
    /// Creates a tool of the given variant with no recognized arguments.
    pub fn new(kind: impl Into<ToolKind>) -> Self {
        Self {
            kind: kind.into(),
            arguments: ArgumentHistory::new(),
        }
    }

    /// Creates a tool recognizing `args`, each with an empty history.
    pub fn with_args<I, S>(kind: impl Into<ToolKind>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            arguments: ArgumentHistory::with_args(args),
        }
    }

    /// Creates a local tool backed by `path`.
    pub fn local(path: impl Into<String>) -> Self {
        Self::new(LocalTool::new(path))
    }

    /// Creates a local tool backed by `path` recognizing `args`.
    pub fn local_with_args<I, S>(path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_args(LocalTool::new(path), args)
    }

    /// The tool's variant.
    #[must_use]
    pub fn kind(&self) -> &ToolKind {
        &self.kind
    }

    /// Mutable access to the tool's variant.
    pub fn kind_mut(&mut self) -> &mut ToolKind {
        &mut self.kind
    }

    /// Returns the local variant, if this is a local tool.
    #[must_use]
    pub fn as_local(&self) -> Option<&LocalTool> {
        match &self.kind {
            ToolKind::Local(tool) => Some(tool),
        }
    }

    /// Mutable access to the local variant, if this is a local tool.
    pub fn as_local_mut(&mut self) -> Option<&mut LocalTool> {
        match &mut self.kind {
            ToolKind::Local(tool) => Some(tool),
        }
    }

    /// Checks whether this tool is local or not.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.kind.is_local()
    }

    /// Recognized arguments and their history.
    #[must_use]
    pub fn arguments(&self) -> &ArgumentHistory {
        &self.arguments
    }

    /// Read-only view of the argument to history mapping.
    #[must_use]
    pub fn get_arg_map_entries(&self) -> &BTreeMap<String, Vec<String>> {
        self.arguments.entries()
    }

    /// Adds a recognized argument. Fails if it already exists.
    pub fn add_arg(&mut self, name: impl Into<String>) -> Result<(), ArgumentError> {
        self.arguments.add_arg(name)
    }

    /// Records a used value. Fails if the argument is not recognized.
    pub fn add_arg_val(&mut self, name: &str, value: impl Into<String>) -> Result<(), ArgumentError> {
        self.arguments.add_arg_val(name, value)
    }

    /// Records each value in order; returns how many were recorded.
    pub fn add_arg_vals<I, S>(&mut self, name: &str, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.add_arg_vals(name, values)
    }

    /// Removes the argument and its history.
    pub fn erase_arg(&mut self, name: &str) -> bool {
        self.arguments.erase_arg(name)
    }

    /// Removes the first occurrence of `value` from the argument's history.
    pub fn erase_arg_val(&mut self, name: &str, value: &str) -> bool {
        self.arguments.erase_arg_val(name, value)
    }

    /// Runs the tool with `args` and `payload`.
    ///
    /// Takes `&mut self`, so a single instance can never be run concurrently.
    pub fn run(&mut self, args: &[String], payload: &[u8]) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        debug!(args = ?args, payload_len = payload.len(), "Running tool");

        self.kind.setup_return_channel()?;
        self.kind.setup_send_channel()?;
        let result = self.kind.execute(args, payload);

        match &result {
            Ok(output) => debug!(
                exit_code = ?output.exit_code,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Tool finished"
            ),
            Err(err) => warn!(error = %err, "Tool run failed"),
        }
        result
    }
}

/// Tools compare equal when their variants identify the same program.
impl PartialEq for Tool {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Tool {}
