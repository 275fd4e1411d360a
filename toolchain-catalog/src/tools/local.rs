//! Tools backed by a program on the local machine.

use super::{ToolBackend, ToolOutput};
use crate::errors::ToolError;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::debug;

/// Stdio wiring prepared by the setup hooks for the next `execute`.
#[derive(Debug, Clone, Copy, Default)]
struct Channels {
    capture_output: bool,
    feed_input: bool,
}

/// Models a tool on the local machine.
///
/// Two local tools are equal when their paths are equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalTool {
    path: String,
    #[serde(skip)]
    channels: Option<Channels>,
}

impl LocalTool {
    /// Creates a local tool for the program at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            channels: None,
        }
    }

    /// Path to the program.
    #[must_use]
    pub fn get_path(&self) -> &str {
        &self.path
    }

    /// Sets the path to the program.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }
}

impl PartialEq for LocalTool {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for LocalTool {}

impl ToolBackend for LocalTool {
    fn is_local(&self) -> bool {
        true
    }

    fn setup_return_channel(&mut self) -> Result<(), ToolError> {
        if self.path.is_empty() {
            return Err(ToolError::EmptyPath);
        }
        self.channels = Some(Channels {
            capture_output: true,
            feed_input: false,
        });
        Ok(())
    }

    fn setup_send_channel(&mut self) -> Result<(), ToolError> {
        let channels = self.channels.as_mut().ok_or(ToolError::ChannelNotReady {
            stage: "setup_send_channel",
        })?;
        channels.feed_input = true;
        Ok(())
    }

    fn execute(&mut self, args: &[String], payload: &[u8]) -> Result<ToolOutput, ToolError> {
        // Channels are consumed by each run.
        let channels = self
            .channels
            .take()
            .ok_or(ToolError::ChannelNotReady { stage: "execute" })?;

        let mut command = Command::new(&self.path);
        command.args(args);
        command.stdin(if channels.feed_input && !payload.is_empty() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        if channels.capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let start = Instant::now();
        let mut child = command
            .spawn()
            .map_err(|e| ToolError::launch_failed(&self.path, e.to_string()))?;
        debug!(path = %self.path, pid = child.id(), "Spawned local tool");

        // Feed stdin from a separate thread so a chatty child cannot block on a
        // full stdout pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let data = payload.to_vec();
            std::thread::spawn(move || stdin.write_all(&data))
        });

        // The writer is joined even when waiting fails.
        let waited = child.wait_with_output();
        let written = writer.map(std::thread::JoinHandle::join);
        let output = waited?;

        if let Some(written) = written {
            match written {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!(path = %self.path, "Tool closed stdin before reading all input");
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(ToolError::launch_failed(&self.path, "stdin writer panicked"));
                }
            }
        }

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
            duration: start.elapsed(),
        })
    }
}
