//! Subprocess execution
//!
//! Every external command testpilot starts goes through [`Runner`], so that
//! `--debug` echoes all of them the same way and failures map onto
//! [`ToolError`] consistently.

use crate::core::error::{PilotError, PilotResult, ToolError};
use crate::ui::output::log;
use std::process::{Command, Output, Stdio};

/// Runs external commands, one at a time, blocking until each exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
  debug: bool,
}

impl Runner {
  pub fn new(debug: bool) -> Self {
    Self { debug }
  }

  /// Run a command with inherited stdio and fail if it exits non-zero.
  pub fn run(&self, cmd: &mut Command) -> PilotResult<()> {
    self.echo(cmd);

    let status = cmd.status().map_err(|e| spawn_error(cmd, e))?;

    if !status.success() {
      return Err(PilotError::Tool(ToolError::Failed {
        command: describe(cmd),
        code: status.code(),
      }));
    }

    Ok(())
  }

  /// Run a command and collect its output without checking the exit status.
  ///
  /// Callers decide what a non-zero exit means (git failures carry stderr).
  pub fn output(&self, cmd: &mut Command) -> PilotResult<Output> {
    self.echo(cmd);
    cmd.stdin(Stdio::null());
    cmd.output().map_err(|e| spawn_error(cmd, e))
  }

  fn echo(&self, cmd: &Command) {
    tracing::debug!(command = %describe(cmd), "spawning");
    if self.debug {
      log(&format!("Running {}", describe(cmd)));
    }
  }
}

fn spawn_error(cmd: &Command, err: std::io::Error) -> PilotError {
  PilotError::Tool(ToolError::SpawnFailed {
    program: cmd.get_program().to_string_lossy().into_owned(),
    reason: err.to_string(),
  })
}

/// Render a command line for display, quoting arguments that contain spaces
pub fn describe(cmd: &Command) -> String {
  std::iter::once(cmd.get_program())
    .chain(cmd.get_args())
    .map(|part| {
      let part = part.to_string_lossy();
      if part.is_empty() || part.contains(char::is_whitespace) {
        format!("'{}'", part)
      } else {
        part.into_owned()
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
