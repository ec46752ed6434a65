//! `testpilot release` - create a new patch release on GitHub
//!
//! Reads the last release's tag with the GitHub CLI, bumps its patch number
//! and creates a release with generated notes. Publishing the release is what
//! triggers the package upload, so this works from the latest commit on
//! GitHub, not from the local checkout.

use crate::core::error::{PilotError, PilotResult, ToolError};
use crate::core::runner::{Runner, describe};
use crate::release::{bump_patch_number, parse_release_view};
use crate::ui::output::log;
use std::path::Path;
use std::process::Command;

/// Run the release command
pub fn run_release(root: &Path, runner: Runner) -> PilotResult<()> {
  let last = last_version(root, runner)?;
  let next = bump_patch_number(&last)?;

  log(&format!("Creating release {} (previous release: {})", next, last));

  let mut cmd = Command::new("gh");
  cmd
    .current_dir(root)
    .args(["release", "create", "--generate-notes"])
    .arg(&next);
  runner.run(&mut cmd)
}

/// Tag name of the most recent GitHub release
fn last_version(root: &Path, runner: Runner) -> PilotResult<String> {
  let mut cmd = Command::new("gh");
  cmd.current_dir(root).args(["release", "view", "--json", "tagName"]);

  let output = runner.output(&mut cmd)?;
  if !output.status.success() {
    eprint!("{}", String::from_utf8_lossy(&output.stderr));
    return Err(PilotError::Tool(ToolError::Failed {
      command: describe(&cmd),
      code: output.status.code(),
    }));
  }

  parse_release_view(&String::from_utf8(output.stdout)?)
}
