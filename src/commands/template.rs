//! `testpilot template` - re-apply the project's cookiecutter template
//!
//! Projects generated from a cookiecutter template record how they were
//! generated in `.cookiecutter/cookiecutter.json`. This regenerates the project
//! from that record, non-interactively, on top of the existing checkout.

use crate::core::config::CookiecutterConfig;
use crate::core::error::{PilotError, PilotResult};
use crate::core::runner::Runner;
use std::path::Path;
use std::process::Command;

/// Run the template command
pub fn run_template(root: &Path, runner: Runner) -> PilotResult<()> {
  let config = CookiecutterConfig::load(root)?;
  let mut cmd = cookiecutter_command(root, &config)?;
  runner.run(&mut cmd)
}

/// The project directory is regenerated in place, so output goes to its parent.
fn cookiecutter_command(root: &Path, config: &CookiecutterConfig) -> PilotResult<Command> {
  let output_dir = root
    .parent()
    .ok_or_else(|| PilotError::message(format!("{} has no parent directory to render into", root.display())))?;

  let mut cmd = Command::new("cookiecutter");
  cmd.current_dir(root).arg(&config.template);

  if let Some(directory) = &config.directory {
    cmd.arg("--directory").arg(directory);
  }

  cmd
    .args(["--no-input", "--overwrite-if-exists", "--output-dir"])
    .arg(output_dir)
    .args(config.context_pairs());

  Ok(cmd)
}
