//! Running Python tools inside the project's tox environments
//!
//! Each tool belongs to a tox environment (`format`, `lint`, `tests`,
//! `functests`). When `.tox/<env>/bin/<tool>` already exists the tool is run
//! directly, which skips tox's own startup cost:
//!
//! ```text
//! pyenv exec .tox/lint/bin/pylint src/a.py
//! ```
//!
//! Otherwise, or when `--tox` is given, the command goes through tox, which
//! creates the environment first if necessary:
//!
//! ```text
//! pyenv exec tox -e lint --run-command 'pylint src/a.py'
//! ```

use crate::core::error::PilotResult;
use crate::core::runner::Runner;
use crate::ui::output::log;
use std::path::Path;
use std::process::Command;

/// A tool invocation: tox environment, program and fixed leading arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
  pub env: &'static str,
  pub program: &'static str,
  pub args: &'static [&'static str],
}

impl Tool {
  pub const fn new(env: &'static str, program: &'static str, args: &'static [&'static str]) -> Self {
    Self { env, program, args }
  }
}

pub struct ToolRunner<'a> {
  runner: Runner,
  root: &'a Path,
  use_tox: bool,
}

impl<'a> ToolRunner<'a> {
  pub fn new(runner: Runner, root: &'a Path, use_tox: bool) -> Self {
    Self { runner, root, use_tox }
  }

  /// Run `tool` with `options` followed by `files`
  pub fn run(&self, tool: &Tool, files: &[String], options: &[String]) -> PilotResult<()> {
    let mut cmd = self.command(tool, files, options);
    self.runner.run(&mut cmd)
  }

  fn command(&self, tool: &Tool, files: &[String], options: &[String]) -> Command {
    let executable = format!(".tox/{}/bin/{}", tool.env, tool.program);
    let prebuilt = self.root.join(&executable).exists();

    if !prebuilt {
      log(&format!("It looks like {} doesn't exist, running tox to install it", executable));
    }

    let mut cmd = Command::new("pyenv");
    cmd.current_dir(self.root).arg("exec");

    if prebuilt && !self.use_tox {
      cmd.arg(executable).args(tool.args).args(options).args(files);
    } else {
      let inner = std::iter::once(tool.program)
        .chain(tool.args.iter().copied())
        .chain(options.iter().map(String::as_str))
        .chain(files.iter().map(String::as_str))
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ");
      cmd.args(["tox", "-e", tool.env, "--run-command"]).arg(inner);
    }

    cmd
  }
}

/// Quote a word for tox's shell-like command splitting
fn shell_quote(word: &str) -> String {
  if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || "'\"\\$`".contains(c)) {
    return word.to_string();
  }
  format!("'{}'", word.replace('\'', r"'\''"))
}
