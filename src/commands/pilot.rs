//! `testpilot` - format, lint and test the files changed on this branch
//!
//! Stages run strictly in order and stop at the first failure:
//! - **install**: make sure the project's Python versions are installed
//! - **format**: black and isort over changed Python files
//! - **lint**: pylint (separate rcfile for tests), pycodestyle, pydocstyle
//! - **unit tests**: pytest under coverage, then a coverage report scoped to
//!   the changed Python files
//! - **functional tests**: pytest over changed functional tests
//!
//! Every stage except install is skipped when it has no files to work on.

use crate::changeset::ChangeSet;
use crate::core::context::InvocationContext;
use crate::core::error::PilotResult;
use crate::core::runner::Runner;
use crate::profile::ProjectProfile;
use crate::tools::{Tool, ToolRunner};
use crate::ui::output::log;
use std::path::Path;
use std::process::Command;

const INSTALL_SCRIPT: &str = "bin/install-python";

const BLACK: Tool = Tool::new("format", "black", &["--quiet"]);
const ISORT: Tool = Tool::new("format", "isort", &["--quiet", "--atomic"]);
const PYLINT: Tool = Tool::new("lint", "pylint", &[]);
const PYCODESTYLE: Tool = Tool::new("lint", "pycodestyle", &[]);
const PYDOCSTYLE: Tool = Tool::new("lint", "pydocstyle", &[]);
const COVERAGE_RUN: Tool = Tool::new("tests", "coverage", &["run", "-m", "pytest", "--quiet"]);
const COVERAGE_COMBINE: Tool = Tool::new("tests", "coverage", &["combine", "--quiet"]);
const COVERAGE_REPORT: Tool = Tool::new("tests", "coverage", &["report"]);
const PYTEST: Tool = Tool::new("functests", "pytest", &["--quiet"]);

/// Test files are linted with their own pylint configuration
const TESTS_PYLINTRC: &str = "--rcfile=tests/.pylintrc";

/// Run every stage against the context's change set
pub fn run_pilot(ctx: &InvocationContext) -> PilotResult<()> {
  let change_set = ctx.change_set()?;
  if change_set.is_empty() {
    tracing::debug!("no files changed on this branch");
  } else {
    tracing::debug!(files = ?change_set.files(), "change set");
  }

  let pipeline = Pipeline {
    runner: ctx.runner,
    root: ctx.workspace_root(),
    profile: ctx.profile(),
    change_set,
    tools: ToolRunner::new(ctx.runner, ctx.workspace_root(), ctx.config.use_tox),
  };

  pipeline.run_all()
}

struct Pipeline<'a> {
  runner: Runner,
  root: &'a Path,
  profile: &'a ProjectProfile,
  change_set: &'a ChangeSet,
  tools: ToolRunner<'a>,
}

impl Pipeline<'_> {
  fn run_all(&self) -> PilotResult<()> {
    self.install_python()?;
    self.format()?;
    self.lint()?;
    self.run_unit_tests()?;
    self.run_functional_tests()?;
    Ok(())
  }

  /// Install the project's Python version(s) if they aren't already installed
  ///
  /// Projects that don't ship `bin/install-python` get it from `hdev`.
  fn install_python(&self) -> PilotResult<()> {
    let mut cmd = if self.root.join(INSTALL_SCRIPT).is_file() {
      Command::new(self.root.join(INSTALL_SCRIPT))
    } else {
      let mut cmd = Command::new("hdev");
      cmd.arg("install-python");
      cmd
    };
    cmd.current_dir(self.root);

    self.runner.run(&mut cmd)
  }

  fn format(&self) -> PilotResult<()> {
    let python_files = self.change_set.python_files();
    if python_files.is_empty() {
      return Ok(());
    }

    log("Formatting");
    self.tools.run(&BLACK, python_files, &[])?;
    self.tools.run(&ISORT, python_files, &[])
  }

  fn lint(&self) -> PilotResult<()> {
    let cs = self.change_set;
    if cs.python_files().is_empty() {
      return Ok(());
    }

    log("Linting");

    if !cs.source_files().is_empty() {
      self.tools.run(&PYLINT, cs.source_files(), &[])?;
    }

    if !cs.test_files().is_empty() {
      self.tools.run(&PYLINT, cs.test_files(), &[TESTS_PYLINTRC.to_string()])?;
    }

    if self.profile.run_pycodestyle {
      self.tools.run(&PYCODESTYLE, cs.python_files(), &[])?;
    }

    self.tools.run(&PYDOCSTYLE, cs.python_files(), &[])
  }

  fn run_unit_tests(&self) -> PilotResult<()> {
    let cs = self.change_set;
    if cs.unit_test_files().is_empty() {
      return Ok(());
    }

    log("Running unit tests");
    self.tools.run(&COVERAGE_RUN, cs.unit_test_files(), &[])?;

    log("Printing coverage report");
    self.tools.run(&COVERAGE_COMBINE, &[], &[])?;
    self.tools.run(&COVERAGE_REPORT, &[], &coverage_report_options(cs.python_files()))
  }

  fn run_functional_tests(&self) -> PilotResult<()> {
    let functional = self.change_set.functional_test_files();
    if functional.is_empty() {
      return Ok(());
    }

    log("Running functional tests");
    self.tools.run(&PYTEST, functional, &[])
  }
}

/// Report on exactly the changed files, and never fail just because a file
/// has no coverage
fn coverage_report_options(python_files: &[String]) -> Vec<String> {
  vec![
    "--fail-under=0".to_string(),
    "--no-skip-covered".to_string(),
    "--include".to_string(),
    python_files.join(","),
  ]
}
