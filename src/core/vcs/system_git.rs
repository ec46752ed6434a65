//! System git backend
//!
//! Uses porcelain commands whose output is stable enough to parse:
//! - `git rev-parse --show-toplevel` to locate the working tree
//! - `git branch --format` to find the main branch
//! - `git diff --name-only` and `git ls-files --others` to list changes

use crate::core::error::{GitError, PilotError, PilotResult};
use crate::core::runner::{Runner, describe};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Branch names tried, in order, when looking for the main branch
const MAIN_BRANCH_CANDIDATES: [&str; 2] = ["main", "master"];

/// Remote whose copy of the main branch changes are compared against
const UPSTREAM_REMOTE: &str = "origin";

/// Git backend using system git
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,

  runner: Runner,
}

impl SystemGit {
  /// Open the git working tree containing `path`
  ///
  /// Fails with [`GitError::NotARepository`] if `path` isn't inside one.
  pub fn open(path: &Path, runner: Runner) -> PilotResult<Self> {
    let mut cmd = base_command(path);
    cmd.args(["rev-parse", "--show-toplevel"]);
    let output = runner.output(&mut cmd)?;

    if !output.status.success() {
      tracing::debug!(stderr = %String::from_utf8_lossy(&output.stderr).trim(), "rev-parse failed");
      return Err(PilotError::Git(GitError::NotARepository));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();
    if work_tree.is_empty() {
      // Inside the .git directory itself
      return Err(PilotError::Git(GitError::NotARepository));
    }

    Ok(Self {
      work_tree: PathBuf::from(work_tree),
      runner,
    })
  }

  /// Working tree root (absolute path)
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Name of the project's main branch: `main` if it exists locally, else `master`.
  pub fn main_branch(&self) -> PilotResult<String> {
    let mut args = vec!["branch", "--format", "%(refname:lstrip=-1)", "-l"];
    args.extend(MAIN_BRANCH_CANDIDATES);
    let branches = self.stdout_lines(&args)?;

    let main_branch = pick_main_branch(&branches).ok_or(PilotError::Git(GitError::NoMainBranch))?;
    tracing::debug!(branch = main_branch, "resolved main branch");
    Ok(main_branch.to_string())
  }

  /// Ref that the working tree is compared against
  pub fn upstream_ref(main_branch: &str) -> String {
    format!("{}/{}", UPSTREAM_REMOTE, main_branch)
  }

  /// All paths that differ between `base` and the working tree
  ///
  /// Covers committed and uncommitted, staged and unstaged changes, including
  /// deletions (so some returned paths may no longer exist).
  pub fn changed_files_since(&self, base: &str) -> PilotResult<Vec<String>> {
    self.stdout_lines(&["diff", base, "--name-only"])
  }

  /// Untracked files that aren't excluded by ignore rules
  pub fn untracked_files(&self) -> PilotResult<Vec<String>> {
    self.stdout_lines(&["ls-files", "--others", "--exclude-standard"])
  }

  fn stdout_lines(&self, args: &[&str]) -> PilotResult<Vec<String>> {
    let mut cmd = self.git_cmd();
    cmd.args(args);
    let output = self.runner.output(&mut cmd)?;

    if !output.status.success() {
      return Err(PilotError::Git(GitError::CommandFailed {
        command: describe(&cmd),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(parse_name_list(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Create a git command rooted at the working tree with an isolated environment
  pub(crate) fn git_cmd(&self) -> Command {
    base_command(&self.work_tree)
  }
}

/// Create a safe git command with isolated environment
///
/// - Runs against `path` via `-C`
/// - Clears environment variables, whitelisting only PATH and HOME
/// - Disables path quoting so non-ASCII names come back verbatim
fn base_command(path: &Path) -> Command {
  let mut cmd = Command::new("git");

  cmd.arg("-C").arg(path);

  cmd.env_clear();
  if let Ok(path) = std::env::var("PATH") {
    cmd.env("PATH", path);
  }
  if let Ok(home) = std::env::var("HOME") {
    cmd.env("HOME", home);
  }

  cmd.arg("-c").arg("core.quotePath=false");

  cmd
}

/// Prefer `main` over `master`
fn pick_main_branch(branches: &[String]) -> Option<&'static str> {
  MAIN_BRANCH_CANDIDATES
    .into_iter()
    .find(|candidate| branches.iter().any(|b| b == candidate))
}

/// One path per line; blank lines are skipped
fn parse_name_list(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(|line| line.trim_end_matches('\r'))
    .filter(|line| !line.trim().is_empty())
    .map(String::from)
    .collect()
}
