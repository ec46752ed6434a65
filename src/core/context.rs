//! Per-invocation context - build once, pass everywhere
//!
//! `InvocationContext` is built once in main.rs and passed by reference to the
//! pipeline. It owns the git handle and the active project profile, and
//! memoizes the main branch name and the change set the first time they're
//! asked for. Nothing is cached beyond the lifetime of the context, so calling
//! the CLI entry point repeatedly in one process never sees stale results.

use crate::changeset::ChangeSet;
use crate::core::config::PilotConfig;
use crate::core::error::{PilotError, PilotResult};
use crate::core::runner::Runner;
use crate::core::vcs::SystemGit;
use crate::profile::{ProjectProfile, select_profile};
use crate::ui::output::log;
use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};

pub struct InvocationContext {
  /// Working tree root (absolute path); all file paths are relative to it
  pub root: PathBuf,

  /// Settings from the command line
  pub config: PilotConfig,

  /// Runs every subprocess for this invocation
  pub runner: Runner,

  git: SystemGit,

  profile: ProjectProfile,

  main_branch: OnceCell<String>,

  change_set: OnceCell<ChangeSet>,
}

impl InvocationContext {
  /// Build the context for the working tree containing `cwd`.
  ///
  /// Fails if `cwd` isn't inside a git working tree, or if profile detection
  /// hits a malformed `pyproject.toml`.
  pub fn build(cwd: &Path, config: PilotConfig) -> PilotResult<Self> {
    let runner = Runner::new(config.debug);
    let git = SystemGit::open(cwd, runner)?;
    let root = git.work_tree().to_path_buf();
    let profile = select_profile(&ProjectProfile::candidates(), &root)?;

    if config.debug {
      log(&format!("Project profile: {}", profile.kind));
    }

    Ok(Self {
      root,
      config,
      runner,
      git,
      profile,
      main_branch: OnceCell::new(),
      change_set: OnceCell::new(),
    })
  }

  /// Active project profile
  pub fn profile(&self) -> &ProjectProfile {
    &self.profile
  }

  /// Working tree root as Path reference (convenience)
  pub fn workspace_root(&self) -> &Path {
    &self.root
  }

  /// Name of the project's main branch (computed once)
  pub fn main_branch(&self) -> PilotResult<&str> {
    let branch = self.main_branch.get_or_try_init(|| {
      let branch = self.git.main_branch()?;
      if self.config.debug {
        log(&format!("Project's main branch: '{}'", branch));
      }
      Ok::<_, PilotError>(branch)
    })?;
    Ok(branch.as_str())
  }

  /// Files modified on this branch compared to the main branch (computed once)
  ///
  /// Includes committed and uncommitted, staged and unstaged changes plus
  /// untracked files, expanded with paired source/test files and stripped of
  /// files that no longer exist.
  pub fn change_set(&self) -> PilotResult<&ChangeSet> {
    self.change_set.get_or_try_init(|| {
      let upstream = SystemGit::upstream_ref(self.main_branch()?);
      let changed = self.git.changed_files_since(&upstream)?;
      let untracked = self.git.untracked_files()?;

      let change_set = ChangeSet::resolve(&self.root, &self.profile, &changed, &untracked);
      tracing::debug!(
        changed = changed.len(),
        untracked = untracked.len(),
        resolved = change_set.files().len(),
        "resolved change set against {}",
        upstream
      );
      Ok(change_set)
    })
  }
}
