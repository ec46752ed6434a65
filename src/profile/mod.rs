//! Project profiles
//!
//! A profile captures one project's layout conventions: how to recognise the
//! project, where its unit tests live, how test paths map to source paths, and
//! whether `pycodestyle` runs. Profiles are plain data; the active one is the
//! first entry of [`ProjectProfile::candidates`] whose detection rule matches,
//! falling back to [`ProjectProfile::baseline`].

pub mod classify;

use crate::core::config::PyProject;
use crate::core::error::PilotResult;
pub use classify::{FileClassifier, PathMapping};
use std::fmt;
use std::path::Path;

/// Known project kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
  Standard,
  H,
  Checkmate,
  Via,
  ViaHtml,
  PythonPackage,
}

impl fmt::Display for ProfileKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ProfileKind::Standard => "standard",
      ProfileKind::H => "h",
      ProfileKind::Checkmate => "checkmate",
      ProfileKind::Via => "via",
      ProfileKind::ViaHtml => "viahtml",
      ProfileKind::PythonPackage => "python-package",
    };
    f.write_str(name)
  }
}

/// How a profile recognises its project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
  /// Matches everything (the baseline)
  Always,
  /// A directory with this name exists at the project root
  Directory(&'static str),
  /// `pyproject.toml` declares `[tool.hdev] project_type = "library"`
  LibraryPyProject,
}

impl Detection {
  /// Check the rule against `root`
  ///
  /// A malformed `pyproject.toml` is an error, not a mismatch.
  pub fn matches(self, root: &Path) -> PilotResult<bool> {
    match self {
      Detection::Always => Ok(true),
      Detection::Directory(name) => Ok(root.join(name).is_dir()),
      Detection::LibraryPyProject => Ok(PyProject::load(root)?.is_some_and(|p| p.is_library())),
    }
  }
}

/// Layout conventions for one kind of project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectProfile {
  pub kind: ProfileKind,
  pub detection: Detection,
  pub unit_test_root: &'static str,
  pub mapping: PathMapping,
  pub run_pycodestyle: bool,
}

impl ProjectProfile {
  /// Used when no other profile matches
  pub const fn baseline() -> Self {
    Self {
      kind: ProfileKind::Standard,
      detection: Detection::Always,
      unit_test_root: "tests/unit",
      mapping: PathMapping::Standard,
      run_pycodestyle: true,
    }
  }

  const fn web_app(kind: ProfileKind, directory: &'static str) -> Self {
    Self {
      kind,
      detection: Detection::Directory(directory),
      run_pycodestyle: false,
      ..Self::baseline()
    }
  }

  /// Profiles in priority order; the first match wins
  pub fn candidates() -> [ProjectProfile; 5] {
    [
      ProjectProfile {
        kind: ProfileKind::H,
        detection: Detection::Directory("h"),
        unit_test_root: "tests/h",
        mapping: PathMapping::Mirrored,
        run_pycodestyle: true,
      },
      Self::web_app(ProfileKind::Checkmate, "checkmate"),
      Self::web_app(ProfileKind::Via, "via"),
      Self::web_app(ProfileKind::ViaHtml, "viahtml"),
      ProjectProfile {
        kind: ProfileKind::PythonPackage,
        detection: Detection::LibraryPyProject,
        mapping: PathMapping::SrcLayout,
        run_pycodestyle: false,
        ..Self::baseline()
      },
    ]
  }
}

impl FileClassifier for ProjectProfile {
  fn unit_test_root(&self) -> &str {
    self.unit_test_root
  }

  fn test_path_for(&self, source_path: &str) -> String {
    self.mapping.test_path_for(source_path)
  }

  fn source_path_for(&self, test_path: &str) -> String {
    self.mapping.source_path_for(test_path)
  }
}

/// Pick the first candidate whose detection rule matches `root`
///
/// Falls back to [`ProjectProfile::baseline`]. Candidates after the first
/// match aren't evaluated.
pub fn select_profile(candidates: &[ProjectProfile], root: &Path) -> PilotResult<ProjectProfile> {
  for candidate in candidates {
    if candidate.detection.matches(root)? {
      tracing::debug!(profile = %candidate.kind, "project profile matched");
      return Ok(*candidate);
    }
  }

  tracing::debug!("no project profile matched, using the standard layout");
  Ok(ProjectProfile::baseline())
}
