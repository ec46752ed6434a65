//! Change-set resolution
//!
//! Turns the raw lists git reports (paths changed against the main branch,
//! untracked paths) into the files testpilot should act on:
//!
//! 1. union of changed and untracked paths
//! 2. for each changed source file, its unit test (if it exists), and for each
//!    changed unit test, its source file (if it exists)
//! 3. minus anything that no longer exists, e.g. files deleted on the branch
//!
//! Pairing only follows changed paths, not untracked ones. A deleted source
//! file still pulls in its surviving test file and vice versa.

use crate::profile::FileClassifier;
use std::collections::BTreeSet;
use std::path::Path;

/// Files to format, lint and test for one invocation, sorted and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
  files: Vec<String>,
  python_files: Vec<String>,
  source_files: Vec<String>,
  test_files: Vec<String>,
  unit_test_files: Vec<String>,
  functional_test_files: Vec<String>,
}

impl ChangeSet {
  /// Resolve the change set for a working tree rooted at `root`
  pub fn resolve<C>(root: &Path, classifier: &C, changed: &[String], untracked: &[String]) -> Self
  where
    C: FileClassifier + ?Sized,
  {
    let mut files: BTreeSet<String> = changed.iter().chain(untracked).cloned().collect();

    for path in changed {
      let pair = if classifier.is_source_file(path) {
        classifier.test_path_for(path)
      } else if classifier.is_unit_test_file(path) {
        classifier.source_path_for(path)
      } else {
        continue;
      };

      if root.join(&pair).exists() {
        tracing::trace!(%path, %pair, "pulled in paired file");
        files.insert(pair);
      }
    }

    files.retain(|path| {
      let exists = root.join(path).is_file();
      if !exists {
        tracing::trace!(%path, "dropping path that no longer exists");
      }
      exists
    });

    Self::from_files(classifier, files.into_iter().collect())
  }

  /// Build a change set from an already-resolved, sorted file list
  pub fn from_files<C>(classifier: &C, files: Vec<String>) -> Self
  where
    C: FileClassifier + ?Sized,
  {
    let python_files: Vec<String> = files.iter().filter(|f| classifier.is_python_file(f.as_str())).cloned().collect();
    let pick = |keep: &dyn Fn(&str) -> bool| -> Vec<String> {
      python_files.iter().filter(|f| keep(f.as_str())).cloned().collect()
    };

    let source_files = pick(&|f: &str| classifier.is_source_file(f));
    let test_files = pick(&|f: &str| classifier.is_test_file(f));
    let unit_test_files = pick(&|f: &str| classifier.is_unit_test_file(f));
    let functional_test_files = pick(&|f: &str| classifier.is_functional_test_file(f));

    Self {
      files,
      python_files,
      source_files,
      test_files,
      unit_test_files,
      functional_test_files,
    }
  }

  /// Every resolved file, Python or not
  pub fn files(&self) -> &[String] {
    &self.files
  }

  pub fn python_files(&self) -> &[String] {
    &self.python_files
  }

  /// Python files outside the test tree
  pub fn source_files(&self) -> &[String] {
    &self.source_files
  }

  /// Python files inside the test tree
  pub fn test_files(&self) -> &[String] {
    &self.test_files
  }

  pub fn unit_test_files(&self) -> &[String] {
    &self.unit_test_files
  }

  pub fn functional_test_files(&self) -> &[String] {
    &self.functional_test_files
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}
