//! File classification and source⇄test path mapping
//!
//! All paths are repository-relative and `/`-separated, exactly as git prints
//! them. Nothing here touches the filesystem.

/// Root of every test file
pub const TEST_ROOT: &str = "tests/";

/// Root of the standard unit test tree, with trailing separator
pub const UNIT_TEST_DIR: &str = "tests/unit/";

/// Root of the functional test tree
pub const FUNCTIONAL_TEST_ROOT: &str = "tests/functional";

/// Source tree of src-layout packages, with trailing separator
pub const SRC_DIR: &str = "src/";

const PYTHON_EXTENSION: &str = ".py";
const TEST_SUFFIX: &str = "_test.py";

/// Classifies paths and maps between source files and their unit tests.
///
/// The default methods describe the common layout; implementors only supply
/// the parts that vary between projects.
pub trait FileClassifier {
  /// Prefix shared by all unit test paths
  fn unit_test_root(&self) -> &str;

  /// Where the unit test for `source_path` lives. Existence isn't checked.
  fn test_path_for(&self, source_path: &str) -> String;

  /// Where the source file tested by `test_path` lives. Existence isn't checked.
  fn source_path_for(&self, test_path: &str) -> String;

  fn is_python_file(&self, path: &str) -> bool {
    path.ends_with(PYTHON_EXTENSION)
  }

  fn is_test_file(&self, path: &str) -> bool {
    path.starts_with(TEST_ROOT)
  }

  fn is_source_file(&self, path: &str) -> bool {
    !self.is_test_file(path)
  }

  fn is_unit_test_file(&self, path: &str) -> bool {
    path.starts_with(self.unit_test_root())
  }

  fn is_functional_test_file(&self, path: &str) -> bool {
    path.starts_with(FUNCTIONAL_TEST_ROOT)
  }
}

/// How a profile places unit tests relative to source files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMapping {
  /// `pkg/mod.py` ⇄ `tests/unit/pkg/mod_test.py`
  Standard,
  /// `h/mod.py` ⇄ `tests/h/mod_test.py` (tests mirror the package under `tests/`)
  Mirrored,
  /// `src/pkg/mod.py` ⇄ `tests/unit/pkg/mod_test.py`
  SrcLayout,
}

impl PathMapping {
  pub fn test_path_for(self, source_path: &str) -> String {
    match self {
      PathMapping::Standard => format!("{}{}{}", UNIT_TEST_DIR, strip_extension(source_path), TEST_SUFFIX),
      PathMapping::Mirrored => format!("{}{}{}", TEST_ROOT, strip_extension(source_path), TEST_SUFFIX),
      PathMapping::SrcLayout => format!(
        "{}{}{}",
        UNIT_TEST_DIR,
        strip_extension(drop_first_component(source_path)),
        TEST_SUFFIX
      ),
    }
  }

  pub fn source_path_for(self, test_path: &str) -> String {
    match self {
      PathMapping::Standard => standard_source_path(test_path),
      PathMapping::Mirrored => format!(
        "{}{}",
        strip_test_suffix(drop_first_component(test_path)),
        PYTHON_EXTENSION
      ),
      PathMapping::SrcLayout => format!("{}{}", SRC_DIR, standard_source_path(test_path)),
    }
  }
}

fn standard_source_path(test_path: &str) -> String {
  let relative = test_path.strip_prefix(UNIT_TEST_DIR).unwrap_or(test_path);
  format!("{}{}", strip_test_suffix(relative), PYTHON_EXTENSION)
}

fn strip_test_suffix(path: &str) -> &str {
  path.strip_suffix(TEST_SUFFIX).unwrap_or(path)
}

/// `a/b/c.py` → `b/c.py`; a path with a single component is returned empty
fn drop_first_component(path: &str) -> &str {
  path.split_once('/').map_or("", |(_, rest)| rest)
}

/// Remove the final extension of the last path component
///
/// Leading dots of the file name don't start an extension, so `.envrc` and
/// `dir/.envrc` are returned unchanged.
pub fn strip_extension(path: &str) -> &str {
  let name_start = path.rfind('/').map_or(0, |i| i + 1);
  let name = &path[name_start..];
  let leading_dots = name.len() - name.trim_start_matches('.').len();

  match name[leading_dots..].rfind('.') {
    Some(dot) => &path[..name_start + leading_dots + dot],
    None => path,
  }
}
