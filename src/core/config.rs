//! Configuration sources
//!
//! testpilot has no config file of its own. It reads:
//! - runtime settings from the command line ([`PilotConfig`])
//! - `pyproject.toml`, to tell library projects apart ([`PyProject`])
//! - `.cookiecutter/cookiecutter.json`, for `testpilot template` ([`CookiecutterConfig`])

use crate::core::error::{ConfigError, PilotError, PilotResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// Project configuration file inspected during profile detection
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Template configuration written by cookiecutter-generated projects
pub const COOKIECUTTER_FILE: &str = ".cookiecutter/cookiecutter.json";

/// Runtime settings for one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotConfig {
  /// Echo every subprocess before running it
  pub debug: bool,
  /// Always route tools through tox instead of the pre-built environments
  pub use_tox: bool,
}

/// The parts of `pyproject.toml` testpilot cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyProject {
  /// `[tool.hdev].project_type`, when present and a string
  pub project_type: Option<String>,
}

impl PyProject {
  /// Load `pyproject.toml` from `root`
  ///
  /// Returns `Ok(None)` if the file doesn't exist. A file that exists but
  /// isn't valid TOML is an error: it means the project itself is broken.
  pub fn load(root: &Path) -> PilotResult<Option<Self>> {
    let Some(content) = read_optional(&root.join(PYPROJECT_FILE))? else {
      return Ok(None);
    };

    Self::parse(&content).map(Some).map_err(|reason| {
      PilotError::Config(ConfigError::Malformed {
        path: PathBuf::from(PYPROJECT_FILE),
        reason,
      })
    })
  }

  /// Parse `pyproject.toml` content
  ///
  /// Keys that are missing or have the wrong shape are treated as unset.
  pub fn parse(content: &str) -> Result<Self, String> {
    let doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| e.to_string())?;

    let project_type = doc
      .get("tool")
      .and_then(|tool| tool.get("hdev"))
      .and_then(|hdev| hdev.get("project_type"))
      .and_then(|value| value.as_str())
      .map(String::from);

    Ok(Self { project_type })
  }

  /// True if the project declares itself a library (as opposed to an app)
  pub fn is_library(&self) -> bool {
    self.project_type.as_deref() == Some("library")
  }
}

/// `.cookiecutter/cookiecutter.json`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CookiecutterConfig {
  /// Template location (git URL or local path)
  pub template: String,
  /// Subdirectory of the template repository holding the template
  #[serde(default)]
  pub directory: Option<String>,
  /// Answers to the template's prompts
  #[serde(default)]
  pub extra_context: serde_json::Map<String, serde_json::Value>,
}

impl CookiecutterConfig {
  pub fn load(root: &Path) -> PilotResult<Self> {
    let path = root.join(COOKIECUTTER_FILE);
    let content = read_optional(&path)?.ok_or_else(|| {
      PilotError::Config(ConfigError::NotFound {
        path: PathBuf::from(COOKIECUTTER_FILE),
      })
    })?;

    Self::parse(&content)
  }

  pub fn parse(content: &str) -> PilotResult<Self> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
      PilotError::Config(ConfigError::Malformed {
        path: PathBuf::from(COOKIECUTTER_FILE),
        reason: e.to_string(),
      })
    })?;

    if value.get("template").is_none() {
      return Err(PilotError::Config(ConfigError::MissingField {
        path: PathBuf::from(COOKIECUTTER_FILE),
        field: "template".to_string(),
      }));
    }

    serde_json::from_value(value).context(format!("Invalid {}", COOKIECUTTER_FILE))
  }

  /// `extra_context` rendered as `key=value` command-line pairs
  pub fn context_pairs(&self) -> Vec<String> {
    self
      .extra_context
      .iter()
      .map(|(key, value)| match value {
        serde_json::Value::String(s) => format!("{}={}", key, s),
        other => format!("{}={}", key, other),
      })
      .collect()
  }
}

fn read_optional(path: &Path) -> PilotResult<Option<String>> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
  }
}
