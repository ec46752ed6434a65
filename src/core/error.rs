//! Error types for testpilot with contextual messages and exit codes
//!
//! Errors fall into three groups:
//! - environment errors (not in a repo, no main branch, broken pyproject.toml),
//!   which abort before any stage runs
//! - tool errors (an external command exited non-zero), whose exit code is
//!   propagated as the process exit code
//! - everything else (I/O, malformed tool output)

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for testpilot's own failures
///
/// A failing tool's exit code is passed through unchanged instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User or environment error (config, not a repo, missing branch)
  User = 1,
  /// System error (git, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for testpilot
#[derive(Debug)]
pub enum PilotError {
  /// Project configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// External tool errors
  Tool(ToolError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PilotError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PilotError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PilotError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PilotError::Message { message, context, help } => PilotError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PilotError::Io(err) => PilotError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the process exit code for this error
  pub fn exit_code(&self) -> i32 {
    match self {
      PilotError::Config(_) => ExitCode::User.as_i32(),
      PilotError::Git(GitError::NotARepository) | PilotError::Git(GitError::NoMainBranch) => ExitCode::User.as_i32(),
      PilotError::Git(_) => ExitCode::System.as_i32(),
      PilotError::Tool(e) => e.exit_code(),
      PilotError::Io(_) => ExitCode::System.as_i32(),
      PilotError::Message { .. } => ExitCode::User.as_i32(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PilotError::Config(e) => e.help_message(),
      PilotError::Git(e) => e.help_message(),
      PilotError::Tool(e) => e.help_message(),
      PilotError::Message { help, .. } => help.clone(),
      PilotError::Io(_) => None,
    }
  }
}

impl fmt::Display for PilotError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PilotError::Config(e) => write!(f, "{}", e),
      PilotError::Git(e) => write!(f, "{}", e),
      PilotError::Tool(e) => write!(f, "{}", e),
      PilotError::Io(e) => write!(f, "I/O error: {}", e),
      PilotError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PilotError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PilotError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PilotError {
  fn from(err: io::Error) -> Self {
    PilotError::Io(err)
  }
}

impl From<String> for PilotError {
  fn from(msg: String) -> Self {
    PilotError::message(msg)
  }
}

impl From<&str> for PilotError {
  fn from(msg: &str) -> Self {
    PilotError::message(msg)
  }
}

impl From<serde_json::Error> for PilotError {
  fn from(err: serde_json::Error) -> Self {
    PilotError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for PilotError {
  fn from(err: semver::Error) -> Self {
    PilotError::message(format!("Version parse error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for PilotError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    PilotError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Project configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// A configuration file exists but isn't valid
  Malformed { path: PathBuf, reason: String },

  /// A required configuration file is missing
  NotFound { path: PathBuf },

  /// Missing required field
  MissingField { path: PathBuf, field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Malformed { path, .. } => Some(format!("Fix the syntax of {} and try again.", path.display())),
      ConfigError::NotFound { path } if path.ends_with("cookiecutter.json") => {
        Some("Only projects generated from a cookiecutter template can be re-templated.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Malformed { path, reason } => {
        write!(f, "testpilot couldn't parse your project's {} file\n{}", path.display(), reason)
      }
      ConfigError::NotFound { path } => {
        write!(f, "Configuration file not found: {}", path.display())
      }
      ConfigError::MissingField { path, field } => {
        write!(f, "Missing required field '{}' in {}", field, path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Not inside a git working tree
  NotARepository,

  /// Neither `main` nor `master` exists locally
  NoMainBranch,
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::NotARepository => Some("Run testpilot from inside a git working tree.".to_string()),
      GitError::NoMainBranch => {
        Some("Create or fetch a local 'main' (or 'master') branch so there's something to compare against.".to_string())
      }
      GitError::CommandFailed { stderr, .. } if stderr.contains("unknown revision") => {
        Some("Run `git fetch origin` so that origin's main branch is available locally.".to_string())
      }
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::NotARepository => write!(f, "It looks like you aren't in a git repo"),
      GitError::NoMainBranch => {
        write!(f, "The project doesn't appear to have either a 'main' or a 'master' branch")
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The tool ran and exited non-zero (`code` is None when killed by a signal)
  Failed { command: String, code: Option<i32> },

  /// The tool couldn't be started at all
  SpawnFailed { program: String, reason: String },
}

impl ToolError {
  fn exit_code(&self) -> i32 {
    match self {
      ToolError::Failed { code: Some(code), .. } if *code != 0 => *code,
      ToolError::Failed { .. } => ExitCode::System.as_i32(),
      ToolError::SpawnFailed { .. } => ExitCode::System.as_i32(),
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::SpawnFailed { program, .. } => Some(format!("Make sure `{}` is installed and on your PATH.", program)),
      ToolError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Failed { command, code: Some(code) } => {
        write!(f, "Command failed with exit code {}: {}", code, command)
      }
      ToolError::Failed { command, code: None } => {
        write!(f, "Command was terminated by a signal: {}", command)
      }
      ToolError::SpawnFailed { program, reason } => {
        write!(f, "Failed to execute {}: {}", program, reason)
      }
    }
  }
}

/// Result type alias for testpilot
pub type PilotResult<T> = Result<T, PilotError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PilotResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PilotResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PilotError>,
{
  fn context(self, ctx: impl Into<String>) -> PilotResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PilotResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with help text
pub fn print_error(error: &PilotError) {
  eprintln!("{}", error);

  if let Some(help) = error.help_message() {
    eprintln!("Help: {}", help);
  }
}
