//! Error types for true-affected with contextual messages and exit codes
//!
//! Only failures the caller cannot recover from end up here. Routine outcomes
//! such as a missing tsconfig candidate or a path owned by no project are
//! plain `Option`/default values, and a broken `project.json` becomes a
//! [`crate::workspace::LoadWarning`] instead of an error.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for true-affected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
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

/// Main error type for true-affected
#[derive(Debug)]
pub enum AffectedError {
  /// Tool configuration errors (affected.toml)
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors other than "not found"
  Io(io::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl AffectedError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    AffectedError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    AffectedError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      AffectedError::Config(_) => ExitCode::User,
      AffectedError::Git(_) => ExitCode::System,
      AffectedError::Io(_) => ExitCode::System,
      AffectedError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      AffectedError::Config(e) => e.help_message(),
      AffectedError::Git(e) => e.help_message(),
      AffectedError::Message { help, .. } => help.clone(),
      AffectedError::Io(_) => None,
    }
  }
}

impl fmt::Display for AffectedError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AffectedError::Config(e) => write!(f, "{}", e),
      AffectedError::Git(e) => write!(f, "{}", e),
      AffectedError::Io(e) => write!(f, "I/O error: {}", e),
      AffectedError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for AffectedError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AffectedError::Io(e) => Some(e),
      AffectedError::Git(GitError::Spawn { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for AffectedError {
  fn from(err: io::Error) -> Self {
    AffectedError::Io(err)
  }
}

impl From<ConfigError> for AffectedError {
  fn from(err: ConfigError) -> Self {
    AffectedError::Config(err)
  }
}

impl From<serde_json::Error> for AffectedError {
  fn from(err: serde_json::Error) -> Self {
    AffectedError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for AffectedError {
  fn from(err: regex::Error) -> Self {
    AffectedError::message(format!("Regex error: {}", err))
  }
}

impl From<walkdir::Error> for AffectedError {
  fn from(err: walkdir::Error) -> Self {
    // Keep the underlying I/O error when there is one, so permission problems
    // surface with their original kind.
    match err.into_io_error() {
      Some(io_err) => AffectedError::Io(io_err),
      None => AffectedError::message("Filesystem loop detected while walking the workspace"),
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// affected.toml exists but could not be parsed
  Invalid { path: PathBuf, reason: String },

  /// A field holds a value the tool cannot use
  InvalidField { field: String, reason: String },

  /// Project referenced by name is not part of the workspace
  ProjectNotFound { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => {
        Some("Fix the syntax error or delete the file to fall back to the defaults.".to_string())
      }
      ConfigError::InvalidField { field, .. } => Some(format!(
        "Check the `{}` entry in affected.toml. Glob patterns follow the `glob` crate syntax, e.g. `**/project.json`.",
        field
      )),
      ConfigError::ProjectNotFound { .. } => Some("List known projects with `true-affected projects`.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for `{}`: {}", field, reason)
      }
      ConfigError::ProjectNotFound { name } => {
        write!(f, "Project '{}' not found in workspace", name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// The git binary could not be started
  Spawn { command: String, source: io::Error },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("unknown revision") || stderr.contains("bad revision") {
          Some("The base ref is not available locally. Fetch it first (e.g. `git fetch origin main`) or pass --from/--to.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run inside a git checkout, or pass the changed files explicitly with --files (looked in {})",
        path.display()
      )),
      GitError::Spawn { .. } => {
        Some("Make sure git is installed and on PATH, or pass the changed files with --files.".to_string())
      }
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::Spawn { command, source } => {
        write!(f, "Failed to execute {}: {}", command, source)
      }
    }
  }
}

/// Result type alias for true-affected
pub type AffectedResult<T> = Result<T, AffectedError>;

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &AffectedError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
