use crate::core::error::{AffectedError, AffectedResult, ConfigError};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for true-affected
/// Searched in order: affected.toml, .affected.toml, .config/affected.toml
///
/// Every section is optional; a workspace without any config file gets the
/// defaults below, which match a stock Nx layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffectedConfig {
  #[serde(default)]
  pub workspace: WorkspaceConfig,
  #[serde(default)]
  pub scan: ScanConfig,
  #[serde(default)]
  pub git: GitConfig,
}

/// Where projects are declared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
  /// Legacy aggregate files, first existing one wins (default: workspace.json, angular.json)
  #[serde(default = "default_aggregate_files")]
  pub aggregate_files: Vec<String>,

  /// Glob patterns for per-project config files (default: ["**/project.json"])
  #[serde(default = "default_project_patterns")]
  pub project_patterns: Vec<String>,

  /// Directories never scanned for project files
  #[serde(default = "default_workspace_exclude")]
  pub exclude: Vec<String>,
}

fn default_aggregate_files() -> Vec<String> {
  vec!["workspace.json".to_string(), "angular.json".to_string()]
}

fn default_project_patterns() -> Vec<String> {
  vec!["**/project.json".to_string()]
}

fn default_workspace_exclude() -> Vec<String> {
  ["node_modules", "dist", ".git", "tmp", "coverage"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for WorkspaceConfig {
  fn default() -> Self {
    Self {
      aggregate_files: default_aggregate_files(),
      project_patterns: default_project_patterns(),
      exclude: default_workspace_exclude(),
    }
  }
}

impl WorkspaceConfig {
  /// Compile `project_patterns`.
  pub fn compiled_patterns(&self) -> AffectedResult<Vec<Pattern>> {
    self
      .project_patterns
      .iter()
      .map(|p| {
        Pattern::new(p).map_err(|e| {
          AffectedError::Config(ConfigError::InvalidField {
            field: "workspace.project_patterns".to_string(),
            reason: format!("'{}': {}", p, e),
          })
        })
      })
      .collect()
  }
}

/// Cross-reference scanning of non-source files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
  /// Scan for files referencing changed non-source files (default: true)
  #[serde(default = "default_true")]
  pub enabled: bool,

  /// Extensions (without the dot) treated as source files, which are never scanned
  #[serde(default = "default_source_extensions")]
  pub source_extensions: Vec<String>,

  /// Directories the content search skips, matched like `workspace.exclude`
  #[serde(default = "default_scan_exclude")]
  pub exclude: Vec<String>,
}

fn default_true() -> bool {
  true
}

fn default_source_extensions() -> Vec<String> {
  ["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_scan_exclude() -> Vec<String> {
  ["node_modules", "dist", ".git", "tmp", "coverage"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      source_extensions: default_source_extensions(),
      exclude: default_scan_exclude(),
    }
  }
}

impl ScanConfig {
  /// Is `path` a source file (and therefore not cross-reference scanned)?
  pub fn is_source_file(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| self.source_extensions.iter().any(|s| s.eq_ignore_ascii_case(ext)))
      .unwrap_or(false)
  }
}

/// Git defaults for the `affected` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
  /// Base ref to compare against (default: origin/main)
  #[serde(default = "default_base")]
  pub base: String,
}

fn default_base() -> String {
  "origin/main".to_string()
}

impl Default for GitConfig {
  fn default() -> Self {
    Self { base: default_base() }
  }
}

impl AffectedConfig {
  /// Config file candidates, in search order
  pub fn candidates(workspace_root: &Path) -> Vec<PathBuf> {
    vec![
      workspace_root.join("affected.toml"),
      workspace_root.join(".affected.toml"),
      workspace_root.join(".config").join("affected.toml"),
    ]
  }

  /// Find the config file, if any
  pub fn find_config_path(workspace_root: &Path) -> Option<PathBuf> {
    Self::candidates(workspace_root).into_iter().find(|p| p.exists())
  }

  /// Load configuration, falling back to defaults when no file exists
  pub fn load(workspace_root: &Path) -> AffectedResult<Self> {
    match Self::find_config_path(workspace_root) {
      Some(path) => {
        let content = std::fs::read_to_string(&path)?;
        let config = Self::parse(&path, &content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
      }
      None => Ok(Self::default()),
    }
  }

  /// Parse and validate config text
  pub fn parse(path: &Path, content: &str) -> AffectedResult<Self> {
    let config: AffectedConfig = toml_edit::de::from_str(content).map_err(|e| {
      AffectedError::Config(ConfigError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;
    config.validate()?;
    Ok(config)
  }

  /// Validate configuration
  pub fn validate(&self) -> AffectedResult<()> {
    if self.workspace.project_patterns.is_empty() && self.workspace.aggregate_files.is_empty() {
      return Err(AffectedError::Config(ConfigError::InvalidField {
        field: "workspace".to_string(),
        reason: "both `aggregate_files` and `project_patterns` are empty, no project could ever be found".to_string(),
      }));
    }

    self.workspace.compiled_patterns()?;

    if let Some(ext) = self.scan.source_extensions.iter().find(|e| e.starts_with('.')) {
      return Err(AffectedError::Config(ConfigError::InvalidField {
        field: "scan.source_extensions".to_string(),
        reason: format!("'{}' must be given without the leading dot", ext),
      }));
    }

    if self.git.base.trim().is_empty() {
      return Err(AffectedError::Config(ConfigError::InvalidField {
        field: "git.base".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    Ok(())
  }
}
