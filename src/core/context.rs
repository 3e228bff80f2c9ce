//! Unified workspace context - build once, pass everywhere
//!
//! # Architecture
//!
//! ```text
//! main.rs:
//!   WorkspaceContext::build() -> &WorkspaceContext
//!   |
//!   v
//! commands/affected.rs, projects.rs, refs.rs:
//!   fn run_*(ctx: &WorkspaceContext, ...)
//! ```
//!
//! Projects are materialized fresh on every invocation. Nothing is cached
//! between runs.

use crate::core::config::AffectedConfig;
use crate::core::error::AffectedResult;
use crate::workspace::cascade::resolve_all;
use crate::workspace::{FileSystem, LoadWarning, OsFileSystem, TrueAffectedProject, load_projects};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Workspace-level data shared by every command.
#[derive(Clone)]
pub struct WorkspaceContext {
  /// Workspace root directory (absolute path)
  pub root: PathBuf,

  /// Tool configuration (affected.toml, or defaults)
  pub config: Arc<AffectedConfig>,

  /// Filesystem collaborator used for loading and reference validation
  pub fs: Arc<dyn FileSystem>,

  /// Resolved projects, sorted by name
  pub projects: Vec<TrueAffectedProject>,

  /// Soft failures collected while loading projects
  pub warnings: Vec<LoadWarning>,
}

impl WorkspaceContext {
  /// Build the context for a workspace on disk.
  pub fn build(workspace_root: &Path) -> AffectedResult<Self> {
    let config = AffectedConfig::load(workspace_root)?;
    Self::with_fs(workspace_root.to_path_buf(), config, Arc::new(OsFileSystem))
  }

  /// Build the context over an arbitrary filesystem.
  pub fn with_fs(root: PathBuf, config: AffectedConfig, fs: Arc<dyn FileSystem>) -> AffectedResult<Self> {
    let load = load_projects(fs.as_ref(), &root, &config.workspace)?;
    let projects = resolve_all(fs.as_ref(), &root, &load.projects);
    debug!(
      "loaded {} projects ({} warnings) from {}",
      projects.len(),
      load.warnings.len(),
      root.display()
    );

    Ok(Self {
      root,
      config: Arc::new(config),
      fs,
      projects,
      warnings: load.warnings,
    })
  }

  /// Get workspace root as Path reference (convenience)
  pub fn workspace_root(&self) -> &Path {
    &self.root
  }
}
