//! Effective tsconfig resolution
//!
//! First match wins:
//!
//! 1. `targets.build.options.tsConfig`, verbatim
//! 2. `library` → `<root>/tsconfig.lib.json`, if it exists
//! 3. `application` → `<root>/tsconfig.app.json`, if it exists
//! 4. `<root>/tsconfig.json`, unconditionally
//!
//! `<root>` is the parent of the declared `sourceRoot`. Existence is only
//! checked for steps 2-3, so a project without a `projectType` never touches
//! the filesystem.

use super::fs::FileSystem;
use super::project::{Project, ProjectType, TrueAffectedProject};
use crate::utils::{join_relative, parent_dir};
use std::path::Path;
use tracing::trace;

const LIB_TSCONFIG: &str = "tsconfig.lib.json";
const APP_TSCONFIG: &str = "tsconfig.app.json";
const DEFAULT_TSCONFIG: &str = "tsconfig.json";

/// Resolve one project. Never fails: every branch ends in a default.
pub fn resolve(fs: &dyn FileSystem, workspace_root: &Path, project: &Project) -> TrueAffectedProject {
  let project_root = project_root(project);
  let ts_config = resolve_ts_config(fs, workspace_root, project, &project_root);
  trace!("{} uses {}", project.name, ts_config);

  TrueAffectedProject {
    name: project.name.clone(),
    root: project_root,
    source_root: project.source_root.clone(),
    ts_config,
    implicit_dependencies: project.project.implicit_dependencies.clone().unwrap_or_default(),
  }
}

/// Resolve every project, keeping input order.
pub fn resolve_all(fs: &dyn FileSystem, workspace_root: &Path, projects: &[Project]) -> Vec<TrueAffectedProject> {
  projects.iter().map(|p| resolve(fs, workspace_root, p)).collect()
}

/// Directory holding the project's `sourceRoot`.
fn project_root(project: &Project) -> String {
  if project.has_declared_source_root() {
    parent_dir(&project.source_root)
  } else {
    project.root.clone()
  }
}

fn resolve_ts_config(fs: &dyn FileSystem, workspace_root: &Path, project: &Project, project_root: &str) -> String {
  if let Some(explicit) = project.project.build_ts_config() {
    return explicit.to_string();
  }

  let candidate = match project.project.project_type() {
    Some(ProjectType::Library) => Some(join_relative(project_root, LIB_TSCONFIG)),
    Some(ProjectType::Application) => Some(join_relative(project_root, APP_TSCONFIG)),
    None => None,
  };

  if let Some(candidate) = candidate {
    if fs.exists(&workspace_root.join(&candidate)) {
      return candidate;
    }
    trace!("{} not found, falling back to {}", candidate, DEFAULT_TSCONFIG);
  }

  join_relative(project_root, DEFAULT_TSCONFIG)
}
