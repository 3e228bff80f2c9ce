//! Project discovery
//!
//! Two sources feed the project list:
//!
//! 1. the legacy aggregate file (`workspace.json` / `angular.json`), a single
//!    mapping from project name to config or to the project's directory;
//! 2. nested `project.json` files found anywhere in the workspace.
//!
//! Both sources are loaded completely before anything is merged. A nested
//! file replaces a same-named aggregate entry wholesale, never field by field.
//! A broken file only costs its own project: it becomes a [`LoadWarning`] and
//! the rest of the workspace still loads.

use super::fs::FileSystem;
use super::project::{Project, RawProjectConfig};
use crate::core::config::WorkspaceConfig;
use crate::core::error::{AffectedError, AffectedResult};
use crate::utils::{normalize_relative, to_slash};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A config file (or aggregate entry) that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
  /// Workspace-relative path of the offending file
  pub path: PathBuf,
  pub message: String,
}

impl LoadWarning {
  fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
    let warning = Self {
      path: path.into(),
      message: message.into(),
    };
    warn!("{}", warning);
    warning
  }
}

impl fmt::Display for LoadWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.path.display(), self.message)
  }
}

/// Outcome of [`load_projects`].
#[derive(Debug, Clone, Default)]
pub struct ProjectLoad {
  /// Deduplicated projects, sorted by name
  pub projects: Vec<Project>,

  /// Files that were skipped, in discovery order
  pub warnings: Vec<LoadWarning>,
}

/// Discover every project in the workspace.
///
/// An empty workspace yields an empty list, not an error. Walk errors and
/// I/O errors on the aggregate file other than "not found" are returned.
pub fn load_projects(fs: &dyn FileSystem, workspace_root: &Path, config: &WorkspaceConfig) -> AffectedResult<ProjectLoad> {
  let mut warnings = Vec::new();

  // Source A: aggregate file
  let aggregate = load_aggregate(fs, workspace_root, &config.aggregate_files, &mut warnings)?;

  // Source B: nested project files
  let patterns = config.compiled_patterns()?;
  let paths = fs.glob(workspace_root, &patterns, &config.exclude)?;
  debug!("found {} project files under {}", paths.len(), workspace_root.display());

  let parsed: Vec<Result<Project, LoadWarning>> = paths
    .par_iter()
    .map(|rel| load_nested(fs, workspace_root, rel))
    .collect();

  // Dedup nested entries first (glob order is the tie-break), then let them
  // override the aggregate.
  let mut nested: BTreeMap<String, (PathBuf, Project)> = BTreeMap::new();
  for (rel, result) in paths.iter().zip(parsed) {
    let project = match result {
      Ok(project) => project,
      Err(warning) => {
        warnings.push(warning);
        continue;
      }
    };

    match nested.get(&project.name) {
      Some((kept_path, kept)) => {
        if project.project.declared_field_count() > kept.project.declared_field_count() {
          warnings.push(LoadWarning::new(
            kept_path.clone(),
            format!(
              "duplicate project '{}', using the more complete {}",
              project.name,
              rel.display()
            ),
          ));
          nested.insert(project.name.clone(), (rel.clone(), project));
        } else {
          warnings.push(LoadWarning::new(
            rel.clone(),
            format!(
              "duplicate project '{}', already defined by {}",
              project.name,
              kept_path.display()
            ),
          ));
        }
      }
      None => {
        nested.insert(project.name.clone(), (rel.clone(), project));
      }
    }
  }

  let mut merged: BTreeMap<String, Project> = aggregate.into_iter().map(|p| (p.name.clone(), p)).collect();
  for (name, (rel, project)) in nested {
    if merged.contains_key(&name) {
      debug!("{} overrides aggregate entry for '{}'", rel.display(), name);
    }
    merged.insert(name, project);
  }

  Ok(ProjectLoad {
    projects: merged.into_values().collect(),
    warnings,
  })
}

/// Read the first aggregate file that exists.
fn load_aggregate(
  fs: &dyn FileSystem,
  workspace_root: &Path,
  candidates: &[String],
  warnings: &mut Vec<LoadWarning>,
) -> AffectedResult<Vec<Project>> {
  for file_name in candidates {
    let path = workspace_root.join(file_name);
    let content = match fs.read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
      Err(e) => return Err(AffectedError::Io(e)),
    };

    debug!("loading aggregate project config from {}", file_name);
    return Ok(parse_aggregate(file_name, &content, warnings));
  }

  Ok(Vec::new())
}

/// Turn aggregate JSON into projects, skipping entries that do not parse.
fn parse_aggregate(file_name: &str, content: &str, warnings: &mut Vec<LoadWarning>) -> Vec<Project> {
  let value: Value = match serde_json::from_str(content) {
    Ok(value) => value,
    Err(e) => {
      warnings.push(LoadWarning::new(file_name, format!("invalid JSON: {}", e)));
      return Vec::new();
    }
  };

  // `{ "version": 2, "projects": { ... } }` or a bare name → config mapping.
  // Without `version`, a `projects` key is a project like any other.
  let entries = match value {
    Value::Object(mut map) => match (map.contains_key("version"), map.remove("projects")) {
      (true, Some(Value::Object(projects))) => projects,
      (true, Some(_)) => {
        warnings.push(LoadWarning::new(file_name, "`projects` must be an object"));
        return Vec::new();
      }
      (_, projects) => {
        if let Some(projects) = projects {
          map.insert("projects".to_string(), projects);
        }
        map
      }
    },
    _ => {
      warnings.push(LoadWarning::new(file_name, "expected a JSON object"));
      return Vec::new();
    }
  };

  let mut projects = Vec::with_capacity(entries.len());
  for (name, entry) in entries {
    match entry {
      Value::String(location) => {
        projects.push(Project::new(name, Some(&location), RawProjectConfig::default()));
      }
      Value::Object(_) => match RawProjectConfig::from_value(entry) {
        Ok(config) => projects.push(Project::new(name, None, config)),
        Err(e) => warnings.push(LoadWarning::new(file_name, format!("project '{}': {}", name, e))),
      },
      _ => warnings.push(LoadWarning::new(
        file_name,
        format!("project '{}': expected a config object or a directory path", name),
      )),
    }
  }

  projects
}

/// Parse one `project.json`.
fn load_nested(fs: &dyn FileSystem, workspace_root: &Path, rel: &Path) -> Result<Project, LoadWarning> {
  let content = fs
    .read_to_string(&workspace_root.join(rel))
    .map_err(|e| LoadWarning::new(rel, format!("unreadable: {}", e)))?;

  let config = RawProjectConfig::from_json(&content).map_err(|e| LoadWarning::new(rel, format!("invalid project config: {}", e)))?;

  let location = rel.parent().map(to_slash).map(|dir| normalize_relative(&dir)).unwrap_or_default();
  let name = match config.name.clone() {
    Some(name) => name,
    None => derive_name(workspace_root, &location),
  };

  Ok(Project::new(name, Some(&location), config))
}

/// Name for a config that does not declare one: its directory's base name.
fn derive_name(workspace_root: &Path, location: &str) -> String {
  if let Some(last) = location.rsplit('/').find(|s| !s.is_empty()) {
    return last.to_string();
  }

  workspace_root
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| "workspace".to_string())
}
