//! Project data model
//!
//! `project.json` and `workspace.json` entries are deserialized into
//! [`RawProjectConfig`]: every field optional, unknown fields preserved so the
//! value round-trips. Shape problems (e.g. `implicitDependencies: "proj2"`)
//! surface once, at load time, as a parse error for that project only.

use crate::utils::{normalize_relative, parent_dir};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Declared kind of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
  Library,
  Application,
}

impl ProjectType {
  /// Parse the raw `projectType` string. Unknown values are treated as absent.
  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "library" => Some(Self::Library),
      "application" => Some(Self::Application),
      _ => None,
    }
  }
}

/// `targets.<name>.options`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetOptions {
  #[serde(rename = "tsConfig", default, skip_serializing_if = "Option::is_none")]
  pub ts_config: Option<String>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// `targets.<name>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<TargetOptions>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// On-disk project configuration, as found in `project.json` or as an entry of
/// the aggregate `workspace.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProjectConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub root: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_root: Option<String>,

  /// Kept as a string; see [`RawProjectConfig::project_type`].
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_type: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub implicit_dependencies: Option<Vec<String>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub targets: Option<BTreeMap<String, TargetConfig>>,

  /// Every other field, verbatim.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl RawProjectConfig {
  /// Parse a project config from JSON text.
  pub fn from_json(content: &str) -> serde_json::Result<Self> {
    serde_json::from_str(content)
  }

  /// Convert an already-parsed JSON value (aggregate entries).
  pub fn from_value(value: Value) -> serde_json::Result<Self> {
    serde_json::from_value(value)
  }

  /// Typed `projectType`.
  pub fn project_type(&self) -> Option<ProjectType> {
    self.project_type.as_deref().and_then(ProjectType::parse)
  }

  /// `targets.build.options.tsConfig`, if set to a non-empty string.
  pub fn build_ts_config(&self) -> Option<&str> {
    self
      .targets
      .as_ref()?
      .get("build")?
      .options
      .as_ref()?
      .ts_config
      .as_deref()
      .filter(|s| !s.is_empty())
  }

  /// Number of top-level fields declared on disk.
  ///
  /// Used to pick a winner when two `project.json` files claim the same name.
  pub fn declared_field_count(&self) -> usize {
    [
      self.name.is_some(),
      self.root.is_some(),
      self.source_root.is_some(),
      self.project_type.is_some(),
      self.implicit_dependencies.is_some(),
      self.targets.is_some(),
    ]
    .iter()
    .filter(|declared| **declared)
    .count()
      + self.extra.len()
  }
}

/// A project as discovered in the workspace.
///
/// Built fresh on every run and never mutated afterwards; the cascade derives
/// a [`TrueAffectedProject`] from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
  /// Unique project name.
  pub name: String,

  /// Project directory, workspace-relative (`""` is the workspace root).
  pub root: String,

  /// Declared `sourceRoot`, or `root` when the config has none.
  pub source_root: String,

  /// Raw configuration, exactly as loaded.
  pub project: RawProjectConfig,
}

impl Project {
  /// Build a project from its config.
  ///
  /// `location` is the directory the config was found in (for `project.json`
  /// files, or aggregate entries given as a path), if known.
  pub fn new(name: impl Into<String>, location: Option<&str>, project: RawProjectConfig) -> Self {
    let name = name.into();
    let declared_source_root = project.source_root.as_deref().map(normalize_relative);

    let root = project
      .root
      .as_deref()
      .map(normalize_relative)
      .or_else(|| location.map(normalize_relative))
      .or_else(|| declared_source_root.as_deref().map(parent_dir))
      .unwrap_or_else(|| normalize_relative(&name));

    let source_root = declared_source_root.unwrap_or_else(|| root.clone());

    Self {
      name,
      root,
      source_root,
      project,
    }
  }

  /// Did the config declare a `sourceRoot` of its own?
  pub fn has_declared_source_root(&self) -> bool {
    self.project.source_root.is_some()
  }
}

/// Project enriched with its effective TypeScript configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueAffectedProject {
  pub name: String,

  /// Project directory used for root-level file ownership and tsconfig lookup.
  pub root: String,

  pub source_root: String,

  /// Always a non-empty relative path.
  pub ts_config: String,

  pub implicit_dependencies: Vec<String>,
}
