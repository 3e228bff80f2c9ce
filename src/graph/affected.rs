//! Affected project analysis
//!
//! Given a set of changed files, determine:
//! - Which projects directly own those files
//! - Which projects own files that reference a changed non-source file
//! - Which projects transitively depend on any of the above
//!
//! Algorithm:
//! 1. Map each file to its owner (source root first, then project directory)
//! 2. For non-source files, scan for same-directory references and add
//!    the owners of the referencing files
//! 3. Union the implicit-dependency dependents of every direct project

use super::project_graph::ProjectGraph;
use crate::core::context::WorkspaceContext;
use crate::core::error::AffectedResult;
use crate::search::{ChangedFileReference, ContentSearch, find_non_source_affected_files};
use crate::ui::progress::ScanProgress;
use crate::utils::normalize_relative;
use crate::workspace::{find_owner, find_owning_project_name};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, trace};

/// Set of affected projects from file changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AffectedSet {
  /// Projects owning a changed file or a file referencing one
  pub direct: BTreeSet<String>,

  /// Transitive implicit dependents of the direct projects
  pub dependents: BTreeSet<String>,

  /// direct + dependents
  pub affected: BTreeSet<String>,
}

impl AffectedSet {
  pub fn is_empty(&self) -> bool {
    self.affected.is_empty()
  }
}

/// Complete affected analysis.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AffectedAnalysis {
  /// Changed files, normalized, first occurrence order
  pub changed_files: Vec<String>,

  /// Impact set
  pub impact: AffectedSet,

  /// Changed non-source file → files that reference it
  pub references: BTreeMap<String, Vec<ChangedFileReference>>,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
  /// Run the cross-reference scan for non-source files
  pub scan: bool,
  /// Draw a progress bar while scanning
  pub progress: bool,
}

impl Default for AnalyzeOptions {
  fn default() -> Self {
    Self {
      scan: true,
      progress: false,
    }
  }
}

/// Analyze which projects are affected by file changes.
pub fn analyze(
  ctx: &WorkspaceContext,
  graph: &ProjectGraph,
  search: &dyn ContentSearch,
  changed_files: &[impl AsRef<str>],
  options: AnalyzeOptions,
) -> AffectedResult<AffectedAnalysis> {
  let mut seen = HashSet::new();
  let changed: Vec<String> = changed_files
    .iter()
    .map(|f| normalize_relative(f.as_ref()))
    .filter(|f| !f.is_empty() && seen.insert(f.clone()))
    .collect();

  let mut direct = BTreeSet::new();

  // Step 1: owners of the changed files themselves
  for file in &changed {
    match find_owner(file, &ctx.projects) {
      Some(owner) => {
        trace!("{} -> {}", file, owner);
        direct.insert(owner);
      }
      None => trace!("{} is not owned by any project", file),
    }
  }

  // Step 2: non-source files pull in whoever references them
  let scan_enabled = options.scan && ctx.config.scan.enabled;
  let non_source: Vec<&String> = if scan_enabled {
    changed
      .iter()
      .filter(|f| !ctx.config.scan.is_source_file(Path::new(f.as_str())))
      .collect()
  } else {
    Vec::new()
  };

  let mut progress = (options.progress && non_source.len() > 1)
    .then(|| ScanProgress::new(non_source.len(), "Scanning references"));

  let mut references = BTreeMap::new();
  for file in non_source {
    let found = find_non_source_affected_files(search, ctx.fs.as_ref(), &ctx.root, file, &ctx.config.scan.exclude)?;

    for reference in &found {
      if let Some(owner) = find_owning_project_name(&reference.file_path, &ctx.projects, true) {
        debug!("{} references {}, marking {}", reference.file_path, file, owner);
        direct.insert(owner.to_string());
      }
    }

    if !found.is_empty() {
      references.insert(file.clone(), found);
    }
    if let Some(progress) = progress.as_mut() {
      progress.inc();
    }
  }

  // Step 3: implicit dependents
  let mut dependents = BTreeSet::new();
  for name in &direct {
    if graph.contains(name) {
      dependents.extend(graph.transitive_dependents(name)?);
    }
  }

  let mut affected = direct.clone();
  affected.extend(dependents.iter().cloned());

  debug!(
    "{} changed files: {} direct, {} dependents",
    changed.len(),
    direct.len(),
    dependents.len()
  );

  Ok(AffectedAnalysis {
    changed_files: changed,
    impact: AffectedSet {
      direct,
      dependents,
      affected,
    },
    references,
  })
}
