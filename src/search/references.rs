//! Files affected through a textual reference to a changed non-source file
//!
//! A changed `foo.html` has no import graph of its own, so we search for its
//! file name and keep only hits that look like a quoted path to it. A hit
//! counts when:
//!
//! - the referencing file lives in the same directory as `foo.html`, and
//! - the quoted path, resolved from that directory, exists on disk.
//!
//! Cross-directory references are missed on purpose: a bare file name shows
//! up in far too many places for anything looser to be trustworthy.

use super::{ContentSearch, SearchQuery, SearchResult};
use crate::core::error::AffectedResult;
use crate::utils::{clean_path, relative_slash};
use crate::workspace::fs::FileSystem;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A file affected by a changed non-source file, with the lines that
/// reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFileReference {
  /// Workspace-relative, forward slashes
  pub file_path: String,
  /// 1-based, ascending, never empty
  pub changed_lines: Vec<usize>,
}

/// Find files that reference `changed_file_path` (workspace-relative).
///
/// `exclude_roots` are workspace-relative directories the search skips.
pub fn find_non_source_affected_files(
  search: &dyn ContentSearch,
  fs: &dyn FileSystem,
  workspace_root: &Path,
  changed_file_path: &str,
  exclude_roots: &[String],
) -> AffectedResult<Vec<ChangedFileReference>> {
  let Some(file_name) = Path::new(changed_file_path).file_name().map(|n| n.to_string_lossy().to_string()) else {
    return Ok(Vec::new());
  };

  let exclude_folder_paths: Vec<PathBuf> = exclude_roots.iter().map(|p| workspace_root.join(p)).collect();
  let found = search.search(&SearchQuery {
    directory: workspace_root,
    needle: &file_name,
    exclude_folder_paths: &exclude_folder_paths,
  })?;
  trace!("{} files mention {}", found.len(), file_name);

  let pattern = reference_pattern(&file_name)?;
  let changed_dir = clean_path(&workspace_root.join(changed_file_path))
    .parent()
    .map(Path::to_path_buf)
    .unwrap_or_else(|| workspace_root.to_path_buf());

  let references: Vec<ChangedFileReference> = found
    .iter()
    .filter_map(|result| relevant_lines(fs, workspace_root, &pattern, &changed_dir, result))
    .collect();

  debug!("{} references {} file(s)", changed_file_path, references.len());
  Ok(references)
}

/// A quoted or backtick-delimited string ending in `file_name`.
fn reference_pattern(file_name: &str) -> AffectedResult<Regex> {
  let pattern = format!(r#"['"`](?P<path>[^'"`]*{})['"`]"#, regex::escape(file_name));
  Ok(Regex::new(&pattern)?)
}

fn relevant_lines(
  fs: &dyn FileSystem,
  workspace_root: &Path,
  pattern: &Regex,
  changed_dir: &Path,
  result: &SearchResult,
) -> Option<ChangedFileReference> {
  let found_path = clean_path(&workspace_root.join(&result.file_path));
  let found_dir = found_path.parent()?;

  // Same-directory constraint applies to the whole file. Captures always
  // resolve under it, a leading `/` included.
  if found_dir != changed_dir {
    return None;
  }

  let changed_lines: Vec<usize> = result
    .query_hits
    .iter()
    .filter(|hit| {
      pattern.captures_iter(&hit.line).any(|caps| {
        caps
          .name("path")
          .map(|rel| fs.exists(&clean_path(&found_dir.join(rel.as_str().trim_start_matches('/')))))
          .unwrap_or(false)
      })
    })
    .map(|hit| hit.line_number)
    .collect();

  if changed_lines.is_empty() {
    return None;
  }

  Some(ChangedFileReference {
    file_path: relative_slash(&found_path, workspace_root),
    changed_lines,
  })
}
