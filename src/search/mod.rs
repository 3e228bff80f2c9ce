//! Content search and cross-reference scanning
//!
//! - **walker**: `WalkSearch`, the walkdir + rayon `ContentSearch` implementation
//! - **references**: finds files that reference a changed non-source file

pub mod references;
pub mod walker;

pub use references::{ChangedFileReference, find_non_source_affected_files};
pub use walker::WalkSearch;

use crate::core::error::AffectedResult;
use crate::utils::relative_slash;
use crate::workspace::fs::is_excluded_dir;
use std::path::{Path, PathBuf};

/// A literal-needle search request.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
  /// Directory to search, recursively
  pub directory: &'a Path,
  /// Literal text to look for
  pub needle: &'a str,
  /// Absolute directories to skip. A directory directly under `directory`
  /// is skipped by name at any depth, same as `workspace.exclude`.
  pub exclude_folder_paths: &'a [PathBuf],
}

impl SearchQuery<'_> {
  /// Exclusions as `directory`-relative entries for [`is_excluded_dir`].
  pub fn relative_excludes(&self) -> Vec<String> {
    self
      .exclude_folder_paths
      .iter()
      .map(|path| relative_slash(path, self.directory))
      .collect()
  }

  /// Is `dir` (absolute) one of the skipped directories, or inside one?
  pub fn skips_dir(&self, dir: &Path, excludes: &[String]) -> bool {
    let rel = relative_slash(dir, self.directory);
    !rel.is_empty() && is_excluded_dir(&rel, excludes)
  }
}

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHit {
  pub line: String,
  /// 1-based
  pub line_number: usize,
}

/// All matching lines of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
  /// Absolute path of the file
  pub file_path: PathBuf,
  pub query_hits: Vec<QueryHit>,
}

/// Finds files whose contents contain a literal string.
pub trait ContentSearch: Send + Sync {
  fn search(&self, query: &SearchQuery<'_>) -> AffectedResult<Vec<SearchResult>>;
}
