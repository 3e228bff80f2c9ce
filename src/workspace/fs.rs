//! Filesystem collaborator
//!
//! The loader, the cascade and the reference scanner never call `std::fs`
//! directly. They go through [`FileSystem`] so tests can hand them an
//! in-memory tree and the CLI can hand them the real disk.

use crate::core::error::AffectedResult;
use crate::utils::{normalize_relative, to_slash};
use glob::{MatchOptions, Pattern};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Minimal filesystem surface needed to resolve a workspace.
pub trait FileSystem: Send + Sync {
  /// Does `path` exist (file or directory)?
  fn exists(&self, path: &Path) -> bool;

  /// Read a UTF-8 file. A missing file fails with `ErrorKind::NotFound`.
  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  /// Files under `root` whose root-relative path matches any of `patterns`.
  ///
  /// Returned paths are relative to `root`, in a stable lexicographic walk
  /// order. Directories matched by `exclude` are not descended into.
  fn glob(&self, root: &Path, patterns: &[Pattern], exclude: &[String]) -> AffectedResult<Vec<PathBuf>>;
}

/// Match options shared by every implementation: `*` stays within a segment.
pub fn match_options() -> MatchOptions {
  MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
  }
}

/// Does a root-relative directory path hit one of the exclude entries?
///
/// Entries without a `/` match a directory of that name at any depth
/// (`node_modules`); entries with a `/` match that exact relative prefix
/// (`apps/legacy`).
pub fn is_excluded_dir(rel_dir: &str, exclude: &[String]) -> bool {
  let rel_dir = normalize_relative(rel_dir);
  exclude.iter().any(|entry| {
    let entry = normalize_relative(entry);
    if entry.is_empty() {
      return false;
    }
    if entry.contains('/') {
      crate::utils::is_within(&rel_dir, &entry)
    } else {
      rel_dir.split('/').any(|segment| segment == entry)
    }
  })
}

/// The real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn glob(&self, root: &Path, patterns: &[Pattern], exclude: &[String]) -> AffectedResult<Vec<PathBuf>> {
    let options = match_options();
    let mut matches = Vec::new();

    let walker = WalkDir::new(root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
          return true;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        !is_excluded_dir(&to_slash(rel), exclude)
      });

    for entry in walker {
      let entry = entry?;
      if !entry.file_type().is_file() {
        continue;
      }

      let rel = match entry.path().strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => continue,
      };
      let rel_str = to_slash(rel);

      if patterns.iter().any(|p| p.matches_with(&rel_str, options)) {
        matches.push(rel.to_path_buf());
      }
    }

    tracing::trace!("glob matched {} files under {}", matches.len(), root.display());
    Ok(matches)
  }
}
