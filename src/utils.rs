//! Utility functions for workspace-relative path handling
//!
//! Project roots and changed files are compared as strings that look like
//! `libs/a/src/index.ts`: forward slashes, no leading `./`, no trailing `/`.
//! Everything that feeds the mapper or the cascade goes through
//! [`normalize_relative`] first.

use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Convert a path to slash format (always forward slashes)
///
/// Config files and git both speak in forward slashes, even on Windows.
pub fn to_slash(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Normalize a workspace-relative path string.
///
/// - `\` becomes `/`
/// - `.` components and a leading `./` are dropped, `a/../b` collapses to `b`
/// - a trailing `/` is removed
/// - the workspace root itself (`.`, `./`, empty) becomes the empty string
pub fn normalize_relative(path: &str) -> String {
  let unified = path.replace('\\', "/");
  if unified.is_empty() {
    return String::new();
  }

  let cleaned = to_slash(&PathBuf::from(unified).clean());
  if cleaned == "." {
    return String::new();
  }

  cleaned.trim_end_matches('/').to_string()
}

/// Parent directory of a slash path, `""` when there is none.
///
/// `libs/a/src` → `libs/a`, `src` → `""`.
pub fn parent_dir(path: &str) -> String {
  let normalized = normalize_relative(path);
  match normalized.rfind('/') {
    Some(idx) => normalized[..idx].to_string(),
    None => String::new(),
  }
}

/// Join two slash paths, treating an empty base as the workspace root.
pub fn join_relative(base: &str, file: &str) -> String {
  if base.is_empty() {
    normalize_relative(file)
  } else {
    normalize_relative(&format!("{}/{}", base, file))
  }
}

/// Split a normalized path into its segments (empty path → no segments).
pub fn segments(path: &str) -> Vec<&str> {
  path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Segment-aware prefix test: is `path` equal to or inside `root`?
///
/// Both arguments must already be normalized. An empty root contains
/// everything.
pub fn is_within(path: &str, root: &str) -> bool {
  let root_segments = segments(root);
  let path_segments = segments(path);

  root_segments.len() <= path_segments.len()
    && root_segments
      .iter()
      .zip(path_segments.iter())
      .all(|(a, b)| a == b)
}

/// Lexically clean an absolute path without touching the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
  path.clean()
}

/// Express `path` relative to `base` in slash format.
///
/// Falls back to the full path when the two have no common prefix.
pub fn relative_slash(path: &Path, base: &Path) -> String {
  match pathdiff::diff_paths(path, base) {
    Some(rel) => normalize_relative(&to_slash(&rel)),
    None => to_slash(path),
  }
}
