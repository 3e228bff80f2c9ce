//! Test doubles for the filesystem and content search collaborators

use crate::core::error::AffectedResult;
use crate::search::{ContentSearch, QueryHit, SearchQuery, SearchResult};
use crate::utils::to_slash;
use crate::workspace::fs::{FileSystem, is_excluded_dir, match_options};
use glob::Pattern;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

enum Entry {
  File(String),
  Unreadable,
}

/// In-memory workspace rooted at an absolute path.
pub struct MemoryFileSystem {
  root: PathBuf,
  files: BTreeMap<String, Entry>,
  exists_calls: AtomicUsize,
}

impl MemoryFileSystem {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      files: BTreeMap::new(),
      exists_calls: AtomicUsize::new(0),
    }
  }

  /// Add a file at a root-relative path
  pub fn with_file(mut self, rel: &str, content: &str) -> Self {
    self.files.insert(rel.to_string(), Entry::File(content.to_string()));
    self
  }

  pub fn with_json(self, rel: &str, value: serde_json::Value) -> Self {
    let content = serde_json::to_string_pretty(&value).unwrap();
    self.with_file(rel, &content)
  }

  /// Add a file that exists but fails to read with PermissionDenied
  pub fn with_unreadable(mut self, rel: &str) -> Self {
    self.files.insert(rel.to_string(), Entry::Unreadable);
    self
  }

  /// How many times `exists` was called
  pub fn exists_calls(&self) -> usize {
    self.exists_calls.load(Ordering::SeqCst)
  }

  fn rel(&self, path: &Path) -> Option<String> {
    let cleaned = crate::utils::clean_path(path);
    cleaned.strip_prefix(&self.root).ok().map(to_slash)
  }

  /// Files in walk order: depth first, siblings sorted by name
  fn walk_order(&self) -> Vec<&str> {
    let mut keys: Vec<&str> = self.files.keys().map(String::as_str).collect();
    keys.sort_by(|a, b| a.split('/').cmp(b.split('/')));
    keys
  }
}

impl FileSystem for MemoryFileSystem {
  fn exists(&self, path: &Path) -> bool {
    self.exists_calls.fetch_add(1, Ordering::SeqCst);
    let Some(rel) = self.rel(path) else {
      return false;
    };
    if rel.is_empty() {
      return true;
    }
    let dir_prefix = format!("{}/", rel);
    self.files.contains_key(&rel) || self.files.keys().any(|k| k.starts_with(&dir_prefix))
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let rel = self
      .rel(path)
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "outside workspace"))?;
    match self.files.get(&rel) {
      Some(Entry::File(content)) => Ok(content.clone()),
      Some(Entry::Unreadable) => Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")),
      None => Err(io::Error::new(io::ErrorKind::NotFound, format!("{} not found", rel))),
    }
  }

  fn glob(&self, root: &Path, patterns: &[Pattern], exclude: &[String]) -> AffectedResult<Vec<PathBuf>> {
    let base = self.rel(root).unwrap_or_default();
    let options = match_options();

    let found = self
      .walk_order()
      .into_iter()
      .filter_map(|key| {
        let rel = if base.is_empty() {
          key
        } else {
          key.strip_prefix(&format!("{}/", base))?
        };
        let dir = rel.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
        if !dir.is_empty() && is_excluded_dir(dir, exclude) {
          return None;
        }
        patterns
          .iter()
          .any(|p| p.matches_with(rel, options))
          .then(|| PathBuf::from(rel))
      })
      .collect();

    Ok(found)
  }
}

/// Content search over a [`MemoryFileSystem`], same contract as `WalkSearch`.
pub struct MemorySearch<'a> {
  pub fs: &'a MemoryFileSystem,
}

impl ContentSearch for MemorySearch<'_> {
  fn search(&self, query: &SearchQuery<'_>) -> AffectedResult<Vec<SearchResult>> {
    let mut results = Vec::new();
    let excludes = query.relative_excludes();

    for key in self.fs.walk_order() {
      let path = self.fs.root.join(key);
      if !path.starts_with(query.directory) {
        continue;
      }
      if path.parent().is_some_and(|dir| query.skips_dir(dir, &excludes)) {
        continue;
      }
      let Ok(content) = self.fs.read_to_string(&path) else {
        continue;
      };

      let query_hits: Vec<QueryHit> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(query.needle))
        .map(|(idx, line)| QueryHit {
          line: line.to_string(),
          line_number: idx + 1,
        })
        .collect();

      if !query_hits.is_empty() {
        results.push(SearchResult { file_path: path, query_hits });
      }
    }

    Ok(results)
  }
}
