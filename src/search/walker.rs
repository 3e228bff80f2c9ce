//! Filesystem-backed content search
//!
//! Walk once (sorted, so results are stable), then read and scan the files
//! in parallel. Files that are not UTF-8 are skipped, since a filename
//! reference in a binary asset is not something we can act on.

use super::{ContentSearch, QueryHit, SearchQuery, SearchResult};
use crate::core::error::{AffectedError, AffectedResult};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `ContentSearch` over the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkSearch;

impl WalkSearch {
  fn collect_files(query: &SearchQuery<'_>) -> AffectedResult<Vec<PathBuf>> {
    let excludes = query.relative_excludes();
    let walker = WalkDir::new(query.directory)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| !(entry.file_type().is_dir() && query.skips_dir(entry.path(), &excludes)));

    let mut files = Vec::new();
    for entry in walker {
      let entry = entry?;
      if entry.file_type().is_file() {
        files.push(entry.into_path());
      }
    }
    Ok(files)
  }

  fn scan_file(path: &Path, needle: &str) -> AffectedResult<Option<SearchResult>> {
    let bytes = match std::fs::read(path) {
      Ok(bytes) => bytes,
      // Deleted between walk and read
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(AffectedError::Io(e)),
    };

    let Ok(content) = String::from_utf8(bytes) else {
      return Ok(None);
    };

    if !content.contains(needle) {
      return Ok(None);
    }

    let query_hits: Vec<QueryHit> = content
      .lines()
      .enumerate()
      .filter(|(_, line)| line.contains(needle))
      .map(|(idx, line)| QueryHit {
        line: line.to_string(),
        line_number: idx + 1,
      })
      .collect();

    Ok(Some(SearchResult {
      file_path: path.to_path_buf(),
      query_hits,
    }))
  }
}

impl ContentSearch for WalkSearch {
  fn search(&self, query: &SearchQuery<'_>) -> AffectedResult<Vec<SearchResult>> {
    let files = Self::collect_files(query)?;
    tracing::debug!("searching {} files for '{}'", files.len(), query.needle);

    let scanned: Vec<AffectedResult<Option<SearchResult>>> =
      files.par_iter().map(|path| Self::scan_file(path, query.needle)).collect();

    let mut results = Vec::new();
    for result in scanned {
      if let Some(found) = result? {
        results.push(found);
      }
    }
    Ok(results)
  }
}
