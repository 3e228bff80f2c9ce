//! `true-affected refs <file>` - Files that reference a non-source file
//!
//! Runs the same cross-reference scan `affected` uses, for one file, and
//! shows which project each referencing file belongs to. For TypeScript
//! files each hit is also attributed to its top-level statement.

use crate::core::context::WorkspaceContext;
use crate::core::error::AffectedResult;
use crate::search::{ChangedFileReference, WalkSearch, find_non_source_affected_files};
use crate::syntax::{anchor_for_line, parse_typescript};
use crate::utils::normalize_relative;
use crate::workspace::find_owning_project_name;
use serde_json::{Value, json};
use std::path::Path;
use tracing::debug;

/// Run the refs command
pub fn run_refs(ctx: &WorkspaceContext, file: String, json: bool) -> AffectedResult<()> {
  let file = normalize_relative(&file);
  let references = find_non_source_affected_files(
    &WalkSearch,
    ctx.fs.as_ref(),
    ctx.workspace_root(),
    &file,
    &ctx.config.scan.exclude,
  )?;

  if json {
    let entries: Vec<Value> = references
      .iter()
      .map(|r| {
        let anchors: Vec<Value> = line_anchors(ctx, r)
          .into_iter()
          .map(|(line, anchor)| json!({ "line": line, "kind": anchor.map(|a| a.0), "startLine": anchor.map(|a| a.1) }))
          .collect();
        json!({
          "filePath": r.file_path,
          "changedLines": r.changed_lines,
          "project": find_owning_project_name(&r.file_path, &ctx.projects, true),
          "anchors": anchors,
        })
      })
      .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    return Ok(());
  }

  if references.is_empty() {
    println!("No files reference {}", file);
    return Ok(());
  }

  println!("Files referencing {}: {}", file, references.len());
  for reference in &references {
    let owner = find_owning_project_name(&reference.file_path, &ctx.projects, true).unwrap_or("(no project)");
    println!("  {}  [{}]", reference.file_path, owner);
    for (line, anchor) in line_anchors(ctx, reference) {
      match anchor {
        Some((kind, start)) => println!("    line {} in {} (line {})", line, kind, start),
        None => println!("    line {}", line),
      }
    }
  }

  Ok(())
}

type Anchor = Option<(&'static str, usize)>;

/// Each referencing line with its top-level statement, when the file parses
/// as TypeScript. Other files get bare line numbers.
fn line_anchors(ctx: &WorkspaceContext, reference: &ChangedFileReference) -> Vec<(usize, Anchor)> {
  let bare = || -> Vec<(usize, Anchor)> { reference.changed_lines.iter().map(|l| (*l, None)).collect() };

  let ext = Path::new(&reference.file_path)
    .extension()
    .map(|e| e.to_string_lossy().to_ascii_lowercase())
    .unwrap_or_default();
  let tsx = match ext.as_str() {
    "ts" | "mts" | "cts" => false,
    "tsx" => true,
    _ => return bare(),
  };

  let path = ctx.workspace_root().join(&reference.file_path);
  let source = match ctx.fs.read_to_string(&path) {
    Ok(source) => source,
    Err(e) => {
      debug!("cannot read {} for anchors: {}", path.display(), e);
      return bare();
    }
  };
  let tree = match parse_typescript(&source, tsx) {
    Ok(tree) => tree,
    Err(e) => {
      debug!("cannot parse {}: {}", reference.file_path, e);
      return bare();
    }
  };

  reference
    .changed_lines
    .iter()
    .map(|line| (*line, anchor_for_line(&tree, &source, *line)))
    .collect()
}
