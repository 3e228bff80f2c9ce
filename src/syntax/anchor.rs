//! Top-level anchor lookup
//!
//! Given any node inside a TypeScript file, find the statement that sits
//! directly under the file root (an import, a class, an `export function`...).
//! That statement is the unit a symbol-level walker attributes a change to.

use crate::core::error::{AffectedError, AffectedResult};
use tree_sitter::{Language, Node, Parser, Tree};

/// Parse TypeScript (or TSX) source.
pub fn parse_typescript(source: &str, tsx: bool) -> AffectedResult<Tree> {
  let language: Language = if tsx {
    tree_sitter_typescript::LANGUAGE_TSX.into()
  } else {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
  };

  let mut parser = Parser::new();
  parser
    .set_language(&language)
    .map_err(|e| AffectedError::message(format!("Failed to load TypeScript grammar: {}", e)))?;

  parser
    .parse(source, None)
    .ok_or_else(|| AffectedError::message("TypeScript parser produced no tree"))
}

/// First node, starting at `node` itself, whose parent is the file root.
///
/// `None` for a `None` input and for the root itself. Parent links in a
/// syntax tree always end at the root, so the loop terminates.
pub fn find_root_node<'tree>(node: Option<Node<'tree>>) -> Option<Node<'tree>> {
  let mut current = node?;
  loop {
    let parent = current.parent()?;
    if parent.parent().is_none() {
      return Some(current);
    }
    current = parent;
  }
}

/// Top-level statement enclosing `byte_offset`, if the offset is inside one.
pub fn top_level_node_at(tree: &Tree, byte_offset: usize) -> Option<Node<'_>> {
  find_root_node(tree.root_node().descendant_for_byte_range(byte_offset, byte_offset))
}

/// Top-level statement covering a 1-based line, as `(kind, 1-based start line)`.
///
/// The lookup starts at the line's first non-blank byte. Blank lines and
/// lines past the end have no anchor.
pub fn anchor_for_line(tree: &Tree, source: &str, line: usize) -> Option<(&'static str, usize)> {
  let mut offset = 0;
  for (idx, text) in source.split_inclusive('\n').enumerate() {
    if idx + 1 == line {
      let indent = text.len() - text.trim_start().len();
      if text.trim().is_empty() {
        return None;
      }
      let node = top_level_node_at(tree, offset + indent)?;
      return Some((node.kind(), node.start_position().row + 1));
    }
    offset += text.len();
  }
  None
}
