//! Syntax-tree helpers
//!
//! - **anchor**: top-level statement enclosing a node or line

pub mod anchor;

pub use anchor::{anchor_for_line, parse_typescript};
