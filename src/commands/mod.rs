//! CLI commands for true-affected
//!
//! - **affected**: projects affected by a set of changed files
//! - **projects**: the resolved project list
//! - **refs**: files referencing a single non-source file
//!
//! All commands accept `&WorkspaceContext` to avoid redundant workspace loads.

pub mod affected;
pub mod projects;
pub mod refs;

pub use affected::{ChangeSource, run_affected};
pub use projects::run_projects;
pub use refs::run_refs;
