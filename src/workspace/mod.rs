//! Nx-style workspace model
//!
//! - **fs**: filesystem collaborator (`FileSystem` trait, `OsFileSystem`)
//! - **project**: raw configs, `Project`, `TrueAffectedProject`
//! - **loader**: aggregate + nested `project.json` discovery and merge
//! - **cascade**: effective tsconfig / implicit dependency resolution
//! - **owner**: changed path → owning project

pub mod cascade;
pub mod fs;
pub mod loader;
pub mod owner;
pub mod project;

pub use fs::{FileSystem, OsFileSystem};
pub use loader::{LoadWarning, load_projects};
pub use owner::{find_owner, find_owning_project_name};
pub use project::TrueAffectedProject;
