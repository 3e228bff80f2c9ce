//! Core building blocks shared by every command
//!
//! - **config**: tool configuration (affected.toml) parsing and validation
//! - **context**: workspace context, built once per invocation
//! - **error**: error types with contextual help messages
//! - **vcs**: changed files from git (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
