//! Project graph and affected analysis
//!
//! - **project_graph**: petgraph digraph over `implicitDependencies`
//! - **affected**: changed files → direct / dependent / affected projects

pub mod affected;
pub mod project_graph;

pub use affected::{AffectedAnalysis, AnalyzeOptions, analyze};
pub use project_graph::ProjectGraph;
