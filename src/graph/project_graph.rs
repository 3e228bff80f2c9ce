//! Implicit dependency graph over resolved projects
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `A → B` means "A lists B in `implicitDependencies`"
//! - **Nodes**: every resolved project, in input order
//! - **Index**: project name → node index
//!
//! Dependency names that match no project are dropped with a debug log. Nx
//! tolerates stale entries there and so do we.

use crate::core::error::{AffectedError, AffectedResult, ConfigError};
use crate::workspace::TrueAffectedProject;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// A project node in the graph.
#[derive(Debug, Clone)]
pub struct ProjectNode {
  pub name: String,
}

/// Implicit dependency graph.
pub struct ProjectGraph {
  graph: DiGraph<ProjectNode, ()>,
  name_to_node: HashMap<String, NodeIndex>,
}

impl ProjectGraph {
  pub fn build(projects: &[TrueAffectedProject]) -> Self {
    let mut graph = DiGraph::new();
    let mut name_to_node = HashMap::new();

    for project in projects {
      let idx = graph.add_node(ProjectNode {
        name: project.name.clone(),
      });
      name_to_node.insert(project.name.clone(), idx);
    }

    for project in projects {
      let from_idx = name_to_node[&project.name];
      for dep in &project.implicit_dependencies {
        match name_to_node.get(dep.as_str()) {
          Some(to_idx) if *to_idx != from_idx => {
            graph.update_edge(from_idx, *to_idx, ());
          }
          Some(_) => debug!("{} lists itself as an implicit dependency", project.name),
          None => debug!("{} depends on unknown project '{}', ignoring", project.name, dep),
        }
      }
    }

    Self { graph, name_to_node }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.name_to_node.contains_key(name)
  }

  /// Direct implicit dependencies of a project (what it lists), sorted.
  pub fn dependencies(&self, name: &str) -> AffectedResult<Vec<String>> {
    let node_idx = self.find_node(name)?;

    let mut deps: Vec<String> = self
      .graph
      .neighbors_directed(node_idx, Direction::Outgoing)
      .map(|idx| self.graph[idx].name.clone())
      .collect();

    deps.sort();
    Ok(deps)
  }

  /// Every project that depends on `name`, directly or transitively.
  ///
  /// Iterative DFS over incoming edges. The start project is never part of
  /// the result, even when it sits on a cycle.
  pub fn transitive_dependents(&self, name: &str) -> AffectedResult<BTreeSet<String>> {
    let start_node = self.find_node(name)?;

    let mut visited = HashSet::new();
    let mut stack = vec![start_node];
    let mut dependents = BTreeSet::new();

    while let Some(node_idx) = stack.pop() {
      if !visited.insert(node_idx) {
        continue;
      }

      for neighbor_idx in self.graph.neighbors_directed(node_idx, Direction::Incoming) {
        if neighbor_idx != start_node {
          dependents.insert(self.graph[neighbor_idx].name.clone());
        }
        stack.push(neighbor_idx);
      }
    }

    Ok(dependents)
  }

  fn find_node(&self, name: &str) -> AffectedResult<NodeIndex> {
    self
      .name_to_node
      .get(name)
      .copied()
      .ok_or_else(|| AffectedError::Config(ConfigError::ProjectNotFound { name: name.to_string() }))
  }
}
