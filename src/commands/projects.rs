//! `true-affected projects` - List resolved projects

use crate::core::context::WorkspaceContext;
use crate::core::error::AffectedResult;
use crate::graph::ProjectGraph;

/// Run the projects command
pub fn run_projects(ctx: &WorkspaceContext, json: bool) -> AffectedResult<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(&ctx.projects)?);
    return Ok(());
  }

  let graph = ProjectGraph::build(&ctx.projects);

  println!("Projects: {}", ctx.projects.len());
  println!();
  for project in &ctx.projects {
    println!("📦 {}", project.name);
    println!("   root:        {}", display_dir(&project.root));
    println!("   sourceRoot:  {}", display_dir(&project.source_root));
    println!("   tsConfig:    {}", project.ts_config);

    let deps = graph.dependencies(&project.name)?;
    if !deps.is_empty() {
      println!("   depends on:  {}", deps.join(", "));
    }
    let dependents = graph.transitive_dependents(&project.name)?;
    if !dependents.is_empty() {
      let names: Vec<&str> = dependents.iter().map(String::as_str).collect();
      println!("   dependents:  {}", names.join(", "));
    }
  }

  if !ctx.warnings.is_empty() {
    println!();
    println!("Skipped {} config file(s):", ctx.warnings.len());
    for warning in &ctx.warnings {
      println!("  ⚠️  {}", warning);
    }
  }

  Ok(())
}

/// Workspace-root projects have an empty root
fn display_dir(dir: &str) -> &str {
  if dir.is_empty() { "." } else { dir }
}
