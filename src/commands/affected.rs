//! `true-affected affected` - Show which projects are affected by changes
//!
//! This command collects changed files (from git or `--files`) and determines:
//! - Which projects directly own changed files
//! - Which projects reference a changed non-source file (html, css, json...)
//! - Which projects implicitly depend on any of those

use crate::core::context::WorkspaceContext;
use crate::core::error::{AffectedError, AffectedResult};
use crate::core::vcs::SystemGit;
use crate::graph::{AffectedAnalysis, AnalyzeOptions, ProjectGraph, analyze};
use crate::search::WalkSearch;
use serde_json::json;
use std::collections::BTreeSet;
use tracing::debug;

/// Output format for affected command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  fn from_str(s: &str) -> AffectedResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(AffectedError::with_help(
        format!("Unknown format '{}'", s),
        "Valid formats: text, json, names",
      )),
    }
  }
}

/// Where the changed files come from.
#[derive(Debug, Clone, Default)]
pub struct ChangeSource {
  /// Base ref, compared as `since...HEAD`
  pub since: Option<String>,
  /// Explicit range `from...to`
  pub from: Option<String>,
  pub to: Option<String>,
  /// Explicit file list, bypasses git history
  pub files: Vec<String>,
  /// Add working-tree, staged and untracked files
  pub uncommitted: bool,
}

/// Run the affected command
pub fn run_affected(
  ctx: &WorkspaceContext,
  source: ChangeSource,
  format: String,
  no_scan: bool,
  dry_run: bool,
) -> AffectedResult<()> {
  let output_format = OutputFormat::from_str(&format)?;

  let changed_files = get_changed_files(ctx, &source)?;

  if dry_run {
    println!("DRY RUN: Would analyze {} changed files", changed_files.len());
    for file in &changed_files {
      println!("  - {}", file);
    }
    return Ok(());
  }

  let graph = ProjectGraph::build(&ctx.projects);
  let options = AnalyzeOptions {
    scan: !no_scan,
    progress: output_format == OutputFormat::Text,
  };
  let analysis = analyze(ctx, &graph, &WalkSearch, &changed_files, options)?;

  display_results(&analysis, output_format)
}

/// Collect changed files, workspace-relative
fn get_changed_files(ctx: &WorkspaceContext, source: &ChangeSource) -> AffectedResult<Vec<String>> {
  let mut files: Vec<String> = Vec::new();

  if !source.files.is_empty() {
    files.extend(source.files.iter().cloned());
  } else {
    let git = SystemGit::open(ctx.workspace_root())?;
    let committed = match (source.from.as_deref(), source.to.as_deref()) {
      (Some(from), Some(to)) => git.changed_files_between(from, to)?,
      _ => {
        let base = source.since.as_deref().unwrap_or(&ctx.config.git.base);
        git.changed_files_between(base, "HEAD")?
      }
    };
    files.extend(committed);
  }

  if source.uncommitted {
    let git = SystemGit::open(ctx.workspace_root())?;
    files.extend(git.uncommitted_files()?);
  }

  debug!("{} changed files", files.len());
  Ok(files)
}

/// Display affected analysis results
fn display_results(analysis: &AffectedAnalysis, format: OutputFormat) -> AffectedResult<()> {
  match format {
    OutputFormat::Text => display_text(analysis),
    OutputFormat::Json => display_json(analysis),
    OutputFormat::NamesOnly => display_names_only(analysis),
  }
}

/// Display results in human-readable text format
fn display_text(analysis: &AffectedAnalysis) -> AffectedResult<()> {
  println!("Affected Analysis");
  println!("=================");
  println!();

  println!("Changed files: {}", analysis.changed_files.len());
  if !analysis.changed_files.is_empty() && analysis.changed_files.len() <= 20 {
    for file in &analysis.changed_files {
      println!("  {}", file);
    }
    println!();
  }

  if analysis.impact.is_empty() {
    println!("No projects affected.");
    println!();
  }

  print_projects("Direct impact", "📦", &analysis.impact.direct);
  print_projects("Implicit dependents", "⬆ ", &analysis.impact.dependents);
  print_projects("Affected (direct + dependents)", "🎯", &analysis.impact.affected);

  if !analysis.references.is_empty() {
    println!("Non-source references:");
    for (changed, refs) in &analysis.references {
      println!("  {}", changed);
      for reference in refs {
        let lines: Vec<String> = reference.changed_lines.iter().map(|l| l.to_string()).collect();
        println!("    ↳ {}:{}", reference.file_path, lines.join(","));
      }
    }
  }

  Ok(())
}

fn print_projects(title: &str, marker: &str, names: &BTreeSet<String>) {
  println!("{}: {} projects", title, names.len());
  for name in names {
    println!("  {} {}", marker, name);
  }
  println!();
}

/// Display results in JSON format
fn display_json(analysis: &AffectedAnalysis) -> AffectedResult<()> {
  let output = json!({
      "changed_files": analysis.changed_files,
      "impact": analysis.impact,
      "references": analysis.references,
      "summary": {
          "changed_files_count": analysis.changed_files.len(),
          "direct_count": analysis.impact.direct.len(),
          "dependents_count": analysis.impact.dependents.len(),
          "affected_count": analysis.impact.affected.len()
      }
  });

  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}

/// Display only project names (the affected set)
fn display_names_only(analysis: &AffectedAnalysis) -> AffectedResult<()> {
  for name in &analysis.impact.affected {
    println!("{}", name);
  }

  Ok(())
}
