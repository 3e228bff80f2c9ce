//! Integration tests for `true-affected affected`

use crate::helpers::{TestWorkspace, git, run_json, run_lines, run_true_affected, run_true_affected_raw};
use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

/// proj1 → proj2 (implicit), proj3 standalone, all committed with a baseline
fn nx_workspace() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_project("proj1", "libs/proj1", Some("library"), &["proj2"])?;
  ws.add_project("proj2", "libs/proj2", Some("library"), &[])?;
  ws.add_project("proj3", "apps/proj3", Some("application"), &[])?;
  ws.write_file("apps/proj3/src/app.html", "<h1>hello</h1>\n")?;
  ws.write_file(
    "apps/proj3/src/app.component.ts",
    "import { Component } from '@angular/core';\n\n@Component({\n  templateUrl: './app.html',\n})\nexport class AppComponent {}\n",
  )?;
  ws.commit("Add projects")?;
  ws.mark_baseline()?;
  Ok(ws)
}

#[test]
fn test_affected_basic() -> Result<()> {
  let ws = nx_workspace()?;

  ws.write_file("libs/proj2/src/index.ts", "export const name = 'changed';\n")?;
  ws.commit("Modify proj2")?;

  let names = run_lines(&ws.path, &["affected", "--since", "origin/main", "--format", "names"])?;
  assert_eq!(names, vec!["proj1", "proj2"]);

  Ok(())
}

#[test]
fn test_affected_uses_configured_base() -> Result<()> {
  let ws = nx_workspace()?;
  git(&ws.path, &["branch", "release"])?;
  ws.write_file("affected.toml", "[git]\nbase = \"release\"\n")?;
  ws.write_file("libs/proj1/src/index.ts", "export const name = 'changed';\n")?;
  ws.commit("Modify proj1")?;

  let names = run_lines(&ws.path, &["affected", "--format", "names"])?;
  assert_eq!(names, vec!["proj1"]);

  Ok(())
}

#[test]
fn test_affected_no_changes() -> Result<()> {
  let ws = nx_workspace()?;

  let output = run_true_affected(&ws.path, &["affected", "--since", "origin/main"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(
    stdout.contains("Changed files: 0") && stdout.contains("Direct impact: 0"),
    "Should indicate no changes, got: {}",
    stdout
  );

  Ok(())
}

#[test]
fn test_affected_json_output() -> Result<()> {
  let ws = nx_workspace()?;

  ws.write_file("libs/proj2/project.json", "{ \"name\": \"proj2\", \"sourceRoot\": \"libs/proj2/src\", \"tags\": [] }\n")?;
  ws.commit("Tag proj2")?;

  let value = run_json(&ws.path, &["affected", "--since", "origin/main", "--format", "json"])?;

  assert_eq!(value["changed_files"], json!(["libs/proj2/project.json"]));
  assert_eq!(value["impact"]["direct"], json!(["proj2"]));
  assert_eq!(value["impact"]["dependents"], json!(["proj1"]));
  assert_eq!(value["impact"]["affected"], json!(["proj1", "proj2"]));
  assert_eq!(value["summary"]["affected_count"], json!(2));

  Ok(())
}

#[test]
fn test_non_source_change_reports_references() -> Result<()> {
  let ws = nx_workspace()?;

  ws.write_file("apps/proj3/src/app.html", "<h1>changed</h1>\n")?;
  ws.commit("Change template")?;

  let value = run_json(&ws.path, &["affected", "--since", "origin/main", "--format", "json"])?;

  assert_eq!(value["impact"]["affected"], json!(["proj3"]));
  assert_eq!(
    value["references"]["apps/proj3/src/app.html"],
    json!([{ "filePath": "apps/proj3/src/app.component.ts", "changedLines": [4] }])
  );

  let value = run_json(
    &ws.path,
    &["affected", "--since", "origin/main", "--format", "json", "--no-scan"],
  )?;
  assert_eq!(value["references"], json!({}));

  Ok(())
}

#[test]
fn test_affected_ref_pair() -> Result<()> {
  let ws = nx_workspace()?;
  let base = git(&ws.path, &["rev-parse", "HEAD"])?;
  let base = String::from_utf8_lossy(&base.stdout).trim().to_string();

  ws.write_file("apps/proj3/src/index.ts", "export const name = 'v2';\n")?;
  let first = ws.commit("Change proj3")?;
  ws.write_file("libs/proj2/src/index.ts", "export const name = 'v2';\n")?;
  ws.commit("Change proj2")?;

  let names = run_lines(&ws.path, &["affected", "--from", &base, "--to", &first, "--format", "names"])?;
  assert_eq!(names, vec!["proj3"]);

  Ok(())
}

#[test]
fn test_affected_uncommitted() -> Result<()> {
  let ws = nx_workspace()?;

  ws.write_file("libs/proj1/src/new-file.ts", "export {};\n")?;

  let names = run_lines(
    &ws.path,
    &["affected", "--since", "origin/main", "--uncommitted", "--format", "names"],
  )?;
  assert_eq!(names, vec!["proj1"]);

  let names = run_lines(&ws.path, &["affected", "--since", "origin/main", "--format", "names"])?;
  assert!(names.is_empty());

  Ok(())
}

#[test]
fn test_affected_dry_run() -> Result<()> {
  let ws = nx_workspace()?;

  ws.write_file("libs/proj2/src/index.ts", "export const name = 'changed';\n")?;
  ws.commit("Modify proj2")?;

  let output = run_true_affected(&ws.path, &["affected", "--since", "origin/main", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("DRY RUN: Would analyze 1 changed files"), "got: {}", stdout);
  assert!(stdout.contains("libs/proj2/src/index.ts"));
  assert!(!stdout.contains("Direct impact"));

  Ok(())
}

#[test]
fn test_explicit_files_without_git() -> Result<()> {
  let tmp = TempDir::new()?;
  std::fs::write(
    tmp.path().join("workspace.json"),
    r#"{
  "version": 2,
  "projects": {
    "proj1": { "sourceRoot": "proj1/src", "implicitDependencies": ["proj2"] },
    "proj2": "proj2"
  }
}"#,
  )?;

  let names = run_lines(
    tmp.path(),
    &["affected", "--files", "proj2/src/index.ts", "proj2/src/index.ts", "--format", "names"],
  )?;
  assert_eq!(names, vec!["proj1", "proj2"]);

  Ok(())
}

#[test]
fn test_missing_git_repository_is_reported() -> Result<()> {
  let tmp = TempDir::new()?;

  let output = run_true_affected_raw(tmp.path(), &["affected", "--since", "origin/main"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr.contains("Git repository not found"), "got: {}", stderr);
  assert!(stderr.contains("--files"));

  Ok(())
}

#[test]
fn test_unknown_format_is_a_user_error() -> Result<()> {
  let tmp = TempDir::new()?;

  let output = run_true_affected_raw(tmp.path(), &["affected", "--files", "a.ts", "--format", "yaml"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format"));

  Ok(())
}
