//! Integration tests for `true-affected projects`

use crate::helpers::{TestWorkspace, run_json, run_true_affected};
use anyhow::Result;
use serde_json::json;

#[test]
fn test_projects_json_resolves_tsconfig_cascade() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_project("lib-with-tsconfig", "libs/a", Some("library"), &[])?;
  ws.write_file("libs/a/tsconfig.lib.json", "{}\n")?;
  ws.add_project("lib-without-tsconfig", "libs/b", Some("library"), &[])?;
  ws.add_project("app", "apps/app", Some("application"), &["lib-with-tsconfig"])?;
  ws.write_file("apps/app/tsconfig.app.json", "{}\n")?;

  let value = run_json(&ws.path, &["projects", "--json"])?;

  assert_eq!(
    value,
    json!([
      {
        "name": "app",
        "root": "apps/app",
        "sourceRoot": "apps/app/src",
        "tsConfig": "apps/app/tsconfig.app.json",
        "implicitDependencies": ["lib-with-tsconfig"]
      },
      {
        "name": "lib-with-tsconfig",
        "root": "libs/a",
        "sourceRoot": "libs/a/src",
        "tsConfig": "libs/a/tsconfig.lib.json",
        "implicitDependencies": []
      },
      {
        "name": "lib-without-tsconfig",
        "root": "libs/b",
        "sourceRoot": "libs/b/src",
        "tsConfig": "libs/b/tsconfig.json",
        "implicitDependencies": []
      }
    ])
  );

  Ok(())
}

#[test]
fn test_nested_config_replaces_aggregate_entry() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file(
    "workspace.json",
    r#"{ "version": 2, "projects": { "proj1": { "sourceRoot": "old/src", "implicitDependencies": ["x"] }, "proj2": "libs/proj2" } }"#,
  )?;
  ws.add_project("proj1", "libs/proj1", None, &[])?;

  let value = run_json(&ws.path, &["projects", "--json"])?;
  let projects = value.as_array().expect("array");

  assert_eq!(projects.len(), 2);
  assert_eq!(projects[0]["name"], "proj1");
  assert_eq!(projects[0]["sourceRoot"], "libs/proj1/src");
  assert_eq!(projects[0]["implicitDependencies"], json!([]));
  assert_eq!(projects[1]["name"], "proj2");
  assert_eq!(projects[1]["tsConfig"], "libs/proj2/tsconfig.json");

  Ok(())
}

#[test]
fn test_projects_text_lists_dependents_and_warnings() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_project("proj1", "libs/proj1", None, &["proj2"])?;
  ws.add_project("proj2", "libs/proj2", None, &[])?;
  ws.write_file("libs/broken/project.json", "{ this is not json")?;

  let output = run_true_affected(&ws.path, &["projects"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(stdout.contains("Projects: 2"), "got: {}", stdout);
  assert!(stdout.contains("depends on:  proj2"));
  assert!(stdout.contains("dependents:  proj1"));
  assert!(stdout.contains("libs/broken/project.json"));
  assert!(stderr.contains("libs/broken/project.json"), "warning should be logged: {}", stderr);

  Ok(())
}

#[test]
fn test_config_excludes_directories() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_project("proj1", "libs/proj1", None, &[])?;
  ws.add_project("vendored", "third_party/vendored", None, &[])?;
  ws.add_project("dep", "node_modules/dep", None, &[])?;
  ws.write_file(
    "affected.toml",
    "[workspace]\nexclude = [\"node_modules\", \"third_party\"]\n",
  )?;

  let value = run_json(&ws.path, &["projects", "--json"])?;
  let names: Vec<&str> = value
    .as_array()
    .expect("array")
    .iter()
    .filter_map(|p| p["name"].as_str())
    .collect();
  assert_eq!(names, vec!["proj1"]);

  Ok(())
}

#[test]
fn test_invalid_config_is_a_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("affected.toml", "[workspace]\nproject_patterns = [\"[\"]\n")?;

  let output = crate::helpers::run_true_affected_raw(&ws.path, &["projects"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
