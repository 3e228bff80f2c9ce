//! Integration tests for `true-affected refs`

use crate::helpers::{TestWorkspace, run_json, run_true_affected};
use anyhow::Result;
use serde_json::json;

fn workspace_with_template() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_project("ui", "libs/ui", Some("library"), &[])?;
  ws.write_file("libs/ui/src/button.html", "<button></button>\n")?;
  ws.write_file(
    "libs/ui/src/button.component.ts",
    "import { Component } from '@angular/core';\n\nexport const buttonConfig = {\n  selector: 'ui-button',\n  templateUrl: './button.html',\n};\n",
  )?;
  // Same name, other directory: never a reference
  ws.write_file("libs/ui/src/other/page.ts", "const t = './button.html';\n")?;
  Ok(ws)
}

#[test]
fn test_refs_json() -> Result<()> {
  let ws = workspace_with_template()?;

  let value = run_json(&ws.path, &["refs", "libs/ui/src/button.html", "--json"])?;

  assert_eq!(
    value,
    json!([{
      "filePath": "libs/ui/src/button.component.ts",
      "changedLines": [5],
      "project": "ui",
      "anchors": [{ "line": 5, "kind": "export_statement", "startLine": 3 }]
    }])
  );

  Ok(())
}

#[test]
fn test_refs_text() -> Result<()> {
  let ws = workspace_with_template()?;

  let output = run_true_affected(&ws.path, &["refs", "./libs/ui/src/button.html"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Files referencing libs/ui/src/button.html: 1"), "got: {}", stdout);
  assert!(stdout.contains("libs/ui/src/button.component.ts  [ui]"));
  assert!(!stdout.contains("page.ts"));

  Ok(())
}

#[test]
fn test_refs_deleted_file_has_no_references() -> Result<()> {
  let ws = workspace_with_template()?;
  std::fs::remove_file(ws.path.join("libs/ui/src/button.html"))?;

  let output = run_true_affected(&ws.path, &["refs", "libs/ui/src/button.html"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("No files reference libs/ui/src/button.html"));

  Ok(())
}
