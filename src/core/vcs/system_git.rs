//! System git backend
//!
//! Shells out to the `git` binary for the two questions this tool asks:
//! what changed between two refs, and what is uncommitted right now.
//! Paths come back relative to the directory the repository was opened
//! at, which is the workspace root, not necessarily the repository root.

use crate::core::error::{AffectedError, AffectedResult, GitError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Git backend using system git
pub struct SystemGit {
  /// Workspace directory, where commands run
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`.
  pub fn open(path: &Path) -> AffectedResult<Self> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(path).args(["rev-parse", "--show-toplevel"]);
    let output = run_output(&mut cmd, "git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(AffectedError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(AffectedError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!("git work tree at {}", stdout.trim());

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Files changed between the merge base of `from` and `to`, and `to`.
  ///
  /// Same semantics as `git diff from...to`, which is what CI wants for a
  /// branch compared against its base.
  pub fn changed_files_between(&self, from: &str, to: &str) -> AffectedResult<Vec<String>> {
    let range = format!("{}...{}", from, to);
    self.run_lines(&["diff", "--name-only", "--relative", &range])
  }

  /// Working-tree and staged changes against HEAD, plus untracked files.
  ///
  /// Sorted, without duplicates.
  pub fn uncommitted_files(&self) -> AffectedResult<Vec<String>> {
    let mut files: BTreeSet<String> = self
      .run_lines(&["diff", "--name-only", "--relative", "HEAD"])?
      .into_iter()
      .collect();
    files.extend(self.run_lines(&["ls-files", "--others", "--exclude-standard"])?);
    Ok(files.into_iter().collect())
  }

  fn run_lines(&self, args: &[&str]) -> AffectedResult<Vec<String>> {
    let command = format!("git {}", args.join(" "));
    let output = run_output(self.git_cmd().args(args), &command)?;

    if !output.status.success() {
      return Err(AffectedError::Git(GitError::CommandFailed {
        command,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(parse_name_list(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Create a git command with isolated environment
  ///
  /// - Sets working directory to the workspace path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Disables path quoting so non-ASCII names come back verbatim
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

/// Run a command, reporting a failed spawn as a git error
fn run_output(cmd: &mut Command, command: &str) -> AffectedResult<Output> {
  cmd.output().map_err(|source| {
    AffectedError::Git(GitError::Spawn {
      command: command.to_string(),
      source,
    })
  })
}

/// One path per line, blank lines dropped
fn parse_name_list(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect()
}
