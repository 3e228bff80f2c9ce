//! Changed file → owning project
//!
//! Roots are tried longest first, so `libs/a/nested` claims
//! `libs/a/nested/file.ts` before its ancestor `libs/a` gets a chance.
//! Matching is per path segment: `libs/lib` does not own `libs/library/x.ts`.

use super::project::TrueAffectedProject;
use crate::utils::{is_within, normalize_relative};

/// Name of the project that owns `path`, if any.
///
/// With `includes_root` the project directory (parent of `sourceRoot`) is
/// matched instead of `sourceRoot`, which catches files such as a project's
/// own `project.json` or `jest.config.ts`.
pub fn find_owning_project_name<'a>(path: &str, projects: &'a [TrueAffectedProject], includes_root: bool) -> Option<&'a str> {
  let path = normalize_relative(path);

  let mut candidates: Vec<(&'a str, String)> = projects
    .iter()
    .map(|p| {
      let root = if includes_root { &p.root } else { &p.source_root };
      (p.name.as_str(), normalize_relative(root))
    })
    .collect();

  // Stable: equal-length roots keep input order
  candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

  candidates
    .into_iter()
    .find(|(_, root)| is_within(&path, root))
    .map(|(name, _)| name)
}

/// Owner by source root first, then by project directory.
pub fn find_owner(path: &str, projects: &[TrueAffectedProject]) -> Option<String> {
  find_owning_project_name(path, projects, false)
    .or_else(|| find_owning_project_name(path, projects, true))
    .map(str::to_string)
}
