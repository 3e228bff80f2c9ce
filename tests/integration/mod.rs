mod test_affected;
mod test_projects;
mod test_refs;
