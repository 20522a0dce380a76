//! Role manifests and their dependency graphs.
//!
//! A role directory holds one JSON manifest per role:
//!
//! ```json
//! { "name": "nova-api", "run_list": ["role[nova-core]", "recipe[nova::api]"] }
//! ```
//!
//! The role is keyed `role[<name>]` and depends on every run-list item. Each
//! directory is tagged with the name of its parent directory, so
//! `/srv/chef/prod/roles` has the tag `prod`. All directories together form
//! the `merged` tag.

pub mod graphset;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::HeatVizError;
use crate::edges::{DroppedEdge, EdgeResolver, InclusionFilter};
use crate::graph::Graph;
use crate::template::extract::{CandidateEdge, EdgeOrigin};

/// Tag of the union of all role directories.
pub const MERGED_TAG: &str = "merged";

/// Role key to run-list items, sorted by key.
pub type RunLists = BTreeMap<String, Vec<String>>;

/// One role manifest file. Fields other than these are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleManifest {
    pub name: String,
    #[serde(default)]
    pub run_list: Vec<String>,
}

/// Graph key of a role.
#[must_use]
pub fn role_key(name: &str) -> String {
    format!("role[{name}]")
}

/// Load every `*.json` manifest of `dir`, in file name order.
///
/// # Errors
///
/// - [`HeatVizError::NotADirectory`] if `dir` is not a directory
/// - [`HeatVizError::RoleParseError`] if a manifest is not valid
pub fn load_dir(dir: &Path) -> Result<RunLists> {
    if !dir.is_dir() {
        return Err(HeatVizError::NotADirectory {
            path: dir.display().to_string(),
        }
        .into());
    }

    let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid manifest pattern {pattern}"))?
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    files.sort();

    let mut run_lists = RunLists::new();
    for file in files {
        let text = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read role manifest {}", file.display()))?;
        let manifest: RoleManifest =
            serde_json::from_str(&text).map_err(|e| HeatVizError::RoleParseError {
                file: file.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!("{}: role {} with {} items", file.display(), manifest.name, manifest.run_list.len());
        run_lists.insert(role_key(&manifest.name), manifest.run_list);
    }

    if run_lists.is_empty() {
        warn!("No role manifests in {}", dir.display());
    }
    Ok(run_lists)
}

/// Tag of a role directory: the name of its parent directory.
///
/// Falls back to the directory's own name when it has no named parent.
pub fn dir_tag(dir: &Path) -> Result<String> {
    let absolute = std::path::absolute(dir)
        .with_context(|| format!("Failed to resolve {}", dir.display()))?;
    let tag = absolute
        .parent()
        .and_then(Path::file_name)
        .or_else(|| absolute.file_name())
        .map_or_else(|| "root".to_string(), |name| name.to_string_lossy().into_owned());
    Ok(tag)
}

/// Run lists per tag, `merged` first and then the directory tags in
/// argument order.
#[derive(Debug, Clone, Default)]
pub struct RoleSet {
    merged: RunLists,
    by_tag: Vec<(String, RunLists)>,
}

impl RoleSet {
    /// Load and merge role directories. A role defined in several
    /// directories takes its run list from the last one; a repeated tag
    /// replaces the earlier directory's roles under that tag.
    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Result<Self> {
        let mut set = Self::default();
        for dir in dirs {
            let dir = dir.as_ref();
            let run_lists = load_dir(dir)?;
            let tag = dir_tag(dir)?;
            debug!("{} has tag {tag}", dir.display());
            set.insert(tag, run_lists);
        }
        Ok(set)
    }

    /// Add the run lists of one tag.
    pub fn insert(&mut self, tag: String, run_lists: RunLists) {
        self.merged.extend(run_lists.iter().map(|(k, v)| (k.clone(), v.clone())));

        if tag == MERGED_TAG {
            warn!("Directory tag '{MERGED_TAG}' is reserved; its roles only appear merged");
            return;
        }
        match self.by_tag.iter_mut().find(|(existing, _)| *existing == tag) {
            Some((_, existing)) => {
                warn!("Tag {tag} appears more than once; keeping the last directory");
                *existing = run_lists;
            }
            None => self.by_tag.push((tag, run_lists)),
        }
    }

    /// Every tag with its run lists, `merged` first.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &RunLists)> {
        std::iter::once((MERGED_TAG, &self.merged))
            .chain(self.by_tag.iter().map(|(tag, lists)| (tag.as_str(), lists)))
    }

    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags().map(|(tag, _)| tag).collect()
    }

    #[must_use]
    pub fn merged(&self) -> &RunLists {
        &self.merged
    }
}

/// Graph of roles and their run-list items, edges from role to item.
///
/// Every key and item becomes a node, so with a match-all filter nothing is
/// dropped.
#[must_use]
pub fn build_graph(run_lists: &RunLists, filter: &InclusionFilter) -> (Graph, Vec<DroppedEdge>) {
    let mut graph = Graph::new();
    let mut candidates = Vec::new();

    for (key, items) in run_lists {
        graph.get_or_create(key);
        for item in items {
            graph.get_or_create(item);
            candidates.push(CandidateEdge::new(key, item, EdgeOrigin::Explicit));
        }
    }

    let dropped = EdgeResolver::new(filter).resolve(&mut graph, &candidates);
    (graph, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_role;
    use tempfile::TempDir;

    #[test]
    fn test_load_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("prod/roles");
        write_role(&dir, "web", &["role[base]", "recipe[nginx]"]);
        write_role(&dir, "base", &[]);
        fs::write(dir.join("README.md"), "not a role").unwrap();

        let run_lists = load_dir(&dir).unwrap();
        assert_eq!(run_lists.len(), 2);
        assert_eq!(run_lists["role[web]"], vec!["role[base]", "recipe[nginx]"]);
        assert!(run_lists["role[base]"].is_empty());
        assert_eq!(dir_tag(&dir).unwrap(), "prod");
    }

    #[test]
    fn test_missing_run_list_is_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.json"), r#"{"name": "a", "description": "x"}"#).unwrap();
        let run_lists = load_dir(tmp.path()).unwrap();
        assert!(run_lists["role[a]"].is_empty());
    }

    #[test]
    fn test_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("role.json");
        fs::write(&file, "{}").unwrap();
        let err = load_dir(&file).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeatVizError>(),
            Some(HeatVizError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_bad_manifest() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.json"), r#"{"run_list": []}"#).unwrap();
        let err = load_dir(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeatVizError>(),
            Some(HeatVizError::RoleParseError { .. })
        ));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let prod = tmp.path().join("prod/roles");
        let stage = tmp.path().join("stage/roles");
        write_role(&prod, "web", &["recipe[old]"]);
        write_role(&stage, "web", &["recipe[new]"]);
        write_role(&stage, "db", &[]);

        let set = RoleSet::load(&[&prod, &stage]).unwrap();
        assert_eq!(set.tag_names(), vec!["merged", "prod", "stage"]);
        assert_eq!(set.merged()["role[web]"], vec!["recipe[new]"]);
        assert_eq!(set.merged().len(), 2);
    }

    #[test]
    fn test_build_graph() {
        let mut run_lists = RunLists::new();
        run_lists.insert("role[web]".into(), vec!["role[base]".into(), "recipe[nginx]".into()]);
        run_lists.insert("role[base]".into(), vec!["recipe[ntp]".into()]);

        let (graph, dropped) = build_graph(&run_lists, &InclusionFilter::match_all());
        assert!(dropped.is_empty());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.edge_keys().contains(&("role[web]".into(), "role[base]".into())));
    }
}
