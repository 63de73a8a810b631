use std::collections::HashMap;

use crate::error::InstallError;
use crate::model::plugin::{Component, MoodlePlugin};

/// Plugins keyed by component, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PluginCollection {
    items: Vec<MoodlePlugin>,
}

impl PluginCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `plugin`, replacing any earlier plugin with the same component in place.
    pub fn add(&mut self, plugin: MoodlePlugin) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.component == plugin.component)
        {
            Some(existing) => *existing = plugin,
            None => self.items.push(plugin),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoodlePlugin> {
        self.items.iter()
    }

    pub fn sort_by_dependencies(
        &self,
        sorter: &dyn DependencySorter,
    ) -> Result<PluginCollection, InstallError> {
        sorter.sort(self)
    }
}

impl IntoIterator for PluginCollection {
    type Item = MoodlePlugin;
    type IntoIter = std::vec::IntoIter<MoodlePlugin>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<MoodlePlugin> for PluginCollection {
    fn from_iter<I: IntoIterator<Item = MoodlePlugin>>(iter: I) -> Self {
        let mut collection = Self::new();
        for plugin in iter {
            collection.add(plugin);
        }
        collection
    }
}

/// Orders a collection so every plugin comes after the members it depends on.
pub trait DependencySorter {
    fn sort(&self, plugins: &PluginCollection) -> Result<PluginCollection, InstallError>;
}

/// Depth-first topological sort. Independent plugins keep their insertion order and
/// dependencies outside the collection are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologicalSorter;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl DependencySorter for TopologicalSorter {
    fn sort(&self, plugins: &PluginCollection) -> Result<PluginCollection, InstallError> {
        let index: HashMap<&Component, usize> = plugins
            .items
            .iter()
            .enumerate()
            .map(|(idx, plugin)| (&plugin.component, idx))
            .collect();

        let mut marks: Vec<Option<Mark>> = vec![None; plugins.items.len()];
        let mut order = Vec::with_capacity(plugins.items.len());
        let mut path = Vec::new();

        for idx in 0..plugins.items.len() {
            visit(plugins, &index, idx, &mut marks, &mut path, &mut order)?;
        }

        Ok(order
            .into_iter()
            .map(|idx| plugins.items[idx].clone())
            .collect())
    }
}

fn visit(
    plugins: &PluginCollection,
    index: &HashMap<&Component, usize>,
    idx: usize,
    marks: &mut [Option<Mark>],
    path: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> Result<(), InstallError> {
    match marks[idx] {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|&p| p == idx).unwrap_or(0);
            let mut components: Vec<String> = path[start..]
                .iter()
                .map(|&p| plugins.items[p].component.to_string())
                .collect();
            components.push(plugins.items[idx].component.to_string());
            return Err(InstallError::CircularDependency { components });
        }
        None => {}
    }

    marks[idx] = Some(Mark::Visiting);
    path.push(idx);

    for dependency in &plugins.items[idx].dependencies {
        if let Some(&dep_idx) = index.get(dependency) {
            visit(plugins, index, dep_idx, marks, path, order)?;
        }
    }

    path.pop();
    marks[idx] = Some(Mark::Done);
    order.push(idx);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plugin(component: &str, deps: &[&str]) -> MoodlePlugin {
        MoodlePlugin {
            directory: PathBuf::from(format!("/src/{component}")),
            component: Component::new(component),
            dependencies: deps.iter().map(|d| Component::new(*d)).collect(),
        }
    }

    fn components(collection: &PluginCollection) -> Vec<&str> {
        collection.iter().map(|p| p.component.as_str()).collect()
    }

    #[test]
    fn test_add_replaces_same_component() {
        let mut collection = PluginCollection::new();
        collection.add(plugin("local_a", &[]));
        collection.add(plugin("local_b", &[]));

        let mut replacement = plugin("local_a", &[]);
        replacement.directory = PathBuf::from("/elsewhere");
        collection.add(replacement);

        assert_eq!(collection.len(), 2);
        assert_eq!(components(&collection), vec!["local_a", "local_b"]);
        let directories: Vec<PathBuf> = collection
            .iter()
            .map(|plugin| plugin.directory.clone())
            .collect();
        assert_eq!(
            directories,
            vec![PathBuf::from("/elsewhere"), PathBuf::from("/src/local_b")]
        );
    }

    #[test]
    fn test_sort_dependencies_first() {
        let collection: PluginCollection = vec![
            plugin("local_a", &["local_b"]),
            plugin("local_b", &[]),
            plugin("local_c", &["local_a"]),
        ]
        .into_iter()
        .collect();

        let sorted = collection.sort_by_dependencies(&TopologicalSorter).unwrap();
        assert_eq!(components(&sorted), vec!["local_b", "local_a", "local_c"]);
    }

    #[test]
    fn test_sort_keeps_insertion_order_for_independent_plugins() {
        let collection: PluginCollection = vec![
            plugin("block_z", &[]),
            plugin("block_a", &[]),
            plugin("block_m", &[]),
        ]
        .into_iter()
        .collect();

        let sorted = collection.sort_by_dependencies(&TopologicalSorter).unwrap();
        assert_eq!(components(&sorted), vec!["block_z", "block_a", "block_m"]);
    }

    #[test]
    fn test_sort_ignores_external_dependencies() {
        let collection: PluginCollection = vec![
            plugin("local_a", &["mod_forum", "local_b"]),
            plugin("local_b", &["core_user"]),
        ]
        .into_iter()
        .collect();

        let sorted = collection.sort_by_dependencies(&TopologicalSorter).unwrap();
        assert_eq!(components(&sorted), vec!["local_b", "local_a"]);
    }

    #[test]
    fn test_sort_detects_cycle() {
        let collection: PluginCollection = vec![
            plugin("local_a", &["local_b"]),
            plugin("local_b", &["local_c"]),
            plugin("local_c", &["local_a"]),
        ]
        .into_iter()
        .collect();

        let err = collection
            .sort_by_dependencies(&TopologicalSorter)
            .unwrap_err();
        match err {
            InstallError::CircularDependency { components } => {
                assert_eq!(components, vec!["local_a", "local_b", "local_c", "local_a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sort_empty_collection() {
        let sorted = PluginCollection::new()
            .sort_by_dependencies(&TopologicalSorter)
            .unwrap();
        assert!(sorted.is_empty());
    }
}
