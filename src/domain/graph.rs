//! Dependency graph built during discovery

use super::PackageName;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A directed "depends on" edge between two packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge<'a> {
    /// The depending package
    pub from: &'a PackageName,
    /// The package depended upon
    pub to: &'a PackageName,
}

/// Insertion-ordered mapping from a package to its direct dependencies
///
/// Keys are the packages that were expanded. A name may appear as a
/// dependency without being a key: its expansion was cut off by the depth
/// budget, or its lookup failed. A key with an empty list is a genuine leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    entries: Vec<(PackageName, Vec<PackageName>)>,
    index: HashMap<PackageName, usize>,
}

impl DependencyGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package with its dependency list
    ///
    /// Returns false and leaves the graph untouched if the package is
    /// already a key.
    pub fn insert(&mut self, name: PackageName, dependencies: Vec<PackageName>) -> bool {
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, dependencies));
        true
    }

    /// Returns the dependency list of a package, if it was expanded
    pub fn get(&self, name: &str) -> Option<&[PackageName]> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Returns true if the package is a key
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no package was expanded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates keys and their dependency lists in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &[PackageName])> {
        self.entries
            .iter()
            .map(|(name, deps)| (name, deps.as_slice()))
    }

    /// Iterates all edges: keys in insertion order, then each list in order
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> {
        self.entries
            .iter()
            .flat_map(|(from, deps)| deps.iter().map(move |to| DependencyEdge { from, to }))
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|(_, deps)| deps.len()).sum()
    }

    /// Dependency names that were never expanded, in first-seen order
    pub fn unexpanded(&self) -> Vec<&PackageName> {
        let mut seen = HashSet::new();
        self.edges()
            .map(|edge| edge.to)
            .filter(|to| !self.contains(to.as_str()) && seen.insert(*to))
            .collect()
    }

    /// Parses a graph from a JSON object of `name -> [dependency, ...]`
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, deps) in &self.entries {
            map.serialize_entry(name, deps)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DependencyGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GraphVisitor;

        impl<'de> Visitor<'de> for GraphVisitor {
            type Value = DependencyGraph;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of package names to dependency lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut graph = DependencyGraph::new();
                while let Some((name, deps)) = map.next_entry::<PackageName, Vec<PackageName>>()? {
                    if graph.contains(name.as_str()) {
                        return Err(de::Error::custom(format!("duplicate package '{}'", name)));
                    }
                    graph.insert(name, deps);
                }
                Ok(graph)
            }
        }

        deserializer.deserialize_map(GraphVisitor)
    }
}
