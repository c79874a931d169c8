//! In-memory lookup over a precomputed graph
//!
//! Answers lookups from a `DependencyGraph`, typically loaded from a JSON
//! graph file. Packages that are not keys of the graph fail as not found.

use crate::domain::{DependencyGraph, PackageName};
use crate::error::LookupError;
use crate::lookup::DependencyLookup;
use async_trait::async_trait;

const SOURCE_NAME: &str = "graph file";

/// Lookup answering from a fixed dependency graph
#[derive(Debug, Clone, Default)]
pub struct MemoryLookup {
    graph: DependencyGraph,
}

impl MemoryLookup {
    /// Create a lookup over the given graph
    pub fn new(graph: DependencyGraph) -> Self {
        Self { graph }
    }

    /// Build a lookup from `(package, [dependencies])` pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let mut graph = DependencyGraph::new();
        for (name, deps) in pairs {
            graph.insert(
                PackageName::from(name),
                deps.iter().map(|d| PackageName::from(*d)).collect(),
            );
        }
        Self { graph }
    }
}

#[async_trait]
impl DependencyLookup for MemoryLookup {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn lookup(&self, package: &PackageName) -> Result<Vec<PackageName>, LookupError> {
        self.graph
            .get(package.as_str())
            .map(<[PackageName]>::to_vec)
            .ok_or_else(|| LookupError::package_not_found(package.as_str(), SOURCE_NAME))
    }
}
