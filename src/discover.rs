//! Depth-limited dependency graph discovery
//!
//! This module provides:
//! - Sequential depth-first traversal over an explicit worklist (the default)
//! - Opt-in concurrent prefetch with a bounded number of in-flight lookups,
//!   replayed through the sequential traversal
//! - Per-node failure isolation: a failed lookup prunes only its own subtree

use crate::domain::{DependencyGraph, LookupFailure, PackageName, TraversalBudget};
use crate::error::{ConfigError, LookupError};
use crate::lookup::DependencyLookup;
use crate::progress::Progress;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{debug, warn};

/// Configuration for a discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscoveryConfig {
    /// Depth limit
    pub budget: TraversalBudget,
    /// Maximum lookups in flight; `None` keeps the sequential traversal
    pub concurrency: Option<usize>,
}

impl DiscoveryConfig {
    /// Sequential configuration with the given maximum depth
    pub fn new(max_depth: u32) -> Self {
        Self {
            budget: TraversalBudget::new(max_depth),
            concurrency: None,
        }
    }

    /// Enable concurrent lookups
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }
}

/// Outcome of one discovery run
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Root package the traversal started from
    pub root: PackageName,
    /// Expanded packages and their direct dependencies
    pub graph: DependencyGraph,
    /// Packages whose lookup failed; none of them is a graph key
    pub failures: Vec<LookupFailure>,
    /// Number of lookups performed
    pub lookups: usize,
}

impl Discovery {
    fn empty(root: PackageName) -> Self {
        Self {
            root,
            graph: DependencyGraph::new(),
            failures: Vec::new(),
            lookups: 0,
        }
    }

    /// Returns true if nothing was discovered
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns true if the root's own lookup failed
    pub fn root_failed(&self) -> bool {
        self.failures.iter().any(|f| f.package == self.root)
    }
}

/// Lookup results by package; failures keep only their message
type LookupCache = HashMap<PackageName, Result<Vec<PackageName>, String>>;

/// Walks the "depends on" relation from a root package
pub struct Discoverer {
    lookup: Arc<dyn DependencyLookup>,
    config: DiscoveryConfig,
}

impl Discoverer {
    /// Create a discoverer, rejecting a concurrency limit of zero
    pub fn new(
        lookup: Arc<dyn DependencyLookup>,
        config: DiscoveryConfig,
    ) -> Result<Self, ConfigError> {
        if config.concurrency == Some(0) {
            return Err(ConfigError::InvalidConcurrency { value: 0 });
        }
        Ok(Self { lookup, config })
    }

    /// Create a sequential discoverer with the given maximum depth
    pub fn sequential(lookup: Arc<dyn DependencyLookup>, max_depth: u32) -> Self {
        Self {
            lookup,
            config: DiscoveryConfig::new(max_depth),
        }
    }

    /// Discover the dependency graph below `root`
    pub async fn discover(&self, root: &PackageName) -> Discovery {
        self.discover_with_progress(root, &Progress::disabled()).await
    }

    /// Discover the dependency graph below `root`, reporting each lookup
    pub async fn discover_with_progress(&self, root: &PackageName, progress: &Progress) -> Discovery {
        debug!(
            root = %root,
            max_depth = self.config.budget.max_depth(),
            source = self.lookup.source_name(),
            "starting discovery"
        );

        let discovery = match self.config.concurrency {
            None => self.discover_sequential(root, LookupCache::new(), progress).await,
            Some(limit) => self.discover_concurrent(root, limit, progress).await,
        };

        debug!(
            root = %root,
            packages = discovery.graph.len(),
            failures = discovery.failures.len(),
            lookups = discovery.lookups,
            "discovery finished"
        );
        discovery
    }

    /// Depth-first pre-order traversal, one lookup at a time
    ///
    /// Children are pushed in reverse so they pop in the order the lookup
    /// returned them. A name is checked against the visited set and budget
    /// when popped, so skipped names are never marked visited. Results
    /// already in `cache` are used instead of a fresh lookup.
    async fn discover_sequential(
        &self,
        root: &PackageName,
        mut cache: LookupCache,
        progress: &Progress,
    ) -> Discovery {
        let budget = self.config.budget;
        let mut discovery = Discovery::empty(root.clone());
        let mut visited: HashSet<PackageName> = HashSet::new();
        let mut stack = vec![(root.clone(), 0u32)];

        while let Some((name, depth)) = stack.pop() {
            if visited.contains(&name) || !budget.allows(depth) {
                continue;
            }
            visited.insert(name.clone());

            let result = match cache.remove(&name) {
                Some(cached) => cached,
                None => {
                    progress.set_message(&format!("Looking up {}", name));
                    let result = self.lookup.lookup(&name).await.map_err(|e| e.to_string());
                    progress.inc();
                    discovery.lookups += 1;
                    result
                }
            };

            match result {
                Ok(deps) => {
                    debug!(package = %name, depth, count = deps.len(), "resolved dependencies");
                    stack.extend(deps.iter().rev().map(|dep| (dep.clone(), depth + 1)));
                    discovery.graph.insert(name, deps);
                }
                Err(message) => {
                    warn!(package = %name, depth, error = %message, "dependency lookup failed");
                    discovery
                        .failures
                        .push(LookupFailure::new(name, depth, message));
                }
            }
        }

        discovery
    }

    /// Concurrent traversal with at most `limit` lookups in flight
    ///
    /// Lookups are prefetched level by level, each node at its minimum depth,
    /// then the sequential traversal is replayed over the results. The graph
    /// and failures match sequential mode whatever order lookups finish in.
    async fn discover_concurrent(
        &self,
        root: &PackageName,
        limit: usize,
        progress: &Progress,
    ) -> Discovery {
        let (cache, lookups) = self.prefetch(root, limit, progress).await;
        let mut discovery = self.discover_sequential(root, cache, progress).await;
        discovery.lookups += lookups;
        discovery
    }

    /// Look up every node within the budget, one depth level at a time
    ///
    /// All lookups at depth `d` finish before any at `d + 1` is scheduled, so
    /// a node is claimed at the shallowest depth it can be reached.
    async fn prefetch(
        &self,
        root: &PackageName,
        limit: usize,
        progress: &Progress,
    ) -> (LookupCache, usize) {
        let budget = self.config.budget;
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut cache = LookupCache::new();
        let mut lookups = 0;
        let mut claimed: HashSet<PackageName> = HashSet::new();

        let mut level = Vec::new();
        if budget.allows(0) {
            claimed.insert(root.clone());
            level.push(root.clone());
        }

        let mut depth = 0u32;
        while !level.is_empty() {
            debug!(depth, packages = level.len(), "looking up level");
            let mut tasks: JoinSet<Result<Vec<PackageName>, LookupError>> = JoinSet::new();
            let mut pending: HashMap<task::Id, PackageName> = HashMap::new();
            for name in level {
                let id = self.spawn_lookup(&mut tasks, &semaphore, name.clone());
                pending.insert(id, name);
            }

            let mut next = Vec::new();
            while let Some(joined) = tasks.join_next_with_id().await {
                let (name, result) = match joined {
                    Ok((id, result)) => match pending.remove(&id) {
                        Some(name) => (name, result.map_err(|e| e.to_string())),
                        None => continue,
                    },
                    Err(e) => match pending.remove(&e.id()) {
                        Some(name) => {
                            warn!(package = %name, error = %e, "lookup task did not complete");
                            (name, Err(format!("lookup task did not complete: {}", e)))
                        }
                        None => continue,
                    },
                };

                progress.set_message(&format!("Looked up {}", name));
                progress.inc();
                lookups += 1;

                if let Ok(deps) = &result {
                    if budget.allows(depth + 1) {
                        for dep in deps {
                            if claimed.insert(dep.clone()) {
                                next.push(dep.clone());
                            }
                        }
                    }
                }
                cache.insert(name, result);
            }

            level = next;
            depth += 1;
        }

        (cache, lookups)
    }

    fn spawn_lookup(
        &self,
        tasks: &mut JoinSet<Result<Vec<PackageName>, LookupError>>,
        semaphore: &Arc<Semaphore>,
        name: PackageName,
    ) -> task::Id {
        let lookup = Arc::clone(&self.lookup);
        let semaphore = Arc::clone(semaphore);
        tasks
            .spawn(async move {
                // The semaphore is never closed; a missing permit only lifts the limit.
                let _permit = semaphore.acquire_owned().await.ok();
                lookup.lookup(&name).await
            })
            .id()
    }
}
