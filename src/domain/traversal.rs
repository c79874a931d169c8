//! Traversal budget and per-node failure records

use super::PackageName;
use serde::Serialize;
use std::fmt;

/// Default maximum traversal depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Depth limit for one discovery run
///
/// A node reached at `depth` is expanded only while `depth < max_depth`.
/// A budget of zero therefore expands nothing, and a budget of one expands
/// only the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraversalBudget {
    max_depth: u32,
}

impl TraversalBudget {
    /// Creates a budget with the given maximum depth
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Returns the maximum depth
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns true if a node at `depth` may be expanded
    pub fn allows(&self, depth: u32) -> bool {
        depth < self.max_depth
    }
}

impl Default for TraversalBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// A node whose lookup failed during discovery
///
/// Such a node never becomes a graph key and nothing below it is explored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFailure {
    /// Package that could not be looked up
    pub package: PackageName,
    /// Depth at which the package was reached
    pub depth: u32,
    /// Rendered lookup error
    pub message: String,
}

impl LookupFailure {
    /// Creates a new failure record
    pub fn new(package: PackageName, depth: u32, message: impl Into<String>) -> Self {
        Self {
            package,
            depth,
            message: message.into(),
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {}): {}", self.package, self.depth, self.message)
    }
}
