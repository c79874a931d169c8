//! Core domain models for depgraph
//!
//! This module contains the fundamental types used throughout the application:
//! - Package identifiers
//! - The insertion-ordered dependency graph and its edges
//! - Traversal budget and per-node lookup failures

mod graph;
mod package;
mod traversal;

pub use graph::{DependencyEdge, DependencyGraph};
pub use package::PackageName;
pub use traversal::{LookupFailure, TraversalBudget, DEFAULT_MAX_DEPTH};
