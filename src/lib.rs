//! depgraph - Package dependency graph library
//!
//! This library discovers the transitive dependencies of a package and
//! renders them as a Mermaid diagram:
//! - Depth-limited, cycle-safe discovery tolerant of failed lookups
//! - Lookups through the local npm CLI or the npm registry
//! - Deterministic `graph TD` serialization
//! - Image rendering through the Mermaid CLI

pub mod cli;
pub mod diagram;
pub mod discover;
pub mod domain;
pub mod error;
pub mod lookup;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod render;
