//! Mermaid diagram serialization
//!
//! Turns a dependency graph into a `graph TD` flowchart description:
//!
//! ```text
//! graph TD
//!     pkg --> dep1
//!     pkg --> dep2
//! ```
//!
//! Only edges are emitted. A package with no dependencies that nobody
//! depends on does not appear in the output.

use crate::domain::DependencyGraph;

/// First line of every diagram
pub const HEADER: &str = "graph TD";

/// Indentation of edge lines
const INDENT: &str = "    ";

/// Edge arrow
const ARROW: &str = "-->";

/// Serialize a graph into Mermaid text
///
/// Edges follow key insertion order, then each dependency list in order.
/// Lines are joined with `\n` and there is no trailing newline.
pub fn serialize(graph: &DependencyGraph) -> String {
    let mut lines = Vec::with_capacity(graph.edge_count() + 1);
    lines.push(HEADER.to_string());
    lines.extend(
        graph
            .edges()
            .map(|edge| format!("{}{} {} {}", INDENT, edge.from, ARROW, edge.to)),
    );
    lines.join("\n")
}
