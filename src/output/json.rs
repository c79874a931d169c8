//! JSON output formatter for machine processing

use crate::domain::{DependencyGraph, LookupFailure, PackageName};
use crate::orchestrator::RunReport;
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of a run
#[derive(Serialize)]
struct JsonOutput<'a> {
    root: Option<&'a PackageName>,
    max_depth: u32,
    source: &'a str,
    summary: JsonSummary,
    /// Expanded packages in discovery order
    graph: &'a DependencyGraph,
    /// Dependency names that are not graph keys
    unexpanded: Vec<&'a PackageName>,
    #[serde(skip_serializing_if = "no_failures")]
    failures: &'a [LookupFailure],
    diagram_path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_path: Option<&'a Path>,
    generated_at: DateTime<Utc>,
}

fn no_failures(failures: &&[LookupFailure]) -> bool {
    failures.is_empty()
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    packages: usize,
    edges: usize,
    lookups: usize,
    failures: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            root: report.root.as_ref(),
            max_depth: report.max_depth,
            source: &report.source,
            summary: JsonSummary {
                packages: report.graph.len(),
                edges: report.graph.edge_count(),
                lookups: report.lookups,
                failures: report.failures.len(),
            },
            graph: &report.graph,
            unexpanded: report.graph.unexpanded(),
            failures: &report.failures,
            diagram_path: &report.diagram_path,
            image_path: report.image_path.as_deref(),
            generated_at: report.generated_at,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
