//! Text output formatter for human-readable display
//!
//! This module provides:
//! - A one-line summary of the discovered graph
//! - Paths of the written diagram and image
//! - Unexpanded packages and failed lookups (verbose)

use crate::orchestrator::RunReport;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint_label(&self, label: &str) -> String {
        if self.color {
            label.dimmed().to_string()
        } else {
            label.to_string()
        }
    }

    /// Write the headline: root, package and edge counts
    fn format_headline(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let root = report
            .root
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "graph file".to_string());
        let counts = format!(
            "{} packages, {} edges",
            report.graph.len(),
            report.graph.edge_count()
        );
        let detail = format!("(depth {}, via {})", report.max_depth, report.source);

        if self.color {
            writeln!(
                writer,
                "{} {}: {} {}",
                "✓".green(),
                root.bold(),
                counts,
                detail.dimmed()
            )
        } else {
            writeln!(writer, "✓ {}: {} {}", root, counts, detail)
        }
    }

    fn format_paths(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            writer,
            "  {} {}",
            self.paint_label("Diagram:"),
            report.diagram_path.display()
        )?;
        if let Some(image) = &report.image_path {
            writeln!(writer, "  {}   {}", self.paint_label("Image:"), image.display())?;
        }
        Ok(())
    }

    fn format_unexpanded(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let unexpanded = report.graph.unexpanded();
        if unexpanded.is_empty() {
            return Ok(());
        }

        writeln!(
            writer,
            "  {} {}",
            self.paint_label("Not expanded:"),
            unexpanded.len()
        )?;
        if self.verbosity == Verbosity::Verbose {
            for name in unexpanded {
                writeln!(writer, "    - {}", name)?;
            }
        }
        Ok(())
    }

    fn format_failures(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if report.failures.is_empty() {
            return Ok(());
        }

        let label = format!("Failed lookups: {}", report.failures.len());
        if self.color {
            writeln!(writer, "  {}", label.yellow())?;
        } else {
            writeln!(writer, "  {}", label)?;
        }
        if self.verbosity == Verbosity::Verbose {
            for failure in &report.failures {
                writeln!(writer, "    - {}", failure)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            let path = report.image_path.as_ref().unwrap_or(&report.diagram_path);
            return writeln!(writer, "{}", path.display());
        }

        self.format_headline(report, writer)?;
        self.format_paths(report, writer)?;
        self.format_unexpanded(report, writer)?;
        self.format_failures(report, writer)?;
        Ok(())
    }
}
