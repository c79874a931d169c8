//! Run orchestrator for coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: discover → check → serialize → write → render
//! - Graph file input as an alternative to live lookups
//! - Progress display while discovering
//! - Collection of the run report for output

use crate::cli::CliArgs;
use crate::diagram;
use crate::discover::{Discoverer, Discovery, DiscoveryConfig};
use crate::domain::{DependencyGraph, LookupFailure, PackageName};
use crate::error::{AppError, ConfigError, DiscoveryError};
use crate::lookup::{create_lookup, DependencyLookup, MemoryLookup};
use crate::progress::Progress;
use crate::render::{diagram_path_for, write_diagram, DiagramRenderer, MermaidCli};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Root package, absent when a graph file was rendered as-is
    pub root: Option<PackageName>,
    /// Depth budget used for discovery
    pub max_depth: u32,
    /// Lookup backend that produced the graph
    pub source: String,
    /// Discovered graph
    pub graph: DependencyGraph,
    /// Packages whose lookup failed
    pub failures: Vec<LookupFailure>,
    /// Number of lookups performed
    pub lookups: usize,
    /// Written diagram description
    pub diagram_path: PathBuf,
    /// Rendered image, absent with `--no-render`
    pub image_path: Option<PathBuf>,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

/// Orchestrator for coordinating the workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Backend for live lookups
    lookup: Arc<dyn DependencyLookup>,
    /// Diagram renderer
    renderer: Box<dyn DiagramRenderer>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given CLI arguments
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let lookup = create_lookup(args.source, &args.lookup_options())?;
        let renderer = Box::new(MermaidCli::new(&args.renderer));
        Ok(Self {
            args,
            lookup,
            renderer,
        })
    }

    /// Create an orchestrator with custom collaborators (for testing)
    pub fn with_collaborators(
        args: CliArgs,
        lookup: Arc<dyn DependencyLookup>,
        renderer: Box<dyn DiagramRenderer>,
    ) -> Self {
        Self {
            args,
            lookup,
            renderer,
        }
    }

    /// Run the workflow
    pub async fn run(&self) -> Result<RunReport, AppError> {
        self.run_with_progress(self.args.show_progress()).await
    }

    /// Run the workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> Result<RunReport, AppError> {
        let root = self.root()?;
        let diagram_path = self.diagram_path()?;

        // Step 1: obtain the graph, either from a file or by discovery
        let lookup: Arc<dyn DependencyLookup> = match &self.args.from_graph {
            Some(path) => {
                let graph = load_graph_file(path)?;
                if root.is_none() {
                    info!(path = %path.display(), packages = graph.len(), "using graph file as-is");
                    let source = "graph file".to_string();
                    return self
                        .finish(None, graph, Vec::new(), 0, source, diagram_path)
                        .await;
                }
                Arc::new(MemoryLookup::new(graph))
            }
            None => Arc::clone(&self.lookup),
        };

        let root = root.ok_or(ConfigError::EmptyPackageName)?;
        let source = lookup.source_name().to_string();
        let discovery = self.discover(lookup, &root, show_progress).await?;

        self.finish(
            Some(discovery.root),
            discovery.graph,
            discovery.failures,
            discovery.lookups,
            source,
            diagram_path,
        )
        .await
    }

    /// Parse the root package argument, if any
    fn root(&self) -> Result<Option<PackageName>, ConfigError> {
        self.args
            .package_name
            .as_deref()
            .map(PackageName::parse)
            .transpose()
    }

    /// Description path next to the image, which must not be the image itself
    fn diagram_path(&self) -> Result<PathBuf, ConfigError> {
        let diagram_path = diagram_path_for(&self.args.output_file);
        if diagram_path == self.args.output_file {
            return Err(ConfigError::OutputIsDiagram { path: diagram_path });
        }
        Ok(diagram_path)
    }

    async fn discover(
        &self,
        lookup: Arc<dyn DependencyLookup>,
        root: &PackageName,
        show_progress: bool,
    ) -> Result<Discovery, AppError> {
        let mut config = DiscoveryConfig::new(self.args.max_depth);
        if let Some(limit) = self.args.concurrency {
            config = config.with_concurrency(limit);
        }
        let discoverer = Discoverer::new(lookup, config)?;

        let mut progress = Progress::new(show_progress);
        progress.spinner(&format!("Resolving dependencies of {}", root));
        let discovery = discoverer.discover_with_progress(root, &progress).await;
        progress.finish_and_clear();

        Ok(discovery)
    }

    /// Steps 2-5: reject empty graphs, then serialize, write and render
    async fn finish(
        &self,
        root: Option<PackageName>,
        graph: DependencyGraph,
        failures: Vec<LookupFailure>,
        lookups: usize,
        source: String,
        diagram_path: PathBuf,
    ) -> Result<RunReport, AppError> {
        if graph.is_empty() {
            let package = match &root {
                Some(root) => root.to_string(),
                None => self
                    .args
                    .from_graph
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            };
            return Err(DiscoveryError::EmptyGraph { package }.into());
        }

        info!(packages = graph.len(), edges = graph.edge_count(), "generating Mermaid diagram");
        let text = diagram::serialize(&graph);

        write_diagram(&diagram_path, &text)?;
        info!(path = %diagram_path.display(), "diagram description written");

        let image_path = if self.args.no_render {
            None
        } else {
            self.renderer
                .render(&diagram_path, &self.args.output_file)
                .await?;
            info!(path = %self.args.output_file.display(), "image rendered");
            Some(self.args.output_file.clone())
        };

        Ok(RunReport {
            root,
            max_depth: self.args.max_depth,
            source,
            graph,
            failures,
            lookups,
            diagram_path,
            image_path,
            generated_at: Utc::now(),
        })
    }
}

/// Load a `name -> [dependencies]` JSON graph file
pub fn load_graph_file(path: &Path) -> Result<DependencyGraph, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadGraphFile {
        path: path.to_path_buf(),
        source,
    })?;
    DependencyGraph::from_json_str(&content)
        .map_err(|e| ConfigError::invalid_graph_file(path, e.to_string()))
}
