//! CLI argument parsing module for depgraph

use crate::domain::DEFAULT_MAX_DEPTH;
use crate::lookup::{LookupOptions, LookupSource, NPM_REGISTRY_URL};
use crate::render::DEFAULT_RENDERER;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a concurrency limit, rejecting zero
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(value)
}

/// Package dependency graph generator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depgraph",
    version,
    about = "Render a package's transitive dependencies as a Mermaid diagram"
)]
pub struct CliArgs {
    /// Package whose dependencies are analyzed
    #[arg(short = 'p', long, required_unless_present = "from_graph")]
    pub package_name: Option<String>,

    /// Image file to produce (the .mmd description is written next to it)
    #[arg(short = 'o', long)]
    pub output_file: PathBuf,

    /// Renderer executable (Mermaid CLI)
    #[arg(
        long = "graphviz-path",
        visible_alias = "renderer",
        env = "DEPGRAPH_RENDERER",
        default_value = DEFAULT_RENDERER
    )]
    pub renderer: PathBuf,

    /// Maximum dependency depth to analyze
    #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: u32,

    // Lookup options
    /// Where dependency information comes from
    #[arg(long, value_enum, default_value_t = LookupSource::Npm)]
    pub source: LookupSource,

    /// npm executable used by the npm source
    #[arg(long, env = "DEPGRAPH_NPM", default_value = "npm")]
    pub npm_path: PathBuf,

    /// Registry base URL used by the registry source
    #[arg(long, env = "DEPGRAPH_REGISTRY", default_value = NPM_REGISTRY_URL)]
    pub registry_url: String,

    /// Timeout for a single lookup, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Look up up to N packages at once (default: one at a time)
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Read the dependency graph from a JSON file instead of looking it up
    #[arg(long)]
    pub from_graph: Option<PathBuf>,

    // Output options
    /// Only write the .mmd description, do not run the renderer
    #[arg(long)]
    pub no_render: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Lookup backend settings
    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            npm_path: self.npm_path.clone(),
            registry_url: self.registry_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Whether the spinner should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Default log filter for the chosen verbosity
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "depgraph=debug"
        } else if self.quiet {
            "error"
        } else {
            "depgraph=warn"
        }
    }
}
