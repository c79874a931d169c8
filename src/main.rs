//! depgraph - Package dependency graph CLI tool
//!
//! Discovers a package's dependencies up to a maximum depth, writes a
//! Mermaid description next to the requested image and renders it.

use clap::Parser;
use depgraph::cli::CliArgs;
use depgraph::error::AppError;
use depgraph::orchestrator::Orchestrator;
use depgraph::output::{create_formatter, OutputConfig};
use depgraph::render::diagram_path_for;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    match run(args.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(AppError::Render(_)) = e.downcast_ref::<AppError>() {
                eprintln!(
                    "Diagram description kept at {}",
                    diagram_path_for(&args.output_file).display()
                );
            }
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber, honoring `DEPGRAPH_LOG`
fn init_tracing(args: &CliArgs) {
    let filter = EnvFilter::try_from_env("DEPGRAPH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.verbose {
        eprintln!("depgraph v{}", env!("CARGO_PKG_VERSION"));
        match (&args.package_name, &args.from_graph) {
            (Some(package), _) => eprintln!("Package: {} (max depth {})", package, args.max_depth),
            (None, Some(path)) => eprintln!("Graph file: {}", path.display()),
            (None, None) => {}
        }
    }

    let orchestrator = Orchestrator::new(args.clone())?;
    let report = orchestrator.run().await?;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
