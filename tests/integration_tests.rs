//! Integration tests for depgraph
//!
//! These tests verify:
//! - Discovery over in-memory lookups
//! - Diagram serialization of discovered graphs
//! - Graph file loading and the full library workflow

use depgraph::diagram;
use depgraph::discover::{Discoverer, DiscoveryConfig};
use depgraph::domain::{DependencyGraph, PackageName};
use depgraph::lookup::{DependencyLookup, MemoryLookup};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Lookup backed by a fixed package table
fn lookup(pairs: &[(&str, &[&str])]) -> Arc<dyn DependencyLookup> {
    Arc::new(MemoryLookup::from_pairs(pairs.iter().copied()))
}

fn keys(graph: &DependencyGraph) -> Vec<&str> {
    graph.iter().map(|(name, _)| name.as_str()).collect()
}

mod discovery_to_diagram {
    use super::*;

    #[tokio::test]
    async fn test_two_leaf_dependencies() {
        let lookup = lookup(&[("pkg", &["dep1", "dep2"]), ("dep1", &[]), ("dep2", &[])]);
        let discovery = Discoverer::sequential(lookup, 2)
            .discover(&PackageName::from("pkg"))
            .await;

        assert_eq!(keys(&discovery.graph), vec!["pkg", "dep1", "dep2"]);
        assert!(discovery.failures.is_empty());
        assert_eq!(
            diagram::serialize(&discovery.graph),
            "graph TD\n    pkg --> dep1\n    pkg --> dep2"
        );
    }

    #[tokio::test]
    async fn test_root_lookup_failure_gives_empty_graph() {
        let lookup = lookup(&[("other", &[])]);
        let discovery = Discoverer::sequential(lookup, 3)
            .discover(&PackageName::from("pkg"))
            .await;

        assert!(discovery.is_empty());
        assert!(discovery.root_failed());
        assert_eq!(discovery.failures.len(), 1);
        assert_eq!(diagram::serialize(&discovery.graph), "graph TD");
    }

    #[tokio::test]
    async fn test_depth_one_stops_before_children() {
        let lookup = lookup(&[("pkg", &["dep1"]), ("dep1", &["deeper"]), ("deeper", &[])]);
        let discovery = Discoverer::sequential(lookup, 1)
            .discover(&PackageName::from("pkg"))
            .await;

        assert_eq!(keys(&discovery.graph), vec!["pkg"]);
        assert!(!discovery.graph.contains("dep1"));
        assert_eq!(discovery.lookups, 1);
        assert_eq!(diagram::serialize(&discovery.graph), "graph TD\n    pkg --> dep1");
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let lookup = lookup(&[("a", &["b"]), ("b", &["a"])]);
        let discovery = Discoverer::sequential(lookup, 10)
            .discover(&PackageName::from("a"))
            .await;

        assert_eq!(keys(&discovery.graph), vec!["a", "b"]);
        assert_eq!(
            diagram::serialize(&discovery.graph),
            "graph TD\n    a --> b\n    b --> a"
        );
    }

    #[tokio::test]
    async fn test_failed_child_keeps_edge_but_no_key() {
        let lookup = lookup(&[("app", &["gone", "lib"]), ("lib", &[])]);
        let discovery = Discoverer::sequential(lookup, 3)
            .discover(&PackageName::from("app"))
            .await;

        assert!(!discovery.graph.contains("gone"));
        assert_eq!(discovery.graph.get("lib").map(|deps| deps.len()), Some(0));
        assert_eq!(discovery.failures[0].package.as_str(), "gone");
        assert_eq!(discovery.failures[0].depth, 1);
        assert!(diagram::serialize(&discovery.graph).contains("    app --> gone"));
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential_on_tree() {
        let table: &[(&str, &[&str])] = &[
            ("root", &["a", "b", "c"]),
            ("a", &["a1", "a2"]),
            ("b", &["b1"]),
            ("c", &[]),
            ("a1", &[]),
            ("a2", &[]),
            ("b1", &[]),
        ];
        let root = PackageName::from("root");

        let sequential = Discoverer::sequential(lookup(table), 3).discover(&root).await;
        let concurrent = Discoverer::new(lookup(table), DiscoveryConfig::new(3).with_concurrency(4))
            .unwrap()
            .discover(&root)
            .await;

        assert_eq!(keys(&sequential.graph), keys(&concurrent.graph));
        assert_eq!(
            diagram::serialize(&sequential.graph),
            diagram::serialize(&concurrent.graph)
        );
    }
}

mod graph_files {
    use super::*;
    use depgraph::error::ConfigError;
    use depgraph::orchestrator::load_graph_file;

    #[test]
    fn test_load_preserves_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deps.json");
        fs::write(&path, r#"{"zeta": ["alpha"], "alpha": [], "mid": ["zeta"]}"#).unwrap();

        let graph = load_graph_file(&path).unwrap();
        assert_eq!(keys(&graph), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            diagram::serialize(&graph),
            "graph TD\n    zeta --> alpha\n    mid --> zeta"
        );
    }

    #[test]
    fn test_load_rejects_duplicate_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dup.json");
        fs::write(&path, r#"{"a": [], "a": ["b"]}"#).unwrap();

        let err = load_graph_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGraphFile { .. }));
    }

    #[tokio::test]
    async fn test_loaded_graph_drives_discovery() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deps.json");
        fs::write(
            &path,
            r#"{"packageA": ["packageB", "packageC"], "packageB": ["packageD"], "packageC": [], "packageD": []}"#,
        )
        .unwrap();

        let graph = load_graph_file(&path).unwrap();
        let lookup: Arc<dyn DependencyLookup> = Arc::new(MemoryLookup::new(graph));
        let discovery = Discoverer::sequential(lookup, 3)
            .discover(&PackageName::from("packageA"))
            .await;

        assert_eq!(
            keys(&discovery.graph),
            vec!["packageA", "packageB", "packageD", "packageC"]
        );
    }
}

mod workflow {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use depgraph::cli::CliArgs;
    use depgraph::error::{AppError, RenderError};
    use depgraph::orchestrator::Orchestrator;
    use depgraph::output::{create_formatter, OutputConfig};
    use depgraph::render::DiagramRenderer;
    use std::path::Path;

    /// Renderer that copies the description to the image path
    struct CopyRenderer;

    #[async_trait]
    impl DiagramRenderer for CopyRenderer {
        async fn render(&self, diagram: &Path, output: &Path) -> Result<(), RenderError> {
            fs::copy(diagram, output)
                .map(|_| ())
                .map_err(|e| RenderError::write_diagram(output, e))
        }
    }

    fn orchestrator(dir: &TempDir, extra: &[&str]) -> Orchestrator {
        let output = dir.path().join("nested").join("deps.svg");
        let mut argv = vec!["depgraph", "-o", output.to_str().unwrap()];
        argv.extend(extra);
        Orchestrator::with_collaborators(
            CliArgs::parse_from(argv),
            lookup(&[("web", &["http", "json"]), ("http", &["json"]), ("json", &[])]),
            Box::new(CopyRenderer),
        )
    }

    #[tokio::test]
    async fn test_full_run_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let report = orchestrator(&dir, &["-p", "web"])
            .run_with_progress(false)
            .await
            .unwrap();

        let expected = "graph TD\n    web --> http\n    web --> json\n    http --> json";
        assert_eq!(report.diagram_path, dir.path().join("nested").join("deps.mmd"));
        assert_eq!(fs::read_to_string(&report.diagram_path).unwrap(), expected);
        assert_eq!(
            fs::read_to_string(dir.path().join("nested").join("deps.svg")).unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn test_report_formats_as_json() {
        let dir = TempDir::new().unwrap();
        let report = orchestrator(&dir, &["-p", "web", "--no-render"])
            .run_with_progress(false)
            .await
            .unwrap();

        let mut out = Vec::new();
        create_formatter(OutputConfig::from_cli(true, false, false))
            .format(&report, &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["root"], "web");
        assert_eq!(value["source"], "graph file");
        assert_eq!(value["summary"]["packages"], 3);
        assert_eq!(value["summary"]["edges"], 3);
        assert!(value.get("image_path").is_none());
    }

    #[tokio::test]
    async fn test_unknown_root_fails_without_files() {
        let dir = TempDir::new().unwrap();
        let err = orchestrator(&dir, &["-p", "nope"])
            .run_with_progress(false)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Discovery(_)));
        assert!(!dir.path().join("nested").exists());
    }
}
