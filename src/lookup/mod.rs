//! Dependency lookup backends
//!
//! This module provides:
//! - The `DependencyLookup` contract used by discovery
//! - A local package manager backend (`npm view`)
//! - An npm registry HTTP backend
//! - An in-memory backend over a precomputed graph
//! - HTTP client shared foundation

mod client;
mod memory;
mod npm_cli;
mod npm_registry;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use memory::MemoryLookup;
pub use npm_cli::{parse_view_output, NpmCliLookup};
pub use npm_registry::{extract_latest_dependencies, NpmRegistryLookup, NPM_REGISTRY_URL};

use crate::domain::PackageName;
use crate::error::LookupError;
use async_trait::async_trait;
use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Resolves a package to the ordered names of its direct dependencies
#[async_trait]
pub trait DependencyLookup: Send + Sync {
    /// Name of the backend, used in logs and error messages
    fn source_name(&self) -> &'static str;

    /// Fetch the direct dependency names of one package
    async fn lookup(&self, package: &PackageName) -> Result<Vec<PackageName>, LookupError>;
}

/// Available lookup backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LookupSource {
    /// Local `npm view` command
    #[default]
    Npm,
    /// npm registry HTTP API
    Registry,
}

/// Settings shared by the lookup backends
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// npm executable for the `npm` source
    pub npm_path: PathBuf,
    /// Registry base URL for the `registry` source
    pub registry_url: String,
    /// Per-lookup timeout
    pub timeout: Duration,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            npm_path: PathBuf::from("npm"),
            registry_url: NPM_REGISTRY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Create the lookup backend for the given source
pub fn create_lookup(
    source: LookupSource,
    options: &LookupOptions,
) -> Result<Arc<dyn DependencyLookup>, LookupError> {
    Ok(match source {
        LookupSource::Npm => Arc::new(NpmCliLookup::new(&options.npm_path, options.timeout)),
        LookupSource::Registry => {
            let client = HttpClient::with_timeout(options.timeout)?;
            Arc::new(NpmRegistryLookup::with_base_url(
                client,
                options.registry_url.clone(),
            ))
        }
    })
}
