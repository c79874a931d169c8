//! Application error types using thiserror
//!
//! Error hierarchy:
//! - LookupError: a single package's dependency lookup failed
//! - DiscoveryError: discovery produced nothing usable
//! - RenderError: writing or rendering the diagram failed
//! - ConfigError: invalid CLI configuration or graph input file

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Dependency lookup errors
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Discovery errors
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Diagram rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from a single package's dependency lookup
#[derive(Error, Debug)]
pub enum LookupError {
    /// The package manager command could not be started
    #[error("failed to run '{command}' for '{package}': {error}")]
    Spawn {
        package: String,
        command: String,
        #[source]
        error: std::io::Error,
    },

    /// The package manager command exited unsuccessfully
    #[error("'{command}' failed for '{package}' ({status}): {stderr}")]
    CommandFailed {
        package: String,
        command: String,
        status: String,
        stderr: String,
    },

    /// Package not found in registry
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    Network {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Invalid or absent JSON in the response
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// No "latest" dist-tag to read dependencies from
    #[error("package '{package}' has no latest version in {registry}")]
    NoLatestVersion { package: String, registry: String },
}

/// Errors that end a run after discovery
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Nothing was discovered for the root package
    #[error("no dependencies found for '{package}' or its lookup failed")]
    EmptyGraph { package: String },
}

/// Errors related to writing and rendering the diagram
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to write the diagram description file
    #[error("failed to write diagram file {path}: {source}")]
    WriteDiagram {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renderer could not be started
    #[error("failed to run renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Renderer exited unsuccessfully
    #[error("renderer '{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Blank root package name
    #[error("package name must not be empty")]
    EmptyPackageName,

    /// Concurrency of zero
    #[error("invalid concurrency {value}: expected at least 1")]
    InvalidConcurrency { value: usize },

    /// Graph file could not be read
    #[error("failed to read graph file {path}: {source}")]
    ReadGraphFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file would be overwritten by the diagram description
    #[error("output file {path} is the diagram description path; choose an image extension such as .png or .svg")]
    OutputIsDiagram { path: PathBuf },

    /// Graph file is not a valid `name -> [deps]` object
    #[error("invalid graph file {path}: {message}")]
    InvalidGraphFile { path: PathBuf, message: String },
}

impl LookupError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        LookupError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new Network error
    pub fn network(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LookupError::Network {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        LookupError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LookupError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoLatestVersion error
    pub fn no_latest_version(package: impl Into<String>, registry: impl Into<String>) -> Self {
        LookupError::NoLatestVersion {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl RenderError {
    /// Creates a new WriteDiagram error
    pub fn write_diagram(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::WriteDiagram {
            path: path.into(),
            source,
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidGraphFile error
    pub fn invalid_graph_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidGraphFile {
            path: path.into(),
            message: message.into(),
        }
    }
}
