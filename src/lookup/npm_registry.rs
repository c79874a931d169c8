//! npm Registry lookup
//!
//! Fetches the package document from the npm registry and reads the
//! dependencies declared by the version tagged `latest`.
//! API endpoint: https://registry.npmjs.org/{package}

use crate::domain::PackageName;
use crate::error::LookupError;
use crate::lookup::{DependencyLookup, HttpClient};
use async_trait::async_trait;
use serde_json::Value;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

const REGISTRY_NAME: &str = "npm registry";

/// Lookup backed by the npm registry HTTP API
pub struct NpmRegistryLookup {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistryLookup {
    /// Create a lookup against the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create a lookup against a custom registry (mirrors, private registries)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package)
    }
}

/// Extract the dependency names of the `latest` version from a package document
///
/// Names keep the order in which the document declares them; version
/// ranges are dropped.
pub fn extract_latest_dependencies(
    package: &str,
    document: &Value,
) -> Result<Vec<PackageName>, LookupError> {
    if !document.is_object() {
        return Err(LookupError::invalid_response(
            package,
            REGISTRY_NAME,
            "expected a JSON object",
        ));
    }

    let latest = document
        .get("dist-tags")
        .and_then(|tags| tags.get("latest"))
        .and_then(Value::as_str)
        .ok_or_else(|| LookupError::no_latest_version(package, REGISTRY_NAME))?;

    let manifest = document
        .get("versions")
        .and_then(|versions| versions.get(latest))
        .ok_or_else(|| LookupError::no_latest_version(package, REGISTRY_NAME))?;

    match manifest.get("dependencies") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(deps)) => Ok(deps.keys().map(|name| PackageName::from(name.as_str())).collect()),
        Some(_) => Err(LookupError::invalid_response(
            package,
            REGISTRY_NAME,
            format!("dependencies of {}@{} is not an object", package, latest),
        )),
    }
}

#[async_trait]
impl DependencyLookup for NpmRegistryLookup {
    fn source_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn lookup(&self, package: &PackageName) -> Result<Vec<PackageName>, LookupError> {
        let url = self.build_url(package.as_str());
        let document: Value = self
            .client
            .get_json(&url, package.as_str(), REGISTRY_NAME)
            .await?;

        extract_latest_dependencies(package.as_str(), &document)
    }
}
