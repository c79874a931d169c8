//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Status and timeout classification into lookup errors
//!
//! Every request is attempted exactly once. A failed lookup only prunes
//! that package's subtree, so there is nothing to retry for.

use crate::error::LookupError;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("depgraph/", env!("CARGO_PKG_VERSION"));

/// Thin reqwest wrapper used by registry lookups
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                LookupError::network("", "HTTP client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Create a client with the given timeout and the default User-Agent
    pub fn with_timeout(timeout: Duration) -> Result<Self, LookupError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Perform a GET request, mapping failures to lookup errors
    pub async fn get_with_context(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, LookupError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::timeout(package, registry)
            } else {
                LookupError::network(package, registry, e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::package_not_found(package, registry));
        }
        if !status.is_success() {
            return Err(LookupError::network(
                package,
                registry,
                format!("HTTP {}", status),
            ));
        }

        Ok(response)
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, LookupError> {
        let response = self.get_with_context(url, package, registry).await?;

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::timeout(package, registry)
            } else {
                LookupError::invalid_response(
                    package,
                    registry,
                    format!("failed to parse JSON: {}", e),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(60), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("depgraph/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = HttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        let err = client
            .get_with_context("http://127.0.0.1:9/left-pad", "left-pad", "npm registry")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::Network { .. } | LookupError::Timeout { .. }
        ));
    }
}
