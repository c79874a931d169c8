//! Package identifiers

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque, case-sensitive package identifier
///
/// Used both as a graph node identity and as the key handed to a
/// dependency lookup backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Creates a package name without validation
    ///
    /// Names reported by a lookup backend are taken verbatim.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses a user-supplied root name, rejecting blank input
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyPackageName);
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PackageName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
