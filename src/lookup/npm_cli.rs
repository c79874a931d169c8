//! Local package manager lookup
//!
//! Runs `npm view <package> dependencies --json` and reads the keys of the
//! returned object as the package's direct dependencies.

use crate::domain::PackageName;
use crate::error::LookupError;
use crate::lookup::DependencyLookup;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

const SOURCE_NAME: &str = "npm";

/// Lookup that shells out to the npm CLI
#[derive(Debug, Clone)]
pub struct NpmCliLookup {
    program: PathBuf,
    timeout: Duration,
}

impl NpmCliLookup {
    /// Create a lookup running the given npm executable
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Arguments passed to npm for a package
    fn view_args(package: &str) -> [&str; 4] {
        ["view", package, "dependencies", "--json"]
    }

    /// Human-readable command line, used in error messages
    fn command_line(&self, package: &str) -> String {
        format!(
            "{} {}",
            self.program.display(),
            Self::view_args(package).join(" ")
        )
    }
}

/// Parse `npm view ... dependencies --json` output into dependency names
///
/// Empty output means the package declares no dependencies.
pub fn parse_view_output(package: &str, stdout: &str) -> Result<Vec<PackageName>, LookupError> {
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(stdout).map_err(|e| {
        LookupError::invalid_response(package, SOURCE_NAME, format!("failed to parse JSON: {}", e))
    })?;

    match value {
        Value::Object(deps) => Ok(deps.keys().map(|name| PackageName::from(name.as_str())).collect()),
        other => Err(LookupError::invalid_response(
            package,
            SOURCE_NAME,
            format!("expected a JSON object, found {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl DependencyLookup for NpmCliLookup {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn lookup(&self, package: &PackageName) -> Result<Vec<PackageName>, LookupError> {
        let name = package.as_str();
        let command = self.command_line(name);

        let mut cmd = Command::new(&self.program);
        cmd.args(Self::view_args(name)).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|error| LookupError::Spawn {
                package: name.to_string(),
                command: command.clone(),
                error,
            })?,
            Err(_) => return Err(LookupError::timeout(name, SOURCE_NAME)),
        };

        if !output.status.success() {
            return Err(LookupError::CommandFailed {
                package: name.to_string(),
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_view_output(name, &String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_output_keeps_order() {
        let deps = parse_view_output("test_package", r#"{"dep2": "2.0.0", "dep1": "1.0.0"}"#)
            .unwrap();
        let names: Vec<_> = deps.iter().map(PackageName::as_str).collect();
        assert_eq!(names, vec!["dep2", "dep1"]);
    }

    #[test]
    fn test_parse_view_output_empty() {
        assert!(parse_view_output("test_package", "").unwrap().is_empty());
        assert!(parse_view_output("test_package", "  \n").unwrap().is_empty());
        assert!(parse_view_output("test_package", "{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_view_output_malformed() {
        let err = parse_view_output("test_package", "{not json").unwrap_err();
        assert!(matches!(err, LookupError::InvalidResponse { .. }));
    }

    #[test]
    fn test_parse_view_output_wrong_shape() {
        let err = parse_view_output("test_package", r#"["a"]"#).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_command_line() {
        let lookup = NpmCliLookup::new("npm", Duration::from_secs(5));
        assert_eq!(
            lookup.command_line("react"),
            "npm view react dependencies --json"
        );
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_error() {
        let lookup = NpmCliLookup::new("/nonexistent/npm-binary", Duration::from_secs(5));
        let err = lookup.lookup(&PackageName::from("react")).await.unwrap_err();
        assert!(matches!(err, LookupError::Spawn { .. }));
    }
}
