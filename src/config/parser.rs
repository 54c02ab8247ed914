//! Stack file loading.
//!
//! Handles locating and parsing `stackform.deploy.yaml`, with environment
//! variable overrides applied on top of the file contents.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result, StackformError};

use super::spec::StackConfig;

/// Default stack file name.
pub const DEFAULT_CONFIG_FILE: &str = "stackform.deploy.yaml";

/// Parser for stack files.
#[derive(Debug, Default)]
pub struct ConfigParser;

impl ConfigParser {
    /// Creates a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a stack file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<StackConfig> {
        let path = path.as_ref();
        info!("Loading stack file: {}", path.display());

        if !path.exists() {
            return Err(StackformError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StackformError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses a stack file from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<StackConfig> {
        debug!("Parsing YAML stack file");

        let config: StackConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            StackformError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Parsed stack '{}'", config.stack.name);
        Ok(config)
    }

    /// Loads a stack file with environment variable overrides.
    ///
    /// Overrides use the format `STACKFORM_<SECTION>_<KEY>`, e.g.
    /// `STACKFORM_STACK_NETWORK_LOOKUP`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<StackConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(config: &mut StackConfig) {
        if let Ok(name) = std::env::var("STACKFORM_STACK_NAME") {
            debug!("Overriding stack.name from environment");
            config.stack.name = name;
        }

        if let Ok(lookup) = std::env::var("STACKFORM_STACK_NETWORK_LOOKUP") {
            debug!("Overriding stack.network_lookup from environment");
            config.stack.network_lookup = lookup;
        }

        if let Ok(principal) = std::env::var("STACKFORM_IDENTITY_PRINCIPAL") {
            debug!("Overriding identity.principal from environment");
            config.identity.principal = principal;
        }

        if let Ok(name) = std::env::var("STACKFORM_CLUSTER_NAME") {
            debug!("Overriding cluster.name from environment");
            config.cluster.name = name;
        }
    }
}

/// Searches for a stack file starting at the given directory and walking up
/// towards the filesystem root.
#[must_use]
pub fn find_config_file(start: impl AsRef<Path>) -> Option<PathBuf> {
    let mut dir = start.as_ref().to_path_buf();
    loop {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
stack:
  name: ecs-job
  network_lookup: vpc-123

task:
  cpu_units: 2048
  memory_mib: 4096
  platform:
    architecture: x86_64
    os: linux

container:
  repository: ecs-job
  log_stream_prefix: ecs-job
  env:
    - name: SERVICE_ID
      lookup: PD_SERVICE_ID
    - name: SCENARIO_NAME
      value: chaos-drill
  secrets:
    - name: PAGERDUTY_API_KEY
      entry: PAGERDUTY_API_KEY
      version: 1

cluster:
  name: ecs-jobcluster
  elastic_capacity: true

security:
  name: ecs-job-sg
  outbound: allow_all
";

    #[test]
    fn test_parse_sample() {
        let parser = ConfigParser::new();
        let config = parser.parse_yaml(SAMPLE, None).unwrap();

        assert_eq!(config.stack.name, "ecs-job");
        assert_eq!(config.stack.network_lookup, "vpc-123");
        assert_eq!(config.task.cpu_units, 2048);
        assert_eq!(config.container.env.len(), 2);
        assert_eq!(config.container.secrets.len(), 1);
        assert_eq!(config.container.secrets[0].version, Some(1));
        assert!(config.cluster.elastic_capacity);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let parser = ConfigParser::new();
        let result = parser.parse_yaml("stack: [not a mapping", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let parser = ConfigParser::new();
        let err = parser.load_file("/nonexistent/stackform.deploy.yaml");
        assert!(matches!(
            err,
            Err(StackformError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let parser = ConfigParser::new();
        let config = parser.load_file(&path).unwrap();
        assert_eq!(config.cluster.name, "ecs-jobcluster");
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), SAMPLE).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(DEFAULT_CONFIG_FILE));
    }
}
