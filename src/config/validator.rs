//! Stack file validation.
//!
//! Structural validation performed before compilation. Sizing/platform
//! support is deliberately not checked here: the full matrix of supported
//! combinations belongs to the provisioning backend and an unsupported
//! pair fails at apply time.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ConfigError, Result, StackformError};

use super::spec::{ContainerConfig, StackConfig};

/// Validator for stack files.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Common CPU unit steps; anything else is flagged as a warning only.
const COMMON_CPU_UNITS: &[u32] = &[256, 512, 1024, 2048, 4096, 8192, 16384];

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a stack file.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the first validation failure.
    pub fn validate(&self, config: &StackConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_stack(config, &mut result);
        Self::validate_task(config, &mut result);
        Self::validate_container(&config.container, &mut result);
        Self::validate_names(config, &mut result);

        if result.errors.is_empty() {
            debug!("Stack validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(StackformError::Config(ConfigError::ValidationError {
                message: first_error.message.clone(),
                field: Some(first_error.field.clone()),
            }))
        }
    }

    /// Validates stack-level settings.
    fn validate_stack(config: &StackConfig, result: &mut ValidationResult) {
        if config.stack.name.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("stack.name"),
                message: String::from("Stack name cannot be empty"),
            });
        } else if !is_valid_name(&config.stack.name) {
            result.errors.push(ValidationError {
                field: String::from("stack.name"),
                message: format!(
                    "Stack name '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    config.stack.name
                ),
            });
        }

        if config.stack.network_lookup.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("stack.network_lookup"),
                message: String::from("Network lookup key cannot be empty"),
            });
        }

        if config.identity.principal.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("identity.principal"),
                message: String::from("Trusted principal cannot be empty"),
            });
        }
    }

    /// Validates task sizing.
    fn validate_task(config: &StackConfig, result: &mut ValidationResult) {
        if config.task.cpu_units == 0 {
            result.errors.push(ValidationError {
                field: String::from("task.cpu_units"),
                message: String::from("CPU units must be at least 1"),
            });
        } else if !COMMON_CPU_UNITS.contains(&config.task.cpu_units) {
            result.warnings.push(format!(
                "task.cpu_units: {} is not a common sizing step; the provisioning backend may reject it",
                config.task.cpu_units
            ));
        }

        if config.task.memory_mib == 0 {
            result.errors.push(ValidationError {
                field: String::from("task.memory_mib"),
                message: String::from("Memory must be at least 1 MiB"),
            });
        }
    }

    /// Validates container settings.
    fn validate_container(container: &ContainerConfig, result: &mut ValidationResult) {
        if container.repository.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("container.repository"),
                message: String::from("Image repository name cannot be empty"),
            });
        } else if !is_valid_name(&container.repository) {
            result.errors.push(ValidationError {
                field: String::from("container.repository"),
                message: format!(
                    "Repository name '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    container.repository
                ),
            });
        }

        if let Some(prefix) = &container.log_stream_prefix
            && prefix.is_empty()
        {
            result.errors.push(ValidationError {
                field: String::from("container.log_stream_prefix"),
                message: String::from("Log stream prefix cannot be empty when set"),
            });
        }

        let mut seen_names = HashSet::new();

        for (i, env) in container.env.iter().enumerate() {
            let prefix = format!("container.env[{i}]");

            if env.name.is_empty() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.name"),
                    message: String::from("Binding name cannot be empty"),
                });
            }

            match (&env.value, &env.lookup) {
                (Some(_), Some(_)) => result.errors.push(ValidationError {
                    field: prefix.clone(),
                    message: format!(
                        "Binding '{}' sets both 'value' and 'lookup'; exactly one is required",
                        env.name
                    ),
                }),
                (None, None) => result.errors.push(ValidationError {
                    field: prefix.clone(),
                    message: format!(
                        "Binding '{}' sets neither 'value' nor 'lookup'; exactly one is required",
                        env.name
                    ),
                }),
                _ => {}
            }

            if !seen_names.insert(&env.name) {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.name"),
                    message: format!("Duplicate binding name: {}", env.name),
                });
            }
        }

        for (i, secret) in container.secrets.iter().enumerate() {
            let prefix = format!("container.secrets[{i}]");

            if secret.name.is_empty() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.name"),
                    message: String::from("Binding name cannot be empty"),
                });
            }

            if secret.entry.is_empty() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.entry"),
                    message: format!("Secret '{}' has no store entry name", secret.name),
                });
            }

            // Unversioned references are disallowed for reproducibility.
            if secret.version.is_none() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.version"),
                    message: format!("Secret '{}' must pin an explicit version", secret.name),
                });
            }

            if !seen_names.insert(&secret.name) {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.name"),
                    message: format!("Duplicate binding name: {}", secret.name),
                });
            }
        }
    }

    /// Validates the remaining resource names.
    fn validate_names(config: &StackConfig, result: &mut ValidationResult) {
        if !is_valid_name(&config.cluster.name) {
            result.errors.push(ValidationError {
                field: String::from("cluster.name"),
                message: format!(
                    "Cluster name '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    config.cluster.name
                ),
            });
        }

        if !is_valid_name(&config.security.name) {
            result.errors.push(ValidationError {
                field: String::from("security.name"),
                message: format!(
                    "Security boundary name '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    config.security.name
                ),
            });
        }
    }
}

/// Validates that a name follows the naming convention.
/// Names must be lowercase alphanumeric with hyphens, starting with a letter.
fn is_valid_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    let mut chars = name.chars();

    if let Some(first) = chars.next()
        && !first.is_ascii_lowercase()
    {
        return false;
    }

    for c in chars {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
            return false;
        }
    }

    if name.ends_with('-') {
        return false;
    }

    if name.contains("--") {
        return false;
    }

    true
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spec::{
        ClusterConfig, EnvEntry, IdentityConfig, PlatformConfig, SecretEntry, SecurityConfig,
        StackMeta, TaskConfig,
    };
    use crate::graph::OutboundPolicy;

    fn valid_config() -> StackConfig {
        StackConfig {
            stack: StackMeta {
                name: String::from("ecs-job"),
                network_lookup: String::from("vpc-123"),
            },
            identity: IdentityConfig::default(),
            task: TaskConfig {
                cpu_units: 2048,
                memory_mib: 4096,
                platform: PlatformConfig::default(),
            },
            container: ContainerConfig {
                repository: String::from("ecs-job"),
                log_stream_prefix: None,
                env: vec![EnvEntry {
                    name: String::from("SERVICE_ID"),
                    value: Some(String::from("svc-42")),
                    lookup: None,
                }],
                secrets: vec![SecretEntry {
                    name: String::from("PAGERDUTY_API_KEY"),
                    entry: String::from("PAGERDUTY_API_KEY"),
                    version: Some(1),
                }],
            },
            cluster: ClusterConfig {
                name: String::from("ecs-jobcluster"),
                elastic_capacity: true,
            },
            security: SecurityConfig {
                name: String::from("ecs-job-sg"),
                outbound: OutboundPolicy::AllowAll,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let result = ConfigValidator::new().validate(&valid_config()).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_unusual_cpu_units_warns() {
        let mut config = valid_config();
        config.task.cpu_units = 3000;
        let result = ConfigValidator::new().validate(&config).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_zero_memory_fails() {
        let mut config = valid_config();
        config.task.memory_mib = 0;
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_env_with_both_value_and_lookup_fails() {
        let mut config = valid_config();
        config.container.env[0].lookup = Some(String::from("PD_SERVICE_ID"));
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_name_across_env_and_secrets_fails() {
        let mut config = valid_config();
        config.container.secrets[0].name = String::from("SERVICE_ID");
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_unversioned_secret_fails() {
        let mut config = valid_config();
        config.container.secrets[0].version = None;
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_invalid_stack_name_fails() {
        let mut config = valid_config();
        config.stack.name = String::from("Ecs_Job");
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("ecs-job"));
        assert!(is_valid_name("my-stack-123"));
        assert!(is_valid_name("a"));
    }

    #[test]
    fn test_invalid_name() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Ecs-Job")); // uppercase
        assert!(!is_valid_name("123-job")); // starts with number
        assert!(!is_valid_name("ecs_job")); // underscore
        assert!(!is_valid_name("job-")); // ends with hyphen
        assert!(!is_valid_name("ecs--job")); // consecutive hyphens
    }
}
