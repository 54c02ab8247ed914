//! Stack file handling.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `stackform.deploy.yaml`
//! - Validation of the declared stack before compilation

mod spec;
mod parser;
mod validator;

pub use spec::{
    ClusterConfig, ContainerConfig, EnvEntry, IdentityConfig, PlatformConfig, SecretEntry,
    SecurityConfig, StackConfig, StackMeta, TaskConfig,
};
pub use parser::{ConfigParser, DEFAULT_CONFIG_FILE, find_config_file};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
