//! Error types for the stackform compiler.
//!
//! This module provides the error hierarchy for all stages of a build:
//! configuration loading, graph construction, inventory lookups, and
//! manifest emission.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stackform.
#[derive(Debug, Error)]
pub enum StackformError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Graph construction errors.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Inventory collaborator errors.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The stack file was not found.
    #[error("Stack file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The stack file could not be parsed.
    #[error("Failed to parse stack file: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Stack validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },
}

/// Graph construction errors.
///
/// Every variant is a construction-time validation failure: the build is
/// aborted and no partial graph is ever handed to the provisioning backend.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The network lookup key matched no networks.
    #[error("No network matches lookup key '{lookup_key}'")]
    NetworkNotFound {
        /// The lookup key that matched nothing.
        lookup_key: String,
    },

    /// The network lookup key matched more than one network.
    #[error("Network lookup key '{lookup_key}' is ambiguous: {matches} networks match")]
    AmbiguousNetwork {
        /// The ambiguous lookup key.
        lookup_key: String,
        /// Number of networks that matched.
        matches: usize,
    },

    /// An operation referenced an entity that has not been declared.
    #[error("'{referrer}' references undeclared resource '{target}'")]
    DanglingReference {
        /// The resource making the reference.
        referrer: String,
        /// The missing reference target.
        target: String,
    },

    /// A resource with the same logical identifier already exists.
    #[error("Duplicate {kind} name: {name}")]
    DuplicateResource {
        /// Resource kind label.
        kind: String,
        /// The duplicated name.
        name: String,
    },

    /// A binding name is already in use on the same container.
    #[error("Duplicate binding '{name}' on container '{container}'")]
    DuplicateBinding {
        /// The container holding the binding.
        container: String,
        /// The duplicated binding name.
        name: String,
    },

    /// A secret binding was declared without an explicit version.
    #[error("Secret binding '{name}' on container '{container}' has no version")]
    UnversionedSecret {
        /// The container holding the binding.
        container: String,
        /// The unversioned binding name.
        name: String,
    },

    /// An identity role was declared with an empty trusted principal.
    #[error("Identity role '{name}' has an empty trusted principal")]
    EmptyPrincipal {
        /// The offending role name.
        name: String,
    },

    /// A task definition already has a container attached.
    #[error("Task definition '{task_definition}' already has container '{existing}'")]
    ContainerAlreadyAttached {
        /// The task definition.
        task_definition: String,
        /// The container already attached to it.
        existing: String,
    },

    /// A mutation was attempted after the graph was finalized.
    #[error("Graph is finalized; '{operation}' is not permitted")]
    FrozenGraph {
        /// The rejected operation.
        operation: String,
    },
}

/// Inventory collaborator errors.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory service rejected the request.
    #[error("Inventory request failed: {status} - {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// Network failure talking to the inventory service.
    #[error("Network error communicating with inventory: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// The inventory service returned an unparseable response.
    #[error("Invalid response from inventory service: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// A plain-value lookup named a parameter that does not exist.
    #[error("Parameter not found in configuration store: {name}")]
    ParameterNotFound {
        /// Name of the missing parameter.
        name: String,
    },
}

/// Result type alias for stackform operations.
pub type Result<T> = std::result::Result<T, StackformError>;

impl StackformError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is retryable.
    ///
    /// Only inventory transport failures qualify; graph construction
    /// failures never do.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Inventory(InventoryError::NetworkError { .. }))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a validation error without a specific field.
    #[must_use]
    pub fn validation_general(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: None,
        }
    }
}

impl InventoryError {
    /// Creates a request error.
    #[must_use]
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }
}
