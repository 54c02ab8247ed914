//! Stack file types.
//!
//! This module defines the structs that map to `stackform.deploy.yaml`.
//! The file declares one deployment unit: a container compute task wired
//! to networking, identity, secret-management, and logging resources.

use serde::{Deserialize, Serialize};

use crate::graph::{CpuArchitecture, OsFamily, OutboundPolicy};

/// The root structure of a stack file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackConfig {
    /// Stack-level settings.
    pub stack: StackMeta,
    /// Identity settings for the task and execution roles.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Task definition sizing and platform.
    pub task: TaskConfig,
    /// The single container of the task.
    pub container: ContainerConfig,
    /// Compute cluster settings.
    pub cluster: ClusterConfig,
    /// Security boundary settings.
    pub security: SecurityConfig,
}

/// Stack-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackMeta {
    /// Unique name for the stack.
    pub name: String,
    /// Lookup key for the pre-existing network to attach to.
    pub network_lookup: String,
}

/// Identity settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Service principal trusted to assume both roles.
    #[serde(default = "default_principal")]
    pub principal: String,
}

/// Task definition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskConfig {
    /// CPU units.
    pub cpu_units: u32,
    /// Memory limit in MiB.
    pub memory_mib: u32,
    /// Target platform.
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// Target platform settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlatformConfig {
    /// CPU architecture.
    #[serde(default)]
    pub architecture: CpuArchitecture,
    /// Operating system family.
    #[serde(default)]
    pub os: OsFamily,
}

/// Container settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Name of the image repository the container pulls from.
    pub repository: String,
    /// Log stream prefix; defaults to the stack name when omitted.
    #[serde(default)]
    pub log_stream_prefix: Option<String>,
    /// Plaintext configuration bindings.
    #[serde(default)]
    pub env: Vec<EnvEntry>,
    /// Secret configuration bindings.
    #[serde(default)]
    pub secrets: Vec<SecretEntry>,
}

/// A plaintext binding: either a literal value or a build-time lookup
/// against the configuration store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvEntry {
    /// Binding name exposed to the workload.
    pub name: String,
    /// Literal value.
    #[serde(default)]
    pub value: Option<String>,
    /// Configuration-store entry resolved at build time.
    #[serde(default)]
    pub lookup: Option<String>,
}

/// A secret binding: a reference to a versioned secure-store entry,
/// resolved only at container start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretEntry {
    /// Binding name exposed to the workload.
    pub name: String,
    /// Name of the secure-store entry.
    pub entry: String,
    /// Explicit entry version. Required; an omitted version fails the
    /// build.
    #[serde(default)]
    pub version: Option<u64>,
}

/// Compute cluster settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Cluster name.
    pub name: String,
    /// Whether elastic (serverless) capacity providers are enabled.
    #[serde(default)]
    pub elastic_capacity: bool,
}

/// Security boundary settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Security boundary name.
    pub name: String,
    /// Outbound traffic policy.
    #[serde(default)]
    pub outbound: OutboundPolicy,
}

fn default_principal() -> String {
    String::from("compute-tasks.cloud.internal")
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            principal: default_principal(),
        }
    }
}

impl StackConfig {
    /// Name of the task identity role derived from the stack name.
    #[must_use]
    pub fn task_role_name(&self) -> String {
        format!("{}-task-role", self.stack.name)
    }

    /// Name of the execution identity role derived from the stack name.
    #[must_use]
    pub fn execution_role_name(&self) -> String {
        format!("{}-execution-role", self.stack.name)
    }

    /// Name of the task definition derived from the stack name.
    #[must_use]
    pub fn task_definition_name(&self) -> String {
        format!("{}-task", self.stack.name)
    }

    /// Name of the container derived from the stack name.
    #[must_use]
    pub fn container_name(&self) -> String {
        format!("{}-container", self.stack.name)
    }

    /// Log stream prefix, falling back to the stack name.
    #[must_use]
    pub fn log_stream_prefix(&self) -> String {
        self.container
            .log_stream_prefix
            .clone()
            .unwrap_or_else(|| self.stack.name.clone())
    }
}
