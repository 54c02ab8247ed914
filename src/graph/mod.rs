//! Resource graph construction.
//!
//! This module is the core of stackform: typed resource descriptors and
//! the builder that wires them into a dependency-ordered graph for the
//! provisioning backend.

mod builder;
mod resource;

pub use builder::{GraphBuilder, ResourceGraph};
pub use resource::{
    BindingValue, ComputeCluster, ComputeTaskDefinition, ConfigBinding, ContainerSpec,
    CpuArchitecture, Effect, IdentityRole, ImageRepository, ImageSource, LogConfig,
    NetworkContext, NetworkSecurityBoundary, OsFamily, OutboundPolicy, PermissionStatement,
    ResourceId, ResourceKind, ResourceNode, ResourceSpec, RuntimePlatform, TaskSizing,
};
