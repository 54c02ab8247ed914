//! Resource entity types for the provisioning graph.
//!
//! Every entity is a graph node with a stable logical identifier, a
//! resource kind, and a typed property bag. Entities are created once
//! during construction and never mutated afterwards; cross-references are
//! expressed as [`ResourceId`] values rather than owned children, except
//! for the container/task-definition pairing which is strictly
//! hierarchical.

use serde::{Deserialize, Serialize};

/// The kind of a graph resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A pre-existing network resolved by lookup.
    Network,
    /// An identity role grantable to a trusted service.
    Role,
    /// A compute task definition template.
    TaskDefinition,
    /// A container attached to a task definition.
    Container,
    /// A named container image store.
    ImageRepository,
    /// A logical compute cluster.
    Cluster,
    /// A network security boundary (security group).
    SecurityBoundary,
}

/// Stable logical identifier for a graph resource.
///
/// Names are unique across the whole graph regardless of kind, so an id
/// never collides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Logical name within the kind.
    pub name: String,
}

impl ResourceId {
    /// Creates a new resource id.
    #[must_use]
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// A single node in the provisioning graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceNode {
    /// Logical identifier.
    pub id: ResourceId,
    /// Identifiers of resources this node depends on. Every entry was
    /// declared strictly before this node.
    pub depends_on: Vec<ResourceId>,
    /// Typed properties of the resource.
    pub spec: ResourceSpec,
}

/// Typed property bag for each resource kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceSpec {
    /// Pre-existing network context.
    Network(NetworkContext),
    /// Identity role.
    Role(IdentityRole),
    /// Compute task definition.
    TaskDefinition(ComputeTaskDefinition),
    /// Container specification.
    Container(ContainerSpec),
    /// Image repository.
    ImageRepository(ImageRepository),
    /// Compute cluster.
    Cluster(ComputeCluster),
    /// Security boundary.
    SecurityBoundary(NetworkSecurityBoundary),
}

/// An existing network resolved from external inventory.
///
/// Read-only: every resource that attaches to network infrastructure holds
/// a reference to this node, none owns its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkContext {
    /// The lookup key that resolved this network.
    pub lookup_key: String,
    /// Provider-assigned network identifier.
    pub network_id: String,
    /// CIDR block, when the inventory reports one.
    #[serde(default)]
    pub cidr_block: Option<String>,
}

/// Allow/deny effect of a permission statement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant the listed actions.
    #[default]
    Allow,
    /// Deny the listed actions.
    Deny,
}

/// A single permission statement attached to an identity role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionStatement {
    /// Actions covered by this statement.
    pub actions: Vec<String>,
    /// Resource scopes the actions apply to.
    pub resources: Vec<String>,
    /// Allow or deny.
    #[serde(default)]
    pub effect: Effect,
}

impl PermissionStatement {
    /// Creates an allow statement over the given actions and scopes.
    #[must_use]
    pub fn allow(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self {
            actions,
            resources,
            effect: Effect::Allow,
        }
    }
}

/// A named principal grantable to a trusted service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRole {
    /// The service principal permitted to assume this role.
    pub trusted_principal: String,
    /// Attached permission statements.
    #[serde(default)]
    pub statements: Vec<PermissionStatement>,
}

/// CPU architecture of the target platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CpuArchitecture {
    /// 64-bit x86.
    #[default]
    X86_64,
    /// 64-bit ARM.
    Arm64,
}

/// Operating system family of the target platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    /// Linux.
    #[default]
    Linux,
    /// Windows.
    Windows,
}

/// Target runtime platform for a task definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RuntimePlatform {
    /// CPU architecture.
    pub architecture: CpuArchitecture,
    /// Operating system family.
    pub os_family: OsFamily,
}

/// Resource sizing for a task definition.
///
/// Whether a cpu/memory pair is supported for the target platform is the
/// provisioning backend's concern; the builder records the pair as given
/// and an unsupported combination fails at apply time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSizing {
    /// CPU units.
    pub cpu_units: u32,
    /// Memory limit in MiB.
    pub memory_mib: u32,
}

/// A compute task definition template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeTaskDefinition {
    /// Resource sizing.
    pub sizing: TaskSizing,
    /// Target platform.
    pub platform: RuntimePlatform,
    /// Role assumed by the running workload.
    pub task_role: ResourceId,
    /// Role assumed by the provisioning agent that starts the workload.
    pub execution_role: ResourceId,
    /// The attached container, once one has been declared.
    #[serde(default)]
    pub container: Option<ResourceId>,
}

/// Image selector for a container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "selector", rename_all = "snake_case")]
pub enum ImageSource {
    /// The most recent image in a declared repository.
    FromRepository {
        /// The repository to pull from.
        repository: ResourceId,
    },
}

/// Logging configuration for a container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Prefix for the log stream registered with the log sink.
    pub stream_prefix: String,
}

/// The value side of a configuration binding.
///
/// Plain values are visible strings materialized in the graph; secret
/// values are never materialized: only a reference to a versioned entry
/// in the secure configuration store is recorded, resolved at container
/// start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum BindingValue {
    /// A plaintext value.
    Plain {
        /// The resolved string value.
        value: String,
    },
    /// A reference to a versioned secure-store entry.
    Secret {
        /// Name of the store entry.
        entry: String,
        /// Explicit entry version. Required for reproducibility.
        version: u64,
    },
}

/// A named configuration binding on a container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigBinding {
    /// Binding name, unique per container across both categories.
    pub name: String,
    /// Plain or secret value.
    pub value: BindingValue,
}

impl ConfigBinding {
    /// Returns true if this binding is a secret reference.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        matches!(self.value, BindingValue::Secret { .. })
    }
}

/// A container attached to a task definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerSpec {
    /// The owning task definition.
    pub task_definition: ResourceId,
    /// Image selector.
    pub image: ImageSource,
    /// Logging configuration.
    pub logging: LogConfig,
    /// Ordered configuration bindings.
    #[serde(default)]
    pub bindings: Vec<ConfigBinding>,
}

/// A named store for container images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRepository {
    /// Repository name.
    pub repository_name: String,
}

/// A logical compute cluster bound to a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeCluster {
    /// The network the cluster attaches to.
    pub network: ResourceId,
    /// Whether elastic (serverless) capacity providers are enabled.
    pub elastic_capacity: bool,
}

/// Outbound traffic policy for a security boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutboundPolicy {
    /// All outbound traffic is permitted.
    #[default]
    AllowAll,
    /// Outbound traffic is restricted to explicit rules.
    Restricted,
}

/// A security group bound to a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkSecurityBoundary {
    /// The network the boundary attaches to.
    pub network: ResourceId,
    /// Outbound policy.
    pub outbound: OutboundPolicy,
}

impl ResourceSpec {
    /// Returns the kind corresponding to this spec variant.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Network(_) => ResourceKind::Network,
            Self::Role(_) => ResourceKind::Role,
            Self::TaskDefinition(_) => ResourceKind::TaskDefinition,
            Self::Container(_) => ResourceKind::Container,
            Self::ImageRepository(_) => ResourceKind::ImageRepository,
            Self::Cluster(_) => ResourceKind::Cluster,
            Self::SecurityBoundary(_) => ResourceKind::SecurityBoundary,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Network => "network",
            Self::Role => "role",
            Self::TaskDefinition => "task-definition",
            Self::Container => "container",
            Self::ImageRepository => "image-repository",
            Self::Cluster => "cluster",
            Self::SecurityBoundary => "security-boundary",
        };
        write!(f, "{kind}")
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

impl std::fmt::Display for OutboundPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllowAll => write!(f, "allow-all"),
            Self::Restricted => write!(f, "restricted"),
        }
    }
}
