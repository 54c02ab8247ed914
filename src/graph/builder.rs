//! The resource graph builder.
//!
//! Produces a closed, acyclic graph of deployment resources with all
//! cross-references resolved to logical identifiers, ready for an external
//! provisioning backend to reconcile.
//!
//! Construction is strictly sequential and dependency-ordered by the
//! caller. The builder performs no topological sort: it trusts declaration
//! order and fails fast when an operation references an entity that has
//! not been declared yet. Every failure aborts the build; a partial graph
//! is never handed off.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::inventory::NetworkInventory;

use super::resource::{
    BindingValue, ComputeCluster, ComputeTaskDefinition, ConfigBinding, ContainerSpec,
    IdentityRole, ImageRepository, ImageSource, LogConfig, NetworkContext,
    NetworkSecurityBoundary, OutboundPolicy, PermissionStatement, ResourceId, ResourceKind,
    ResourceNode, ResourceSpec, RuntimePlatform, TaskSizing,
};

/// Builder for a provisioning resource graph.
///
/// An explicit value threaded through every declaration; there is no
/// ambient global registry. Once [`GraphBuilder::finalize`] succeeds the
/// builder is frozen and every further mutation fails with
/// [`GraphError::FrozenGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Declared nodes in declaration order.
    nodes: Vec<ResourceNode>,
    /// Index from logical id to position in `nodes`.
    index: HashMap<ResourceId, usize>,
    /// All declared names. Names are unique graph-wide, across kinds.
    names: HashSet<String>,
    /// Set once the graph has been handed off.
    finalized: bool,
}

/// A finalized, immutable resource graph.
///
/// The terminal artifact of a build: a dependency-ordered DAG in which
/// every reference target was declared strictly before its referrer, so
/// any topological scheduler downstream can safely parallelize independent
/// branches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of declared resources.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing has been declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true once the graph has been finalized.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Resolves a pre-existing network through the inventory and registers
    /// it as the graph's network context.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NetworkNotFound`] if no network matches the
    /// lookup key, [`GraphError::AmbiguousNetwork`] if more than one does,
    /// or [`GraphError::FrozenGraph`] after finalization.
    pub fn resolve_network(
        &mut self,
        inventory: &dyn NetworkInventory,
        lookup_key: &str,
    ) -> Result<ResourceId> {
        self.ensure_mutable("resolve_network")?;

        let matches = inventory.lookup(lookup_key)?;
        let record = match matches.len() {
            0 => {
                return Err(GraphError::NetworkNotFound {
                    lookup_key: lookup_key.to_string(),
                }
                .into());
            }
            1 => &matches[0],
            n => {
                return Err(GraphError::AmbiguousNetwork {
                    lookup_key: lookup_key.to_string(),
                    matches: n,
                }
                .into());
            }
        };

        let id = ResourceId::new(ResourceKind::Network, lookup_key);
        self.ensure_unique(&id)?;

        debug!("Resolved network {lookup_key} to {}", record.network_id);
        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![],
            spec: ResourceSpec::Network(NetworkContext {
                lookup_key: lookup_key.to_string(),
                network_id: record.network_id.clone(),
                cidr_block: record.cidr_block.clone(),
            }),
        });
        Ok(id)
    }

    /// Declares an identity role grantable to a trusted service.
    ///
    /// No principal syntax validation is performed beyond requiring a
    /// non-empty identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyPrincipal`] for an empty principal,
    /// [`GraphError::DuplicateResource`] for a reused name, or
    /// [`GraphError::FrozenGraph`] after finalization.
    pub fn declare_identity_role(
        &mut self,
        name: &str,
        trusted_principal: &str,
        statements: Vec<PermissionStatement>,
    ) -> Result<ResourceId> {
        self.ensure_mutable("declare_identity_role")?;

        if trusted_principal.trim().is_empty() {
            return Err(GraphError::EmptyPrincipal {
                name: name.to_string(),
            }
            .into());
        }

        let id = ResourceId::new(ResourceKind::Role, name);
        self.ensure_unique(&id)?;

        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![],
            spec: ResourceSpec::Role(IdentityRole {
                trusted_principal: trusted_principal.to_string(),
                statements,
            }),
        });
        Ok(id)
    }

    /// Declares a compute task definition referencing two identity roles.
    ///
    /// Whether the cpu/memory pair is supported for the platform is
    /// validated by the provisioning backend at apply time, not here.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if either role is not
    /// declared, [`GraphError::DuplicateResource`] for a reused name, or
    /// [`GraphError::FrozenGraph`] after finalization.
    pub fn declare_task_definition(
        &mut self,
        name: &str,
        sizing: TaskSizing,
        platform: RuntimePlatform,
        task_role: &ResourceId,
        execution_role: &ResourceId,
    ) -> Result<ResourceId> {
        self.ensure_mutable("declare_task_definition")?;

        let id = ResourceId::new(ResourceKind::TaskDefinition, name);
        self.ensure_unique(&id)?;
        self.ensure_declared(&id, task_role)?;
        self.ensure_declared(&id, execution_role)?;

        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![task_role.clone(), execution_role.clone()],
            spec: ResourceSpec::TaskDefinition(ComputeTaskDefinition {
                sizing,
                platform,
                task_role: task_role.clone(),
                execution_role: execution_role.clone(),
                container: None,
            }),
        });
        Ok(id)
    }

    /// Declares a named image repository.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateResource`] for a reused name or
    /// [`GraphError::FrozenGraph`] after finalization.
    pub fn declare_image_repository(&mut self, name: &str) -> Result<ResourceId> {
        self.ensure_mutable("declare_image_repository")?;

        let id = ResourceId::new(ResourceKind::ImageRepository, name);
        self.ensure_unique(&id)?;

        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![],
            spec: ResourceSpec::ImageRepository(ImageRepository {
                repository_name: name.to_string(),
            }),
        });
        Ok(id)
    }

    /// Attaches a container to a task definition.
    ///
    /// Exactly one container per task definition is supported; a second
    /// attach is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the task definition or
    /// the image's repository is not declared,
    /// [`GraphError::ContainerAlreadyAttached`] on a second attach,
    /// [`GraphError::DuplicateResource`] for a reused name, or
    /// [`GraphError::FrozenGraph`] after finalization.
    pub fn attach_container(
        &mut self,
        task_definition: &ResourceId,
        name: &str,
        image: ImageSource,
        logging: LogConfig,
    ) -> Result<ResourceId> {
        self.ensure_mutable("attach_container")?;

        let id = ResourceId::new(ResourceKind::Container, name);
        self.ensure_unique(&id)?;
        self.ensure_declared(&id, task_definition)?;

        let ImageSource::FromRepository { repository } = &image;
        self.ensure_declared(&id, repository)?;
        let repository = repository.clone();

        // Reject a second container before touching the graph.
        let task_idx = self.index[task_definition];
        if let ResourceSpec::TaskDefinition(def) = &self.nodes[task_idx].spec
            && let Some(existing) = &def.container
        {
            return Err(GraphError::ContainerAlreadyAttached {
                task_definition: task_definition.to_string(),
                existing: existing.name.clone(),
            }
            .into());
        }

        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![task_definition.clone(), repository],
            spec: ResourceSpec::Container(ContainerSpec {
                task_definition: task_definition.clone(),
                image,
                logging,
                bindings: vec![],
            }),
        });

        // Back-wire the child onto its owner.
        if let ResourceSpec::TaskDefinition(def) = &mut self.nodes[task_idx].spec {
            def.container = Some(id.clone());
        }
        Ok(id)
    }

    /// Appends a plaintext configuration binding to a container.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateBinding`] if the name is already
    /// bound on the container (plain or secret),
    /// [`GraphError::DanglingReference`] if the container is not declared,
    /// or [`GraphError::FrozenGraph`] after finalization.
    pub fn bind_plain_value(
        &mut self,
        container: &ResourceId,
        name: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_mutable("bind_plain_value")?;
        self.push_binding(
            container,
            ConfigBinding {
                name: name.to_string(),
                value: BindingValue::Plain {
                    value: value.to_string(),
                },
            },
        )
    }

    /// Appends a secret configuration binding to a container.
    ///
    /// The secret is recorded as a reference to a versioned store entry;
    /// the value itself never enters the graph. Version existence is not
    /// checked at build time; the store verifies it at apply time.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateBinding`] if the name is already
    /// bound on the container, [`GraphError::UnversionedSecret`] if no
    /// version is given, [`GraphError::DanglingReference`] if the container
    /// is not declared, or [`GraphError::FrozenGraph`] after finalization.
    pub fn bind_secret_value(
        &mut self,
        container: &ResourceId,
        name: &str,
        entry: &str,
        version: Option<u64>,
    ) -> Result<()> {
        self.ensure_mutable("bind_secret_value")?;

        // Duplicate names are rejected uniformly, before the version check.
        self.ensure_binding_free(container, name)?;

        let Some(version) = version else {
            return Err(GraphError::UnversionedSecret {
                container: container.name.clone(),
                name: name.to_string(),
            }
            .into());
        };

        self.push_binding(
            container,
            ConfigBinding {
                name: name.to_string(),
                value: BindingValue::Secret {
                    entry: entry.to_string(),
                    version,
                },
            },
        )
    }

    /// Declares a compute cluster bound to a network.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the network is not
    /// declared, [`GraphError::DuplicateResource`] for a reused name, or
    /// [`GraphError::FrozenGraph`] after finalization.
    pub fn declare_cluster(
        &mut self,
        name: &str,
        network: &ResourceId,
        elastic_capacity: bool,
    ) -> Result<ResourceId> {
        self.ensure_mutable("declare_cluster")?;

        let id = ResourceId::new(ResourceKind::Cluster, name);
        self.ensure_unique(&id)?;
        self.ensure_declared(&id, network)?;

        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![network.clone()],
            spec: ResourceSpec::Cluster(ComputeCluster {
                network: network.clone(),
                elastic_capacity,
            }),
        });
        Ok(id)
    }

    /// Declares a network security boundary.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the network is not
    /// declared, [`GraphError::DuplicateResource`] for a reused name, or
    /// [`GraphError::FrozenGraph`] after finalization.
    pub fn declare_security_boundary(
        &mut self,
        name: &str,
        network: &ResourceId,
        outbound: OutboundPolicy,
    ) -> Result<ResourceId> {
        self.ensure_mutable("declare_security_boundary")?;

        let id = ResourceId::new(ResourceKind::SecurityBoundary, name);
        self.ensure_unique(&id)?;
        self.ensure_declared(&id, network)?;

        self.insert(ResourceNode {
            id: id.clone(),
            depends_on: vec![network.clone()],
            spec: ResourceSpec::SecurityBoundary(NetworkSecurityBoundary {
                network: network.clone(),
                outbound,
            }),
        });
        Ok(id)
    }

    /// Freezes the builder and hands off the closed graph.
    ///
    /// Re-checks topological validity before hand-off: every dependency
    /// must appear strictly before its referrer in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::FrozenGraph`] if already finalized, or
    /// [`GraphError::DanglingReference`] if ordering is violated.
    pub fn finalize(&mut self) -> Result<ResourceGraph> {
        self.ensure_mutable("finalize")?;

        let mut seen = HashSet::new();
        for node in &self.nodes {
            for dep in &node.depends_on {
                if !seen.contains(dep) {
                    return Err(GraphError::DanglingReference {
                        referrer: node.id.to_string(),
                        target: dep.to_string(),
                    }
                    .into());
                }
            }
            seen.insert(&node.id);
        }

        self.finalized = true;
        debug!("Finalized graph with {} resources", self.nodes.len());
        Ok(ResourceGraph {
            nodes: self.nodes.clone(),
        })
    }

    /// Fails if the builder has been finalized.
    fn ensure_mutable(&self, operation: &str) -> Result<()> {
        if self.finalized {
            return Err(GraphError::FrozenGraph {
                operation: operation.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Fails if the name is already taken anywhere in the graph,
    /// regardless of kind.
    fn ensure_unique(&self, id: &ResourceId) -> Result<()> {
        if self.names.contains(&id.name) {
            return Err(GraphError::DuplicateResource {
                kind: id.kind.to_string(),
                name: id.name.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Fails if the target id has not been declared.
    fn ensure_declared(&self, referrer: &ResourceId, target: &ResourceId) -> Result<()> {
        if !self.index.contains_key(target) {
            return Err(GraphError::DanglingReference {
                referrer: referrer.to_string(),
                target: target.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Fails if the binding name is already used on the container.
    fn ensure_binding_free(&self, container: &ResourceId, name: &str) -> Result<()> {
        let Some(&idx) = self.index.get(container) else {
            return Err(GraphError::DanglingReference {
                referrer: format!("binding '{name}'"),
                target: container.to_string(),
            }
            .into());
        };

        if let ResourceSpec::Container(spec) = &self.nodes[idx].spec
            && spec.bindings.iter().any(|b| b.name == name)
        {
            return Err(GraphError::DuplicateBinding {
                container: container.name.clone(),
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Appends a validated binding to a container.
    fn push_binding(&mut self, container: &ResourceId, binding: ConfigBinding) -> Result<()> {
        self.ensure_binding_free(container, &binding.name)?;

        let idx = self.index[container];
        if let ResourceSpec::Container(spec) = &mut self.nodes[idx].spec {
            spec.bindings.push(binding);
        }
        Ok(())
    }

    /// Registers a node.
    fn insert(&mut self, node: ResourceNode) {
        debug_assert_eq!(node.id.kind, node.spec.kind());
        self.names.insert(node.id.name.clone());
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }
}

impl ResourceGraph {
    /// Returns the nodes in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// Returns the number of resources in the graph.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no resources.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Returns the number of resources of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: ResourceKind) -> usize {
        self.nodes.iter().filter(|n| n.id.kind == kind).count()
    }

    /// Verifies that every reference target appears strictly before its
    /// referrer in declaration order.
    #[must_use]
    pub fn is_topologically_valid(&self) -> bool {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !node.depends_on.iter().all(|d| seen.contains(d)) {
                return false;
            }
            seen.insert(&node.id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StackformError;
    use crate::inventory::StaticNetworkInventory;

    fn single_network() -> StaticNetworkInventory {
        StaticNetworkInventory::new().with_network("vpc-123", "net-0a1b2c")
    }

    fn graph_with_container() -> (GraphBuilder, ResourceId) {
        let mut builder = GraphBuilder::new();
        let task_role = builder
            .declare_identity_role("task-role", "compute-tasks.cloud.internal", vec![])
            .unwrap();
        let exec_role = builder
            .declare_identity_role("execution-role", "compute-tasks.cloud.internal", vec![])
            .unwrap();
        let task = builder
            .declare_task_definition(
                "job-task",
                TaskSizing {
                    cpu_units: 2048,
                    memory_mib: 4096,
                },
                RuntimePlatform::default(),
                &task_role,
                &exec_role,
            )
            .unwrap();
        let repo = builder.declare_image_repository("job-image").unwrap();
        let container = builder
            .attach_container(
                &task,
                "job-container",
                ImageSource::FromRepository { repository: repo },
                LogConfig {
                    stream_prefix: String::from("job"),
                },
            )
            .unwrap();
        (builder, container)
    }

    fn assert_graph_err(err: &StackformError, check: impl Fn(&GraphError) -> bool) {
        match err {
            StackformError::Graph(g) => assert!(check(g), "unexpected graph error: {g}"),
            other => panic!("expected graph error, got: {other}"),
        }
    }

    #[test]
    fn test_resolve_network_single_match() {
        let mut builder = GraphBuilder::new();
        let id = builder
            .resolve_network(&single_network(), "vpc-123")
            .unwrap();
        assert_eq!(id.kind, ResourceKind::Network);
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_resolve_network_zero_matches() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .resolve_network(&StaticNetworkInventory::new(), "vpc-123")
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::NetworkNotFound { .. }));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_resolve_network_ambiguous() {
        let inventory = StaticNetworkInventory::new()
            .with_network("vpc-123", "net-a")
            .with_network("vpc-123", "net-b");
        let mut builder = GraphBuilder::new();
        let err = builder.resolve_network(&inventory, "vpc-123").unwrap_err();
        assert_graph_err(
            &err,
            |g| matches!(g, GraphError::AmbiguousNetwork { matches: 2, .. }),
        );
    }

    #[test]
    fn test_empty_principal_rejected() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .declare_identity_role("task-role", "  ", vec![])
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::EmptyPrincipal { .. }));
    }

    #[test]
    fn test_duplicate_resource_name() {
        let mut builder = GraphBuilder::new();
        builder
            .declare_identity_role("task-role", "compute-tasks", vec![])
            .unwrap();
        let err = builder
            .declare_identity_role("task-role", "compute-tasks", vec![])
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::DuplicateResource { .. }));
    }

    #[test]
    fn test_duplicate_name_across_kinds_rejected() {
        let inventory = StaticNetworkInventory::new().with_network("ecs-job", "net-a");
        let mut builder = GraphBuilder::new();
        let network = builder.resolve_network(&inventory, "ecs-job").unwrap();
        // Name uniqueness is graph-wide: a cluster may not reuse the
        // network's name even though the kinds differ.
        let err = builder
            .declare_cluster("ecs-job", &network, false)
            .unwrap_err();
        assert_graph_err(&err, |g| {
            matches!(g, GraphError::DuplicateResource { name, .. } if name == "ecs-job")
        });
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_node_spec_kind_matches_id() {
        let (mut builder, _) = graph_with_container();
        let graph = builder.finalize().unwrap();
        for node in graph.nodes() {
            assert_eq!(node.spec.kind(), node.id.kind);
        }
    }

    #[test]
    fn test_task_definition_requires_declared_roles() {
        let mut builder = GraphBuilder::new();
        let ghost = ResourceId::new(ResourceKind::Role, "ghost");
        let err = builder
            .declare_task_definition(
                "job-task",
                TaskSizing {
                    cpu_units: 256,
                    memory_mib: 512,
                },
                RuntimePlatform::default(),
                &ghost,
                &ghost,
            )
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::DanglingReference { .. }));
    }

    #[test]
    fn test_second_container_rejected() {
        let (mut builder, container) = graph_with_container();
        let task = ResourceId::new(ResourceKind::TaskDefinition, "job-task");
        let repo = ResourceId::new(ResourceKind::ImageRepository, "job-image");
        let err = builder
            .attach_container(
                &task,
                "second",
                ImageSource::FromRepository { repository: repo },
                LogConfig {
                    stream_prefix: String::from("second"),
                },
            )
            .unwrap_err();
        assert_graph_err(&err, |g| {
            matches!(g, GraphError::ContainerAlreadyAttached { existing, .. }
                if existing == &container.name)
        });
    }

    #[test]
    fn test_duplicate_binding_plain_then_plain() {
        let (mut builder, container) = graph_with_container();
        builder
            .bind_plain_value(&container, "SERVICE_ID", "svc-42")
            .unwrap();
        let err = builder
            .bind_plain_value(&container, "SERVICE_ID", "svc-43")
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::DuplicateBinding { .. }));
    }

    #[test]
    fn test_duplicate_binding_plain_then_secret() {
        let (mut builder, container) = graph_with_container();
        builder
            .bind_plain_value(&container, "SERVICE_ID", "svc-42")
            .unwrap();
        // Same name as a secret must also fail, and with the duplicate
        // error even when the version is missing too.
        let err = builder
            .bind_secret_value(&container, "SERVICE_ID", "SERVICE_ID", None)
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::DuplicateBinding { .. }));
    }

    #[test]
    fn test_unversioned_secret_rejected() {
        let (mut builder, container) = graph_with_container();
        let err = builder
            .bind_secret_value(&container, "PAGERDUTY_API_KEY", "PAGERDUTY_API_KEY", None)
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::UnversionedSecret { .. }));
    }

    #[test]
    fn test_any_secret_version_accepted() {
        let (mut builder, container) = graph_with_container();
        // Existence of the version is the store's concern at apply time.
        builder
            .bind_secret_value(&container, "KEY", "KEY", Some(999))
            .unwrap();
    }

    #[test]
    fn test_binding_on_undeclared_container() {
        let mut builder = GraphBuilder::new();
        let ghost = ResourceId::new(ResourceKind::Container, "ghost");
        let err = builder
            .bind_plain_value(&ghost, "SERVICE_ID", "svc-42")
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::DanglingReference { .. }));
    }

    #[test]
    fn test_cluster_requires_network() {
        let mut builder = GraphBuilder::new();
        let ghost = ResourceId::new(ResourceKind::Network, "vpc-x");
        let err = builder.declare_cluster("c", &ghost, true).unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::DanglingReference { .. }));
    }

    #[test]
    fn test_frozen_graph_rejects_mutation_and_preserves_content() {
        let (mut builder, container) = graph_with_container();
        builder
            .bind_plain_value(&container, "SERVICE_ID", "svc-42")
            .unwrap();
        let graph = builder.finalize().unwrap();

        let err = builder
            .bind_plain_value(&container, "LATE", "too late")
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::FrozenGraph { .. }));

        let err = builder.declare_image_repository("late-repo").unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::FrozenGraph { .. }));

        // Content is unchanged after the failed attempts.
        assert_eq!(builder.len(), graph.len());
        let node = graph.get(&container).unwrap();
        if let ResourceSpec::Container(spec) = &node.spec {
            assert_eq!(spec.bindings.len(), 1);
        } else {
            panic!("expected a container node");
        }
    }

    #[test]
    fn test_double_finalize_rejected() {
        let (mut builder, _) = graph_with_container();
        builder.finalize().unwrap();
        let err = builder.finalize().unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::FrozenGraph { .. }));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut builder = GraphBuilder::new();

        let network = builder
            .resolve_network(&single_network(), "vpc-123")
            .unwrap();
        let task_role = builder
            .declare_identity_role("job-task-role", "compute-tasks.cloud.internal", vec![])
            .unwrap();
        let exec_role = builder
            .declare_identity_role(
                "job-execution-role",
                "compute-tasks.cloud.internal",
                vec![PermissionStatement::allow(
                    vec![String::from("paramstore:GetParameter")],
                    vec![String::from("*")],
                )],
            )
            .unwrap();
        let task = builder
            .declare_task_definition(
                "job-task",
                TaskSizing {
                    cpu_units: 2048,
                    memory_mib: 4096,
                },
                RuntimePlatform::default(),
                &task_role,
                &exec_role,
            )
            .unwrap();
        let repo = builder.declare_image_repository("job-image").unwrap();
        let container = builder
            .attach_container(
                &task,
                "job-container",
                ImageSource::FromRepository { repository: repo },
                LogConfig {
                    stream_prefix: String::from("job-container"),
                },
            )
            .unwrap();
        builder
            .bind_plain_value(&container, "SERVICE_ID", "svc-42")
            .unwrap();
        builder
            .bind_secret_value(
                &container,
                "PAGERDUTY_API_KEY",
                "PAGERDUTY_API_KEY",
                Some(1),
            )
            .unwrap();
        builder.declare_cluster("job-cluster", &network, true).unwrap();
        builder
            .declare_security_boundary("job-sg", &network, OutboundPolicy::AllowAll)
            .unwrap();

        let graph = builder.finalize().unwrap();
        assert_eq!(graph.len(), 8);
        assert!(graph.is_topologically_valid());
        assert_eq!(graph.count_kind(ResourceKind::Role), 2);

        // Container owner reference is wired both ways.
        let task_node = graph.get(&task).unwrap();
        if let ResourceSpec::TaskDefinition(def) = &task_node.spec {
            assert_eq!(def.container.as_ref(), Some(&container));
        } else {
            panic!("expected a task definition node");
        }

        // Further mutation is rejected.
        let err = builder
            .bind_plain_value(&container, "EXTRA", "nope")
            .unwrap_err();
        assert_graph_err(&err, |g| matches!(g, GraphError::FrozenGraph { .. }));
    }
}
