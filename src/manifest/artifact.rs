//! The provisioning manifest.
//!
//! A manifest is the hand-off artifact for the provisioning backend: the
//! finalized resource graph plus build metadata, serialized as JSON. Any
//! topological scheduler can apply independent branches in parallel; that
//! policy belongs to the backend, not to this crate.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, StackformError};
use crate::graph::{ResourceGraph, ResourceKind, ResourceNode, ResourceSpec};

use super::hash::GraphHasher;

/// Current version of the manifest format.
pub const MANIFEST_VERSION: &str = "1.0";

/// A provisioning manifest produced from a finalized graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningManifest {
    /// Manifest format version.
    pub version: String,
    /// Unique identifier for this build.
    pub build_id: Uuid,
    /// When the manifest was produced.
    pub created_at: DateTime<Utc>,
    /// Name of the stack the manifest was built from.
    pub stack: String,
    /// Deterministic fingerprint of the graph.
    pub fingerprint: String,
    /// Dependency-ordered resources.
    pub resources: Vec<ResourceNode>,
}

impl ProvisioningManifest {
    /// Builds a manifest from a finalized graph.
    #[must_use]
    pub fn from_graph(stack: &str, graph: &ResourceGraph) -> Self {
        let hasher = GraphHasher::new();
        Self {
            version: MANIFEST_VERSION.to_string(),
            build_id: Uuid::new_v4(),
            created_at: Utc::now(),
            stack: stack.to_string(),
            fingerprint: hasher.hash_graph(graph),
            resources: graph.nodes().to_vec(),
        }
    }

    /// Returns the number of resources.
    #[must_use]
    pub const fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns the number of secret bindings across all containers.
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.resources
            .iter()
            .filter_map(|n| match &n.spec {
                ResourceSpec::Container(c) => Some(c),
                _ => None,
            })
            .flat_map(|c| &c.bindings)
            .filter(|b| b.is_secret())
            .count()
    }

    /// Returns the number of resources of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: ResourceKind) -> usize {
        self.resources.iter().filter(|n| n.id.kind == kind).count()
    }

    /// Serializes the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StackformError::internal(format!("Failed to serialize manifest: {e}")))
    }

    /// Writes the manifest to a file as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!("Wrote manifest to {}", path.display());
        Ok(())
    }

    /// Loads a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| StackformError::internal(format!("Failed to parse manifest: {e}")))
    }
}

impl std::fmt::Display for ProvisioningManifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Manifest for stack '{}' ({} resources):",
            self.stack,
            self.resources.len()
        )?;
        for (i, node) in self.resources.iter().enumerate() {
            write!(f, "  {i}. {}", node.id)?;
            if node.depends_on.is_empty() {
                writeln!(f)?;
            } else {
                let deps: Vec<String> = node.depends_on.iter().map(ToString::to_string).collect();
                writeln!(f, " -> {}", deps.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, OutboundPolicy};
    use crate::inventory::StaticNetworkInventory;

    fn small_graph() -> ResourceGraph {
        let inventory = StaticNetworkInventory::new().with_network("vpc-123", "net-a");
        let mut builder = GraphBuilder::new();
        let network = builder.resolve_network(&inventory, "vpc-123").unwrap();
        builder.declare_cluster("c", &network, true).unwrap();
        builder
            .declare_security_boundary("sg", &network, OutboundPolicy::Restricted)
            .unwrap();
        builder.finalize().unwrap()
    }

    #[test]
    fn test_manifest_from_graph() {
        let manifest = ProvisioningManifest::from_graph("job", &small_graph());
        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.resource_count(), 3);
        assert_eq!(manifest.count_kind(ResourceKind::Cluster), 1);
        assert_eq!(manifest.secret_count(), 0);
        assert_eq!(manifest.fingerprint.len(), 64);
    }

    #[test]
    fn test_manifest_json_round_trip() {
        let manifest = ProvisioningManifest::from_graph("job", &small_graph());
        let json = manifest.to_json().unwrap();
        let loaded: ProvisioningManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.fingerprint, manifest.fingerprint);
        assert_eq!(loaded.resource_count(), manifest.resource_count());
    }

    #[test]
    fn test_manifest_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let manifest = ProvisioningManifest::from_graph("job", &small_graph());
        manifest.write_file(&path).unwrap();

        let loaded = ProvisioningManifest::load_file(&path).unwrap();
        assert_eq!(loaded.build_id, manifest.build_id);
    }

    #[test]
    fn test_display_lists_dependencies() {
        let manifest = ProvisioningManifest::from_graph("job", &small_graph());
        let rendered = manifest.to_string();
        assert!(rendered.contains("cluster/c -> network/vpc-123"));
    }
}
