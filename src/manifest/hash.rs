//! Graph fingerprinting.
//!
//! Provides a deterministic hash over a finalized resource graph so the
//! provisioning backend can detect whether a manifest differs from the one
//! it last applied.

use sha2::{Digest, Sha256};

use crate::graph::{ResourceGraph, ResourceNode};

/// Hasher for computing graph fingerprints.
#[derive(Debug, Default)]
pub struct GraphHasher;

impl GraphHasher {
    /// Creates a new graph hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a fingerprint of the entire graph.
    ///
    /// Nodes are hashed in declaration order, so both content changes and
    /// ordering changes produce a different fingerprint.
    #[must_use]
    pub fn hash_graph(&self, graph: &ResourceGraph) -> String {
        let mut hasher = Sha256::new();
        for node in graph.nodes() {
            hasher.update(self.hash_node(node).as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Computes a hash for a single graph node.
    #[must_use]
    pub fn hash_node(&self, node: &ResourceNode) -> String {
        let mut hasher = Sha256::new();

        hasher.update(node.id.kind.to_string().as_bytes());
        hasher.update(node.id.name.as_bytes());

        for dep in &node.depends_on {
            hasher.update(dep.kind.to_string().as_bytes());
            hasher.update(dep.name.as_bytes());
        }

        // ResourceSpec serializes with a fixed field order, so the JSON
        // encoding is deterministic.
        if let Ok(spec) = serde_json::to_vec(&node.spec) {
            hasher.update(&spec);
        }

        hex::encode(hasher.finalize())
    }

    /// Computes a short fingerprint (first 8 characters) for display.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }
}
