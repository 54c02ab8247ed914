//! Network inventory lookup.
//!
//! The graph builder never creates networks; it resolves pre-existing ones
//! through a [`NetworkInventory`] collaborator. A lookup returns zero, one,
//! or many matches and the builder enforces that only an exact, unambiguous
//! match is valid input.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single network record reported by the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkRecord {
    /// Provider-assigned network identifier.
    pub network_id: String,
    /// The key this network is registered under.
    pub lookup_key: String,
    /// CIDR block, if known.
    #[serde(default)]
    pub cidr_block: Option<String>,
    /// Whether this is the account's default network.
    #[serde(default)]
    pub is_default: bool,
}

/// Inventory of pre-existing networks.
///
/// The lookup is the only I/O performed during graph construction and is a
/// blocking read: it must complete (or fail) before any dependent entity
/// is declared.
pub trait NetworkInventory {
    /// Returns all networks registered under the given lookup key.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory backend cannot be queried.
    fn lookup(&self, key: &str) -> Result<Vec<NetworkRecord>>;
}

/// In-memory network inventory.
///
/// Used directly in tests and as the backing for inventories loaded from
/// local fixture files.
#[derive(Debug, Clone, Default)]
pub struct StaticNetworkInventory {
    records: Vec<NetworkRecord>,
}

impl StaticNetworkInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Creates an inventory from a list of records.
    #[must_use]
    pub const fn from_records(records: Vec<NetworkRecord>) -> Self {
        Self { records }
    }

    /// Adds a record, returning self for chaining.
    #[must_use]
    pub fn with_record(mut self, record: NetworkRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Adds a network under the given lookup key.
    #[must_use]
    pub fn with_network(self, lookup_key: &str, network_id: &str) -> Self {
        self.with_record(NetworkRecord {
            network_id: network_id.to_string(),
            lookup_key: lookup_key.to_string(),
            cidr_block: None,
            is_default: false,
        })
    }

    /// Returns the number of records held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the inventory holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl NetworkInventory for StaticNetworkInventory {
    fn lookup(&self, key: &str) -> Result<Vec<NetworkRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.lookup_key == key)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_filters_by_key() {
        let inventory = StaticNetworkInventory::new()
            .with_network("vpc-123", "net-a")
            .with_network("vpc-456", "net-b");

        let matches = inventory.lookup("vpc-123").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].network_id, "net-a");
    }

    #[test]
    fn test_lookup_no_match_is_empty() {
        let inventory = StaticNetworkInventory::new().with_network("vpc-123", "net-a");
        assert!(inventory.lookup("vpc-999").unwrap().is_empty());
    }

    #[test]
    fn test_lookup_duplicate_key_returns_all() {
        let inventory = StaticNetworkInventory::new()
            .with_network("vpc-123", "net-a")
            .with_network("vpc-123", "net-b");
        assert_eq!(inventory.lookup("vpc-123").unwrap().len(), 2);
    }
}
