//! Configuration/parameter store access.
//!
//! Plain entries resolve to a string at build time through this
//! collaborator. Secret entries are never read here: the graph records only
//! a name and version, and the provisioning backend resolves them at
//! container start.

use std::collections::HashMap;

use crate::error::{InventoryError, Result};

/// Read access to the external configuration store.
pub trait ParameterStore {
    /// Reads a plain entry by name, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend cannot be queried.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Reads a plain entry by name, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::ParameterNotFound`] if the entry is
    /// missing, or any backend error from [`ParameterStore::get`].
    fn require(&self, name: &str) -> Result<String> {
        self.get(name)?.ok_or_else(|| {
            InventoryError::ParameterNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}

/// In-memory parameter store.
#[derive(Debug, Clone, Default)]
pub struct StaticParameterStore {
    entries: HashMap<String, String>,
}

impl StaticParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a store from a map of entries.
    #[must_use]
    pub const fn from_entries(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Adds an entry, returning self for chaining.
    #[must_use]
    pub fn with_entry(mut self, name: &str, value: &str) -> Self {
        self.entries.insert(name.to_string(), value.to_string());
        self
    }
}

impl ParameterStore for StaticParameterStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StackformError;

    #[test]
    fn test_get_present_entry() {
        let store = StaticParameterStore::new().with_entry("PD_SERVICE_ID", "svc-42");
        assert_eq!(
            store.get("PD_SERVICE_ID").unwrap(),
            Some(String::from("svc-42"))
        );
    }

    #[test]
    fn test_get_missing_entry() {
        let store = StaticParameterStore::new();
        assert_eq!(store.get("MISSING").unwrap(), None);
    }

    #[test]
    fn test_require_missing_entry_fails() {
        let store = StaticParameterStore::new();
        let err = store.require("MISSING").unwrap_err();
        assert!(matches!(
            err,
            StackformError::Inventory(InventoryError::ParameterNotFound { .. })
        ));
    }
}
