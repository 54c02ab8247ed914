//! HTTP-backed network inventory client.
//!
//! Queries an inventory service over HTTP for network records. Retries are
//! confined to this collaborator: the graph builder itself never retries.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header;
use tracing::{debug, trace};

use crate::error::{InventoryError, Result};

use super::network::{NetworkInventory, NetworkRecord};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for transient failures.
const MAX_RETRIES: u32 = 3;

/// Delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// HTTP client for a network inventory service.
#[derive(Debug, Clone)]
pub struct HttpNetworkInventory {
    /// HTTP client.
    client: Client,
    /// Base URL of the inventory service.
    base_url: String,
    /// Optional bearer token.
    token: Option<String>,
}

impl HttpNetworkInventory {
    /// Creates a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(base_url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InventoryError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Executes a lookup request once.
    fn lookup_once(&self, key: &str) -> Result<Vec<NetworkRecord>> {
        let url = format!("{}/v1/networks", self.base_url);
        trace!("GET {url}?lookup={key}");

        let mut request = self.client.get(&url).query(&[("lookup", key)]);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .map_err(|e| InventoryError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InventoryError::request(status.as_u16(), body).into());
        }

        response
            .json::<Vec<NetworkRecord>>()
            .map_err(|e| InventoryError::InvalidResponse {
                message: format!("Failed to decode network records: {e}"),
            }.into())
    }
}

impl NetworkInventory for HttpNetworkInventory {
    fn lookup(&self, key: &str) -> Result<Vec<NetworkRecord>> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                debug!("Retry attempt {attempt} of {MAX_RETRIES}");
                std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt)));
            }

            match self.lookup_once(key) {
                Ok(records) => return Ok(records),
                Err(e) => {
                    if e.is_retryable() {
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            InventoryError::network("Inventory lookup failed with no recorded error").into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let inventory = HttpNetworkInventory::new("https://inventory.internal/", None).unwrap();
        assert_eq!(inventory.base_url, "https://inventory.internal");
    }

    #[test]
    fn test_client_with_token() {
        let inventory =
            HttpNetworkInventory::new("https://inventory.internal", Some(String::from("t0ken")))
                .unwrap();
        assert_eq!(inventory.token.as_deref(), Some("t0ken"));
    }
}
