//! External inventory collaborators.
//!
//! The graph builder consumes two read-only capabilities during
//! construction: network inventory lookup and configuration-store reads.
//! Both are modeled as traits with in-memory and HTTP-backed
//! implementations.

mod http;
mod network;
mod params;

pub use http::HttpNetworkInventory;
pub use network::{NetworkInventory, NetworkRecord, StaticNetworkInventory};
pub use params::{ParameterStore, StaticParameterStore};
